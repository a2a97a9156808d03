pub mod session;

pub use session::{live_elapsed, reset, start, stop};
