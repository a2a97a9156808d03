//! Entities the engine reads and writes through a
//! [`MissionStore`](crate::store::MissionStore).

mod profile;
mod quest;
mod todo;

pub use profile::PlayerProfile;
pub use quest::Quest;
pub use todo::{Priority, TodoItem};
