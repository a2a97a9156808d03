//! Local notification scheduling.
//!
//! The delivery subsystem itself is external; this module owns the identity
//! and lifetime of every notification the app registers with it.

mod center;
mod request;
mod scheduler;

pub use center::{Authorization, InMemoryNotificationCenter, NotificationCenter, StaticAuthorization};
pub use request::{CalendarTrigger, InterruptionLevel, NotificationContent, NotificationRequest, Trigger};
pub use scheduler::{NotificationScheduler, ScheduleOutcome, SkipReason, SESSION_COMPLETE_PREFIX};
