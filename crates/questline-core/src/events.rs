use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::SkipReason;

/// Every state change the coordinator makes produces an Event.
/// The presentation layer subscribes to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    QuestStarted {
        quest_id: String,
        at: DateTime<Utc>,
    },
    QuestPaused {
        quest_id: String,
        /// Seconds added by the session that just ended.
        session_secs: u64,
        time_spent_secs: u64,
        at: DateTime<Utc>,
    },
    QuestCompleted {
        quest_id: String,
        time_spent_secs: u64,
        xp_gained: u64,
        at: DateTime<Utc>,
    },
    QuestReset {
        quest_id: String,
        at: DateTime<Utc>,
    },
    QuestDeleted {
        quest_id: String,
        cancelled_notifications: usize,
        at: DateTime<Utc>,
    },
    LeveledUp {
        from_level: u32,
        to_level: u32,
        at: DateTime<Utc>,
    },
    RewardsUnlocked {
        rewards: Vec<String>,
        at: DateTime<Utc>,
    },
    ReminderScheduled {
        todo_id: String,
        notification_id: String,
        at: DateTime<Utc>,
    },
    ReminderCleared {
        todo_id: String,
        reason: SkipReason,
        at: DateTime<Utc>,
    },
    SessionAlertScheduled {
        quest_id: String,
        notification_id: String,
        delay_secs: u64,
        at: DateTime<Utc>,
    },
    /// Notification permission is missing. Nothing was registered.
    SchedulingDenied {
        subject_id: String,
        at: DateTime<Utc>,
    },
    /// The delivery subsystem refused a registration. Not retried.
    SchedulingFailed {
        subject_id: String,
        message: String,
        at: DateTime<Utc>,
    },
}
