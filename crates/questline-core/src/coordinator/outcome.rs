use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;
use crate::leveling::Reward;
use crate::model::{Quest, TodoItem};
use crate::notify::{ScheduleOutcome, SkipReason};

/// When the session-complete alert for a finished quest should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Now,
    /// Deferred completion, e.g. a pomodoro that ends in the future.
    After(u64),
}

impl Completion {
    pub fn delay_secs(&self) -> u64 {
        match self {
            Completion::Now => 0,
            Completion::After(secs) => *secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOutcome {
    Started,
    AlreadyActive,
    AlreadyCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PauseOutcome {
    Paused { session_secs: u64, time_spent_secs: u64 },
    NotActive,
}

/// What happened on the notification side of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationStatus {
    Scheduled { id: String },
    Skipped { reason: SkipReason },
    Denied,
    Failed { message: String },
}

impl From<Result<ScheduleOutcome, SchedulingError>> for NotificationStatus {
    fn from(result: Result<ScheduleOutcome, SchedulingError>) -> Self {
        match result {
            Ok(ScheduleOutcome::Scheduled { id }) => NotificationStatus::Scheduled { id },
            Ok(ScheduleOutcome::Skipped { reason }) => NotificationStatus::Skipped { reason },
            Err(err) => err.into(),
        }
    }
}

impl From<SchedulingError> for NotificationStatus {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Denied => NotificationStatus::Denied,
            SchedulingError::Failed(message) => NotificationStatus::Failed { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub quest: Quest,
    pub reward: Reward,
    pub alert: NotificationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompleteOutcome {
    Completed(CompletionReport),
    AlreadyCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoReport {
    pub todo: TodoItem,
    pub reminder: NotificationStatus,
}
