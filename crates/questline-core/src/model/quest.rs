//! Quest: a trackable unit of focus work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A focus-work unit with a resumable session timer.
///
/// Timer fields are private to the crate: only the session timer writes
/// them, which keeps `is_timer_active == last_started_at.is_some()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub is_boss_quest: bool,
    pub(crate) is_timer_active: bool,
    pub(crate) last_started_at: Option<DateTime<Utc>>,
    /// Accumulated active seconds from finished sessions.
    pub(crate) time_spent_secs: u64,
    pub(crate) is_completed: bool,
    pub(crate) completed_at: Option<DateTime<Utc>>,
    /// Ids of deferred completion alerts scheduled for this quest.
    #[serde(default)]
    pub(crate) pending_notification_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Quest {
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, created_at)
    }

    pub fn with_id(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_boss_quest: false,
            is_timer_active: false,
            last_started_at: None,
            time_spent_secs: 0,
            is_completed: false,
            completed_at: None,
            pending_notification_ids: Vec::new(),
            created_at,
        }
    }

    pub fn boss(mut self) -> Self {
        self.is_boss_quest = true;
        self
    }

    pub fn is_timer_active(&self) -> bool {
        self.is_timer_active
    }

    pub fn last_started_at(&self) -> Option<DateTime<Utc>> {
        self.last_started_at
    }

    pub fn time_spent_secs(&self) -> u64 {
        self.time_spent_secs
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn pending_notification_ids(&self) -> &[String] {
        &self.pending_notification_ids
    }

    pub(crate) fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(at);
    }
}
