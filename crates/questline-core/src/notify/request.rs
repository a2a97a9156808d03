use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Priority;

/// How assertively the delivery subsystem presents a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionLevel {
    Passive,
    Active,
    TimeSensitive,
    Critical,
}

impl InterruptionLevel {
    pub fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::Low => InterruptionLevel::Passive,
            Priority::Medium => InterruptionLevel::Active,
            Priority::High => InterruptionLevel::TimeSensitive,
            Priority::Critical => InterruptionLevel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterruptionLevel::Passive => "passive",
            InterruptionLevel::Active => "active",
            InterruptionLevel::TimeSensitive => "time_sensitive",
            InterruptionLevel::Critical => "critical",
        }
    }
}

/// Minute-granularity calendar trigger. Never repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarTrigger {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl CalendarTrigger {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
            day: instant.day(),
            hour: instant.hour(),
            minute: instant.minute(),
        }
    }

    /// The instant these components describe, if they form a valid date.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(self.year, self.month, self.day, self.hour, self.minute, 0)
            .single()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    Calendar(CalendarTrigger),
    /// Fires `seconds` after the request was registered.
    Delay { seconds: u64 },
}

impl Trigger {
    /// When the trigger fires, given the instant it was registered.
    pub fn fire_at(&self, requested_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Trigger::Calendar(calendar) => calendar.instant(),
            Trigger::Delay { seconds } => {
                let secs = i64::try_from(*seconds).ok()?;
                requested_at.checked_add_signed(chrono::Duration::try_seconds(secs)?)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub interruption_level: InterruptionLevel,
}

/// A registration handed to the delivery subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub id: String,
    pub trigger: Trigger,
    pub content: NotificationContent,
    pub requested_at: DateTime<Utc>,
}

impl NotificationRequest {
    pub fn fire_at(&self) -> Option<DateTime<Utc>> {
        self.trigger.fire_at(self.requested_at)
    }
}
