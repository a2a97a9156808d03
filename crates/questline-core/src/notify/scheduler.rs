//! Reminder and completion-alert scheduling on top of a [`NotificationCenter`].
//!
//! Every todo reminder is addressed by [`TodoItem::notification_id`], and each
//! schedule call cancels that id first, so a todo never has two live
//! reminders. Failures from the delivery side are handed back once and never
//! retried here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::center::{Authorization, NotificationCenter};
use super::request::{CalendarTrigger, InterruptionLevel, NotificationContent, NotificationRequest, Trigger};
use crate::error::SchedulingError;
use crate::model::{Priority, TodoItem};

pub const SESSION_COMPLETE_PREFIX: &str = "session-complete-";

/// Why a reminder was not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Completed,
    NoReminderDate,
    /// The reminder date is not in the future.
    ReminderInPast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    Scheduled { id: String },
    Skipped { reason: SkipReason },
}

fn reminder_title(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "Critical Quest Alert",
        Priority::High => "Urgent Quest",
        Priority::Medium => "Quest Reminder",
        Priority::Low => "Gentle Reminder",
    }
}

pub struct NotificationScheduler<N, A> {
    center: Arc<N>,
    authorization: Arc<A>,
}

impl<N: NotificationCenter, A: Authorization> NotificationScheduler<N, A> {
    pub fn new(center: Arc<N>, authorization: Arc<A>) -> Self {
        Self {
            center,
            authorization,
        }
    }

    pub fn center(&self) -> &Arc<N> {
        &self.center
    }

    pub fn authorization(&self) -> &Arc<A> {
        &self.authorization
    }

    /// The request a reminder for `todo` would register at `now`, or why none would be.
    pub fn reminder_request(
        todo: &TodoItem,
        now: DateTime<Utc>,
    ) -> Result<NotificationRequest, SkipReason> {
        if todo.is_completed {
            return Err(SkipReason::Completed);
        }
        let at = todo.reminder_date.ok_or(SkipReason::NoReminderDate)?;
        if at <= now {
            return Err(SkipReason::ReminderInPast);
        }

        Ok(NotificationRequest {
            id: todo.notification_id(),
            trigger: Trigger::Calendar(CalendarTrigger::at(at)),
            content: NotificationContent {
                title: reminder_title(todo.priority).to_string(),
                body: todo.title.clone(),
                subtitle: (!todo.notes.is_empty()).then(|| todo.notes.clone()),
                interruption_level: InterruptionLevel::for_priority(todo.priority),
            },
            requested_at: now,
        })
    }

    /// Replace the reminder for `todo` with one reflecting its current state.
    pub async fn schedule_reminder(
        &self,
        todo: &TodoItem,
        now: DateTime<Utc>,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        let id = todo.notification_id();
        self.cancel(&id);

        let request = match Self::reminder_request(todo, now) {
            Ok(request) => request,
            Err(reason) => {
                tracing::debug!(todo_id = %todo.id, ?reason, "reminder not scheduled");
                return Ok(ScheduleOutcome::Skipped { reason });
            }
        };

        self.register(request).await?;
        tracing::debug!(todo_id = %todo.id, notification_id = %id, "reminder scheduled");
        Ok(ScheduleOutcome::Scheduled { id })
    }

    /// Announce a finished mission after `delay_secs`.
    ///
    /// Each call gets a fresh id, so independent completions never replace
    /// one another. A zero delay is delivered after one second, the shortest
    /// interval delivery subsystems accept.
    pub async fn schedule_session_complete(
        &self,
        delay_secs: u64,
        mission_title: &str,
        xp_awarded: u64,
        now: DateTime<Utc>,
    ) -> Result<String, SchedulingError> {
        let id = format!("{SESSION_COMPLETE_PREFIX}{}", Uuid::new_v4());
        let request = NotificationRequest {
            id: id.clone(),
            trigger: Trigger::Delay {
                seconds: delay_secs.max(1),
            },
            content: NotificationContent {
                title: "Mission Complete!".to_string(),
                body: format!("{mission_title} is done. You earned {xp_awarded} XP."),
                subtitle: None,
                interruption_level: InterruptionLevel::Active,
            },
            requested_at: now,
        };
        self.register(request).await?;
        Ok(id)
    }

    pub fn cancel(&self, id: &str) {
        self.center.remove_pending(&[id.to_string()]);
    }

    pub fn cancel_many(&self, ids: &[String]) {
        if !ids.is_empty() {
            self.center.remove_pending(ids);
        }
    }

    pub fn cancel_all(&self) {
        self.center.remove_all_pending();
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.center.pending_ids()
    }

    async fn register(&self, request: NotificationRequest) -> Result<(), SchedulingError> {
        if !self.authorization.is_granted() {
            tracing::warn!(notification_id = %request.id, "notification permission not granted");
            return Err(SchedulingError::Denied);
        }
        let id = request.id.clone();
        self.center.add(request).await.map_err(|err| {
            tracing::warn!(notification_id = %id, error = %err, "delivery subsystem rejected notification");
            SchedulingError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use crate::notify::{InMemoryNotificationCenter, StaticAuthorization};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn scheduler(
        granted: bool,
    ) -> NotificationScheduler<InMemoryNotificationCenter, StaticAuthorization> {
        NotificationScheduler::new(
            Arc::new(InMemoryNotificationCenter::new()),
            Arc::new(StaticAuthorization::new(granted)),
        )
    }

    #[tokio::test]
    async fn critical_reminder_uses_critical_tier() {
        let s = scheduler(true);
        let todo = TodoItem::new("Submit taxes", now())
            .with_priority(Priority::Critical)
            .with_reminder(now() + Duration::seconds(60));

        let outcome = s.schedule_reminder(&todo, now()).await.unwrap();
        assert_eq!(outcome, ScheduleOutcome::Scheduled { id: todo.notification_id() });

        let request = s.center().get(&todo.notification_id()).unwrap();
        assert_eq!(request.content.interruption_level, InterruptionLevel::Critical);
        assert_eq!(request.content.title, "Critical Quest Alert");
        assert_eq!(request.content.body, "Submit taxes");
        assert_eq!(request.content.subtitle, None);
        assert_eq!(
            request.trigger,
            Trigger::Calendar(CalendarTrigger::at(now() + Duration::seconds(60)))
        );
    }

    #[tokio::test]
    async fn past_reminder_is_skipped() {
        let s = scheduler(true);
        let todo = TodoItem::new("Late", now()).with_reminder(now() - Duration::seconds(10));
        let outcome = s.schedule_reminder(&todo, now()).await.unwrap();
        assert_eq!(outcome, ScheduleOutcome::Skipped { reason: SkipReason::ReminderInPast });
        assert!(s.center().is_empty());
    }

    #[tokio::test]
    async fn reminder_due_now_is_skipped() {
        let s = scheduler(true);
        let todo = TodoItem::new("Right now", now()).with_reminder(now());
        let outcome = s.schedule_reminder(&todo, now()).await.unwrap();
        assert_eq!(outcome, ScheduleOutcome::Skipped { reason: SkipReason::ReminderInPast });
        assert!(s.center().is_empty());
    }

    #[tokio::test]
    async fn notes_become_the_subtitle_verbatim() {
        let s = scheduler(true);
        let todo = TodoItem::new("Pack", now())
            .with_notes("  passport, charger ")
            .with_reminder(now() + Duration::minutes(5));
        s.schedule_reminder(&todo, now()).await.unwrap();
        let request = s.center().get(&todo.notification_id()).unwrap();
        assert_eq!(request.content.subtitle.as_deref(), Some("  passport, charger "));
    }

    #[tokio::test]
    async fn rescheduling_replaces_instead_of_duplicating() {
        let s = scheduler(true);
        let mut todo = TodoItem::new("Call mom", now()).with_reminder(now() + Duration::hours(1));
        s.schedule_reminder(&todo, now()).await.unwrap();
        todo.title = "Call mom back".into();
        todo.notes = "about Sunday".into();
        s.schedule_reminder(&todo, now()).await.unwrap();

        assert_eq!(s.pending_ids(), vec![todo.notification_id()]);
        let request = s.center().get(&todo.notification_id()).unwrap();
        assert_eq!(request.content.body, "Call mom back");
        assert_eq!(request.content.subtitle.as_deref(), Some("about Sunday"));
    }

    #[tokio::test]
    async fn completing_cancels_existing_reminder() {
        let s = scheduler(true);
        let mut todo = TodoItem::new("Pay rent", now()).with_reminder(now() + Duration::hours(2));
        s.schedule_reminder(&todo, now()).await.unwrap();
        assert_eq!(s.center().len(), 1);

        todo.is_completed = true;
        let outcome = s.schedule_reminder(&todo, now()).await.unwrap();
        assert_eq!(outcome, ScheduleOutcome::Skipped { reason: SkipReason::Completed });
        assert!(s.center().is_empty());
    }

    #[tokio::test]
    async fn denied_permission_is_reported_without_registering() {
        let s = scheduler(false);
        let todo = TodoItem::new("Stretch", now()).with_reminder(now() + Duration::minutes(5));
        let before = todo.clone();
        let err = s.schedule_reminder(&todo, now()).await.unwrap_err();
        assert_eq!(err, SchedulingError::Denied);
        assert!(s.center().is_empty());
        assert_eq!(todo, before);
    }

    #[tokio::test]
    async fn delivery_failure_maps_to_failed() {
        let s = scheduler(true);
        s.center()
            .fail_with(Some(DeliveryError::Unavailable("daemon restarting".into())));
        let err = s
            .schedule_session_complete(0, "Deep work", 40, now())
            .await
            .unwrap_err();
        assert_eq!(err, SchedulingError::Failed("daemon restarting".into()));
    }

    #[tokio::test]
    async fn session_complete_ids_are_unique() {
        let s = scheduler(true);
        let a = s.schedule_session_complete(0, "A", 10, now()).await.unwrap();
        let b = s.schedule_session_complete(300, "B", 20, now()).await.unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with(SESSION_COMPLETE_PREFIX));

        let immediate = s.center().get(&a).unwrap();
        assert_eq!(immediate.trigger, Trigger::Delay { seconds: 1 });
        assert_eq!(immediate.content.body, "A is done. You earned 10 XP.");
        let deferred = s.center().get(&b).unwrap();
        assert_eq!(deferred.fire_at(), Some(now() + Duration::seconds(300)));
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let s = scheduler(true);
        s.cancel("never-scheduled");
        let id = s.schedule_session_complete(10, "A", 1, now()).await.unwrap();
        s.cancel(&id);
        s.cancel(&id);
        assert!(s.center().is_empty());
        s.cancel_all();
        assert!(s.center().is_empty());
    }
}
