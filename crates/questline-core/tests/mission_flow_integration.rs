//! End-to-end mission flows against the SQLite store and notification outbox.
//!
//! Each test opens its own database file in a temp directory and drives the
//! coordinator with a manual clock, reopening storage where a flow has to
//! survive a restart.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use questline_core::notify::Trigger;
use questline_core::{
    CompleteOutcome, Completion, Database, Event, LevelingRules, ManualClock, MissionCoordinator,
    MissionStore, NotificationOutbox, NotificationScheduler, NotificationStatus, PauseOutcome,
    Priority, StartOutcome, StaticAuthorization, TodoItem,
};

type Coordinator =
    MissionCoordinator<Database, NotificationOutbox, StaticAuthorization, ManualClock>;

// ============================================================================
// Test Helpers
// ============================================================================

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 6, 8, 30, 0).unwrap()
}

struct App {
    coordinator: Coordinator,
    clock: Arc<ManualClock>,
    outbox: Arc<NotificationOutbox>,
    auth: Arc<StaticAuthorization>,
}

fn open_app(dir: &Path, clock: Arc<ManualClock>, granted: bool) -> App {
    let store = Arc::new(Database::open_at(&dir.join("questline.db")).unwrap());
    let outbox = Arc::new(NotificationOutbox::open_at(&dir.join("outbox.db")).unwrap());
    let auth = Arc::new(StaticAuthorization::new(granted));
    let coordinator = MissionCoordinator::new(
        store,
        NotificationScheduler::new(outbox.clone(), auth.clone()),
        clock.clone(),
        LevelingRules::default(),
    );
    App {
        coordinator,
        clock,
        outbox,
        auth,
    }
}

// ============================================================================
// Quest flows
// ============================================================================

#[tokio::test]
async fn boss_quest_levels_up_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(dir.path(), Arc::new(ManualClock::new(t0())), true);
    let mut events = app.coordinator.subscribe();

    let quest = app.coordinator.create_quest("Slay the backlog", true).await.unwrap();
    app.coordinator.start_quest(&quest.id).await.unwrap();
    app.clock.advance(Duration::minutes(25));

    let CompleteOutcome::Completed(report) = app
        .coordinator
        .complete_quest(&quest.id, Completion::After(90))
        .await
        .unwrap()
    else {
        panic!("expected completion");
    };

    assert_eq!(report.reward.xp_gained, 100);
    assert_eq!(report.reward.new_level, 2);
    assert_eq!(report.reward.unlocked_rewards, vec!["Bronze Focus Badge".to_string()]);

    let NotificationStatus::Scheduled { id } = &report.alert else {
        panic!("expected a scheduled alert, got {:?}", report.alert);
    };
    let pending = app.outbox.pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(&pending[0].id, id);
    assert_eq!(pending[0].trigger, Trigger::Delay { seconds: 90 });
    assert_eq!(
        pending[0].content.body,
        "Slay the backlog is done. You earned 100 XP."
    );

    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        kinds.push(event);
    }
    assert!(kinds.iter().any(|e| matches!(e, Event::LeveledUp { from_level: 1, to_level: 2, .. })));
    assert!(kinds.iter().any(|e| matches!(e, Event::RewardsUnlocked { .. })));

    drop(app);
    let reopened = open_app(dir.path(), Arc::new(ManualClock::new(t0())), true);
    let profile = reopened.coordinator.profile().unwrap();
    assert_eq!(profile.level, 2);
    assert_eq!(profile.experience, 100);
    assert_eq!(profile.unlocked_rewards, vec!["Bronze Focus Badge".to_string()]);
    let stored = reopened.coordinator.quest(&quest.id).unwrap();
    assert!(stored.is_completed());
    assert_eq!(stored.pending_notification_ids(), [id.clone()].as_slice());
}

#[tokio::test]
async fn running_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(t0()));
    let app = open_app(dir.path(), clock.clone(), true);

    let quest = app.coordinator.create_quest("Read chapter 4", false).await.unwrap();
    app.coordinator.start_quest(&quest.id).await.unwrap();
    clock.advance_secs(120);
    drop(app);

    // Time keeps passing while nothing is running.
    clock.advance_secs(480);
    let app = open_app(dir.path(), clock.clone(), true);
    assert_eq!(app.coordinator.live_elapsed(&quest.id).unwrap(), 600);
    assert_eq!(
        app.coordinator.start_quest(&quest.id).await.unwrap(),
        StartOutcome::AlreadyActive
    );
    assert_eq!(
        app.coordinator.pause_quest(&quest.id).await.unwrap(),
        PauseOutcome::Paused {
            session_secs: 600,
            time_spent_secs: 600
        }
    );
}

#[tokio::test]
async fn deleting_a_quest_cancels_its_alerts() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(dir.path(), Arc::new(ManualClock::new(t0())), true);

    let quest = app.coordinator.create_quest("Plan sprint", false).await.unwrap();
    app.coordinator.start_quest(&quest.id).await.unwrap();
    app.clock.advance_secs(600);
    app.coordinator
        .complete_quest(&quest.id, Completion::After(3600))
        .await
        .unwrap();
    assert_eq!(app.outbox.pending().unwrap().len(), 1);

    app.coordinator.delete_quest(&quest.id).await.unwrap();
    assert!(app.outbox.pending().unwrap().is_empty());
    assert!(app.coordinator.store().get_quest(&quest.id).unwrap().is_none());
}

#[tokio::test]
async fn denied_permission_still_awards_experience() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(dir.path(), Arc::new(ManualClock::new(t0())), false);

    let quest = app.coordinator.create_quest("Quiet work", false).await.unwrap();
    app.coordinator.start_quest(&quest.id).await.unwrap();
    app.clock.advance(Duration::minutes(10));
    let CompleteOutcome::Completed(report) = app
        .coordinator
        .complete_quest(&quest.id, Completion::Now)
        .await
        .unwrap()
    else {
        panic!("expected completion");
    };

    assert_eq!(report.alert, NotificationStatus::Denied);
    assert_eq!(report.reward.xp_gained, 20);
    assert_eq!(app.coordinator.profile().unwrap().experience, 20);
    assert!(app.outbox.pending().unwrap().is_empty());
}

#[tokio::test]
async fn unrepresentable_alert_delay_fails_without_undoing_the_reward() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(dir.path(), Arc::new(ManualClock::new(t0())), true);

    let quest = app.coordinator.create_quest("Endless", false).await.unwrap();
    app.coordinator.start_quest(&quest.id).await.unwrap();
    app.clock.advance(Duration::minutes(5));
    let CompleteOutcome::Completed(report) = app
        .coordinator
        .complete_quest(&quest.id, Completion::After(u64::MAX))
        .await
        .unwrap()
    else {
        panic!("expected completion");
    };

    assert!(matches!(report.alert, NotificationStatus::Failed { .. }));
    assert!(app.outbox.pending().unwrap().is_empty());
    assert!(app.coordinator.quest(&quest.id).unwrap().is_completed());
    assert_eq!(app.coordinator.profile().unwrap().experience, 10);
}

// ============================================================================
// Todo reminders
// ============================================================================

#[tokio::test]
async fn reminders_follow_todo_edits_and_come_due() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(dir.path(), Arc::new(ManualClock::new(t0())), true);

    let todo = TodoItem::new("Call the dentist", t0())
        .with_priority(Priority::High)
        .with_reminder(t0() + Duration::hours(2));
    let report = app.coordinator.create_todo(todo.clone()).await.unwrap();
    assert_eq!(
        report.reminder,
        NotificationStatus::Scheduled {
            id: todo.notification_id()
        }
    );

    // Moving the reminder replaces the pending request rather than adding one.
    let mut edited = todo.clone();
    edited.reminder_date = Some(t0() + Duration::hours(1));
    app.coordinator.save_todo(edited).await.unwrap();
    let pending = app.outbox.pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].content.title, "Urgent Quest");

    assert!(app.outbox.take_due(t0() + Duration::minutes(30)).unwrap().is_empty());
    let due = app.outbox.take_due(t0() + Duration::hours(1)).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, todo.notification_id());
    assert!(app.outbox.pending().unwrap().is_empty());
}

#[tokio::test]
async fn granting_permission_restores_reminders() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(dir.path(), Arc::new(ManualClock::new(t0())), false);

    let todo = TodoItem::new("Submit report", t0()).with_reminder(t0() + Duration::days(1));
    let report = app.coordinator.create_todo(todo.clone()).await.unwrap();
    assert_eq!(report.reminder, NotificationStatus::Denied);
    assert!(app.outbox.pending().unwrap().is_empty());

    app.auth.set(true);
    assert!(app.coordinator.request_authorization().await.unwrap());
    let pending = app.outbox.pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, todo.notification_id());

    app.coordinator.complete_todo(&todo.id).await.unwrap();
    assert!(app.outbox.pending().unwrap().is_empty());
}
