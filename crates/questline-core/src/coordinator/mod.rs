//! Mission coordinator.
//!
//! The only component whose effects cross collaborator boundaries. It drives
//! the session timer and leveling engine against the store, then issues
//! scheduler commands.
//!
//! ## Quest lifecycle
//!
//! ```text
//! Idle --start--> Running --pause--> Idle (resumable)
//!                    |
//!                    +--complete--> Idle (completed, rewarded)
//! ```
//!
//! Every read-modify-write on an entity runs under that entity's lock. Locks
//! are released before waiting on the delivery subsystem for completion
//! alerts, so a slow or denied registration never stalls the timer.

mod locks;
mod outcome;

pub use locks::EntityLocks;
pub use outcome::{
    CompleteOutcome, Completion, CompletionReport, NotificationStatus, PauseOutcome, StartOutcome,
    TodoReport,
};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::clock::Clock;
use crate::error::{CoreError, Result, SchedulingError};
use crate::events::Event;
use crate::leveling::{compute_reward, LevelingRules};
use crate::model::{PlayerProfile, Quest, TodoItem};
use crate::notify::{Authorization, NotificationCenter, NotificationScheduler, ScheduleOutcome};
use crate::store::MissionStore;
use crate::timer;
use locks::{quest_key, todo_key, PROFILE_KEY};

const EVENT_CAPACITY: usize = 256;

pub struct MissionCoordinator<S, N, A, C> {
    store: Arc<S>,
    scheduler: NotificationScheduler<N, A>,
    clock: Arc<C>,
    rules: LevelingRules,
    locks: EntityLocks,
    events: broadcast::Sender<Event>,
}

impl<S, N, A, C> MissionCoordinator<S, N, A, C>
where
    S: MissionStore,
    N: NotificationCenter,
    A: Authorization,
    C: Clock,
{
    pub fn new(
        store: Arc<S>,
        scheduler: NotificationScheduler<N, A>,
        clock: Arc<C>,
        rules: LevelingRules,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            scheduler,
            clock,
            rules,
            locks: EntityLocks::new(),
            events,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn scheduler(&self) -> &NotificationScheduler<N, A> {
        &self.scheduler
    }

    pub fn rules(&self) -> &LevelingRules {
        &self.rules
    }

    pub fn quest(&self, id: &str) -> Result<Quest> {
        self.store
            .get_quest(id)?
            .ok_or_else(|| CoreError::QuestNotFound(id.to_string()))
    }

    pub fn todo(&self, id: &str) -> Result<TodoItem> {
        self.store
            .get_todo(id)?
            .ok_or_else(|| CoreError::TodoNotFound(id.to_string()))
    }

    /// Accumulated plus running time for a quest, computed at read time.
    pub fn live_elapsed(&self, id: &str) -> Result<u64> {
        let quest = self.quest(id)?;
        Ok(timer::live_elapsed(&quest, self.clock.now()))
    }

    /// The stored profile with its level checked against the curve.
    pub fn profile(&self) -> Result<PlayerProfile> {
        let mut profile = self.store.load_profile()?;
        profile.reconcile(&self.rules.curve);
        Ok(profile)
    }

    // ── Quest commands ───────────────────────────────────────────────

    pub async fn create_quest(&self, title: &str, is_boss_quest: bool) -> Result<Quest> {
        let mut quest = Quest::new(title, self.clock.now());
        quest.is_boss_quest = is_boss_quest;
        let _guard = self.locks.acquire(&quest_key(&quest.id)).await;
        self.store.put_quest(&quest)?;
        tracing::debug!(quest_id = %quest.id, boss = is_boss_quest, "quest created");
        Ok(quest)
    }

    pub async fn start_quest(&self, id: &str) -> Result<StartOutcome> {
        let _guard = self.locks.acquire(&quest_key(id)).await;
        let mut quest = self.quest(id)?;
        if quest.is_completed() {
            tracing::warn!(quest_id = %id, "start requested for a completed quest");
            return Ok(StartOutcome::AlreadyCompleted);
        }

        let now = self.clock.now();
        if let Err(err) = timer::start(&mut quest, now) {
            tracing::warn!(quest_id = %id, error = %err, "start ignored");
            return Ok(StartOutcome::AlreadyActive);
        }
        self.store.put_quest(&quest)?;
        tracing::debug!(quest_id = %id, "quest started");
        self.emit(Event::QuestStarted {
            quest_id: id.to_string(),
            at: now,
        });
        Ok(StartOutcome::Started)
    }

    pub async fn pause_quest(&self, id: &str) -> Result<PauseOutcome> {
        let _guard = self.locks.acquire(&quest_key(id)).await;
        let mut quest = self.quest(id)?;
        let now = self.clock.now();
        match timer::stop(&mut quest, now) {
            Ok(session_secs) => {
                self.store.put_quest(&quest)?;
                tracing::debug!(quest_id = %id, session_secs, "quest paused");
                self.emit(Event::QuestPaused {
                    quest_id: id.to_string(),
                    session_secs,
                    time_spent_secs: quest.time_spent_secs(),
                    at: now,
                });
                Ok(PauseOutcome::Paused {
                    session_secs,
                    time_spent_secs: quest.time_spent_secs(),
                })
            }
            Err(err) => {
                tracing::warn!(quest_id = %id, error = %err, "pause ignored");
                Ok(PauseOutcome::NotActive)
            }
        }
    }

    /// Finish a quest: stop its timer, award experience, then announce it.
    ///
    /// The quest and profile are committed before the alert is requested; a
    /// denied or failed alert is reported in the outcome and never rolls
    /// the reward back.
    pub async fn complete_quest(&self, id: &str, completion: Completion) -> Result<CompleteOutcome> {
        let (quest, reward, now) = {
            let _quest_guard = self.locks.acquire(&quest_key(id)).await;
            let now = self.clock.now();
            let mut quest = self.quest(id)?;
            if quest.is_completed() {
                tracing::warn!(quest_id = %id, "complete ignored: quest already completed");
                return Ok(CompleteOutcome::AlreadyCompleted);
            }
            if let Ok(session_secs) = timer::stop(&mut quest, now) {
                tracing::debug!(quest_id = %id, session_secs, "running session closed on completion");
            }

            let _profile_guard = self.locks.acquire(PROFILE_KEY).await;
            let mut profile = self.store.load_profile()?;
            profile.reconcile(&self.rules.curve);
            let reward = compute_reward(&quest, &profile, now, &self.rules);
            let updated = reward.apply(&profile);
            quest.mark_completed(now);
            self.store.commit_completion(&quest, &updated)?;
            (quest, reward, now)
        };

        self.emit(Event::QuestCompleted {
            quest_id: id.to_string(),
            time_spent_secs: quest.time_spent_secs(),
            xp_gained: reward.xp_gained,
            at: now,
        });
        if reward.leveled_up {
            tracing::info!(
                from = reward.previous_level,
                to = reward.new_level,
                "level up"
            );
            self.emit(Event::LeveledUp {
                from_level: reward.previous_level,
                to_level: reward.new_level,
                at: now,
            });
        }
        if !reward.unlocked_rewards.is_empty() {
            self.emit(Event::RewardsUnlocked {
                rewards: reward.unlocked_rewards.clone(),
                at: now,
            });
        }

        let delay_secs = completion.delay_secs();
        let alert = match self
            .scheduler
            .schedule_session_complete(delay_secs, &quest.title, reward.xp_gained, now)
            .await
        {
            Ok(notification_id) => match self.remember_alert(id, &notification_id).await {
                Ok(()) => {
                    self.emit(Event::SessionAlertScheduled {
                        quest_id: id.to_string(),
                        notification_id: notification_id.clone(),
                        delay_secs,
                        at: now,
                    });
                    NotificationStatus::Scheduled { id: notification_id }
                }
                Err(err) => {
                    // An alert the quest doesn't know about could never be cancelled.
                    self.scheduler.cancel(&notification_id);
                    tracing::warn!(quest_id = %id, error = %err, "completion alert dropped");
                    let err = SchedulingError::Failed(err.to_string());
                    self.report_scheduling_error(id, &err, now);
                    err.into()
                }
            },
            Err(err) => {
                self.report_scheduling_error(id, &err, now);
                err.into()
            }
        };

        let quest = match self.store.get_quest(id) {
            Ok(Some(stored)) => stored,
            Ok(None) => quest,
            Err(err) => {
                tracing::warn!(quest_id = %id, error = %err, "re-reading completed quest failed");
                quest
            }
        };
        Ok(CompleteOutcome::Completed(CompletionReport {
            quest,
            reward,
            alert,
        }))
    }

    /// Clear a quest's accumulated time and any running session.
    pub async fn reset_quest(&self, id: &str) -> Result<Quest> {
        let _guard = self.locks.acquire(&quest_key(id)).await;
        let mut quest = self.quest(id)?;
        timer::reset(&mut quest);
        self.store.put_quest(&quest)?;
        self.emit(Event::QuestReset {
            quest_id: id.to_string(),
            at: self.clock.now(),
        });
        Ok(quest)
    }

    /// Delete a quest and cancel every notification scheduled on its behalf.
    pub async fn delete_quest(&self, id: &str) -> Result<()> {
        let key = quest_key(id);
        let guard = self.locks.acquire(&key).await;
        let quest = self.quest(id)?;
        let ids = quest.pending_notification_ids().to_vec();
        self.scheduler.cancel_many(&ids);
        self.store.delete_quest(id)?;
        drop(guard);
        self.locks.forget(&key);

        tracing::debug!(quest_id = %id, cancelled = ids.len(), "quest deleted");
        self.emit(Event::QuestDeleted {
            quest_id: id.to_string(),
            cancelled_notifications: ids.len(),
            at: self.clock.now(),
        });
        Ok(())
    }

    // ── Todo commands ────────────────────────────────────────────────

    pub async fn create_todo(&self, todo: TodoItem) -> Result<TodoReport> {
        self.save_todo(todo).await
    }

    /// Persist an edited todo and bring its reminder in line with it.
    pub async fn save_todo(&self, todo: TodoItem) -> Result<TodoReport> {
        let _guard = self.locks.acquire(&todo_key(&todo.id)).await;
        self.store.put_todo(&todo)?;
        let reminder = self.sync_reminder(&todo).await;
        Ok(TodoReport { todo, reminder })
    }

    pub async fn complete_todo(&self, id: &str) -> Result<TodoReport> {
        let _guard = self.locks.acquire(&todo_key(id)).await;
        let mut todo = self.todo(id)?;
        todo.is_completed = true;
        self.store.put_todo(&todo)?;
        let reminder = self.sync_reminder(&todo).await;
        Ok(TodoReport { todo, reminder })
    }

    pub async fn delete_todo(&self, id: &str) -> Result<()> {
        let key = todo_key(id);
        let guard = self.locks.acquire(&key).await;
        let todo = self.todo(id)?;
        self.scheduler.cancel(&todo.notification_id());
        self.store.delete_todo(id)?;
        drop(guard);
        self.locks.forget(&key);
        tracing::debug!(todo_id = %id, "todo deleted");
        Ok(())
    }

    // ── Notifications ────────────────────────────────────────────────

    /// Re-run reminder scheduling for every stored todo, e.g. right after
    /// the user grants notification permission.
    pub async fn reschedule_all_reminders(&self) -> Result<Vec<TodoReport>> {
        let mut reports = Vec::new();
        for todo in self.store.list_todos()? {
            let _guard = self.locks.acquire(&todo_key(&todo.id)).await;
            let Some(current) = self.store.get_todo(&todo.id)? else {
                continue;
            };
            let reminder = self.sync_reminder(&current).await;
            reports.push(TodoReport {
                todo: current,
                reminder,
            });
        }
        Ok(reports)
    }

    /// Ask for notification permission; on success, restore reminders.
    pub async fn request_authorization(&self) -> Result<bool> {
        let granted = self.scheduler.authorization().request().await;
        if granted {
            self.reschedule_all_reminders().await?;
        }
        Ok(granted)
    }

    pub fn cancel_all_notifications(&self) {
        self.scheduler.cancel_all();
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn sync_reminder(&self, todo: &TodoItem) -> NotificationStatus {
        let now = self.clock.now();
        let result = self.scheduler.schedule_reminder(todo, now).await;
        match &result {
            Ok(ScheduleOutcome::Scheduled { id }) => self.emit(Event::ReminderScheduled {
                todo_id: todo.id.clone(),
                notification_id: id.clone(),
                at: now,
            }),
            Ok(ScheduleOutcome::Skipped { reason }) => self.emit(Event::ReminderCleared {
                todo_id: todo.id.clone(),
                reason: *reason,
                at: now,
            }),
            Err(err) => self.report_scheduling_error(&todo.id, err, now),
        }
        result.into()
    }

    /// Record an alert id on its quest so deletion can cancel it. If the
    /// quest vanished in the meantime the alert is cancelled instead.
    async fn remember_alert(&self, quest_id: &str, notification_id: &str) -> Result<()> {
        let _guard = self.locks.acquire(&quest_key(quest_id)).await;
        match self.store.get_quest(quest_id)? {
            Some(mut quest) => {
                quest.pending_notification_ids.push(notification_id.to_string());
                self.store.put_quest(&quest)?;
            }
            None => self.scheduler.cancel(notification_id),
        }
        Ok(())
    }

    fn report_scheduling_error(&self, subject_id: &str, err: &SchedulingError, at: DateTime<Utc>) {
        let event = match err {
            SchedulingError::Denied => Event::SchedulingDenied {
                subject_id: subject_id.to_string(),
                at,
            },
            SchedulingError::Failed(message) => Event::SchedulingFailed {
                subject_id: subject_id.to_string(),
                message: message.clone(),
                at,
            },
        };
        self.emit(event);
    }

    fn emit(&self, event: Event) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}
