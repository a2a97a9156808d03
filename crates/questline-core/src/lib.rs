//! # Questline Core Library
//!
//! This library provides the core business logic for Questline, a gamified
//! focus tracker where tasks are quests, focused time earns experience and
//! levels unlock rewards. It follows a CLI-first philosophy: every operation
//! is available through the standalone `questline` binary, which is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Session timer**: pure start/stop/reset transitions on a [`Quest`],
//!   with elapsed time derived from wall-clock timestamps
//! - **Leveling**: experience formula, level curve and reward catalog
//! - **Notifications**: reminder and completion-alert scheduling against a
//!   pluggable delivery subsystem
//! - **Coordinator**: serializes commands per entity and ties the above
//!   together against a [`MissionStore`]
//! - **Storage**: SQLite persistence, a SQLite notification outbox and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`MissionCoordinator`]: Command entry point
//! - [`NotificationScheduler`]: Reminder and alert bookkeeping
//! - [`Database`]: Quest, todo and profile persistence
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod leveling;
pub mod model;
pub mod notify;
pub mod storage;
pub mod store;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{
    CompleteOutcome, Completion, CompletionReport, MissionCoordinator, NotificationStatus,
    PauseOutcome, StartOutcome, TodoReport,
};
pub use error::{
    ConfigError, CoreError, DatabaseError, DeliveryError, SchedulingError, StoreError, TimerError,
};
pub use events::Event;
pub use leveling::{compute_reward, LevelCurve, LevelingRules, Reward, RewardCatalog, RewardDef};
pub use model::{PlayerProfile, Priority, Quest, TodoItem};
pub use notify::{
    Authorization, InMemoryNotificationCenter, NotificationCenter, NotificationRequest,
    NotificationScheduler, ScheduleOutcome, SkipReason, StaticAuthorization,
};
pub use storage::{Config, Database, NotificationOutbox};
pub use store::{MemoryStore, MissionStore};
