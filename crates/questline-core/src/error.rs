//! Core error types for questline-core.
//!
//! Timer misuse and scheduling failures are modelled as their own small
//! enums so callers can treat them as outcomes rather than fatal errors.
//! Everything that can actually abort an operation funnels into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for questline-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No quest with the given id exists in the store
    #[error("Quest not found: {0}")]
    QuestNotFound(String),

    /// No todo with the given id exists in the store
    #[error("Todo not found: {0}")]
    TodoNotFound(String),

    /// Durable store failures
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Session timer misuse. Both variants leave the quest untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer is already active")]
    AlreadyActive,

    #[error("timer is not active")]
    NotActive,
}

/// Non-fatal scheduling failures reported by the notification scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    /// Notification permission is not granted
    #[error("notification scheduling denied: permission not granted")]
    Denied,

    /// The delivery subsystem rejected the request
    #[error("notification scheduling failed: {0}")]
    Failed(String),
}

/// Errors returned by a notification delivery subsystem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("not authorized to deliver notifications")]
    NotAuthorized,

    #[error("delivery subsystem unavailable: {0}")]
    Unavailable(String),
}

impl From<DeliveryError> for SchedulingError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::NotAuthorized => SchedulingError::Denied,
            DeliveryError::Unavailable(msg) => SchedulingError::Failed(msg),
        }
    }
}

/// Errors raised by a [`MissionStore`](crate::store::MissionStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// A stored record could not be decoded
    #[error("Corrupt record '{id}': {message}")]
    Corrupt { id: String, message: String },

    /// The store's internal lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_errors_map_to_scheduling_errors() {
        assert_eq!(
            SchedulingError::from(DeliveryError::NotAuthorized),
            SchedulingError::Denied
        );
        assert_eq!(
            SchedulingError::from(DeliveryError::Unavailable("offline".into())),
            SchedulingError::Failed("offline".into())
        );
    }

    #[test]
    fn store_error_wraps_into_core_error() {
        let err: CoreError = StoreError::Poisoned.into();
        assert_eq!(err.to_string(), "Store error: Store lock poisoned");
    }

    #[test]
    fn lookup_and_config_errors_display() {
        assert_eq!(
            CoreError::QuestNotFound("q-1".into()).to_string(),
            "Quest not found: q-1"
        );
        assert_eq!(
            CoreError::TodoNotFound("t-1".into()).to_string(),
            "Todo not found: t-1"
        );
        let err: CoreError = ConfigError::UnknownKey("leveling.nope".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: leveling.nope"
        );
    }
}
