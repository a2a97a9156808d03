//! SQLite-backed pending-notification store.
//!
//! Stands in for a platform notification center: registrations land in a
//! table keyed by notification id, and a front-end delivers whatever is
//! due with [`NotificationOutbox::take_due`].

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::{CoreError, DatabaseError, DeliveryError, StoreError};
use crate::notify::{NotificationCenter, NotificationRequest};

pub struct NotificationOutbox {
    conn: Mutex<Connection>,
}

impl NotificationOutbox {
    /// Open the outbox inside `<data_dir>/questline.db`.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("questline.db");
        Self::open_at(&path).map_err(|e| CoreError::Store(e.into()))
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DatabaseError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS pending_notifications (
                id       TEXT PRIMARY KEY,
                fire_at  TEXT NOT NULL,
                request  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_pending_notifications_fire_at
                ON pending_notifications(fire_at);",
        )
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// All pending requests, soonest first.
    pub fn pending(&self) -> Result<Vec<NotificationRequest>, StoreError> {
        let conn = self.conn()?;
        read_requests(&conn, "SELECT id, request FROM pending_notifications ORDER BY fire_at, id", None)
    }

    /// Remove and return every request due at `now`.
    pub fn take_due(&self, now: DateTime<Utc>) -> Result<Vec<NotificationRequest>, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let cutoff = now.to_rfc3339();
        let due = read_requests(
            &tx,
            "SELECT id, request FROM pending_notifications WHERE fire_at <= ?1 ORDER BY fire_at, id",
            Some(&cutoff),
        )?;
        tx.execute(
            "DELETE FROM pending_notifications WHERE fire_at <= ?1",
            params![cutoff],
        )?;
        tx.commit()?;
        Ok(due)
    }
}

fn read_requests(
    conn: &Connection,
    sql: &str,
    cutoff: Option<&str>,
) -> Result<Vec<NotificationRequest>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(String, String)> {
        Ok((row.get(0)?, row.get(1)?))
    };
    let rows = match cutoff {
        Some(cutoff) => stmt.query_map(params![cutoff], map)?.collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?,
    };
    rows.into_iter()
        .map(|(id, json)| {
            serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
                id,
                message: e.to_string(),
            })
        })
        .collect()
}

impl NotificationCenter for NotificationOutbox {
    async fn add(&self, request: NotificationRequest) -> Result<(), DeliveryError> {
        let fire_at = request
            .fire_at()
            .ok_or_else(|| DeliveryError::Unavailable(format!("unrepresentable trigger for {}", request.id)))?;
        let json = serde_json::to_string(&request)
            .map_err(|e| DeliveryError::Unavailable(e.to_string()))?;
        let conn = self
            .conn()
            .map_err(|e| DeliveryError::Unavailable(e.to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO pending_notifications (id, fire_at, request) VALUES (?1, ?2, ?3)",
            params![request.id, fire_at.to_rfc3339(), json],
        )
        .map_err(|e| DeliveryError::Unavailable(e.to_string()))?;
        Ok(())
    }

    fn remove_pending(&self, ids: &[String]) {
        let result = self.conn().and_then(|conn| {
            for id in ids {
                conn.execute("DELETE FROM pending_notifications WHERE id = ?1", params![id])?;
            }
            Ok(())
        });
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to remove pending notifications");
        }
    }

    fn remove_all_pending(&self) {
        let result = self
            .conn()
            .and_then(|conn| Ok(conn.execute("DELETE FROM pending_notifications", [])?));
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to clear pending notifications");
        }
    }

    fn pending_ids(&self) -> Vec<String> {
        match self.pending() {
            Ok(requests) => requests.into_iter().map(|r| r.id).collect(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to list pending notifications");
                Vec::new()
            }
        }
    }
}
