//! SQLite-backed [`MissionStore`].
//!
//! Provides persistent storage for:
//! - Quests, including their timer fields, so a running session survives restarts
//! - Todos
//! - The single player profile

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::{CoreError, DatabaseError, StoreError};
use crate::model::{PlayerProfile, Priority, Quest, TodoItem};
use crate::store::MissionStore;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS quests (
        id                       TEXT PRIMARY KEY,
        title                    TEXT NOT NULL,
        is_boss_quest            INTEGER NOT NULL DEFAULT 0,
        is_timer_active          INTEGER NOT NULL DEFAULT 0,
        last_started_at          TEXT,
        time_spent_secs          INTEGER NOT NULL DEFAULT 0,
        is_completed             INTEGER NOT NULL DEFAULT 0,
        completed_at             TEXT,
        pending_notification_ids TEXT NOT NULL DEFAULT '[]',
        created_at               TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS todos (
        id            TEXT PRIMARY KEY,
        title         TEXT NOT NULL,
        notes         TEXT NOT NULL DEFAULT '',
        is_completed  INTEGER NOT NULL DEFAULT 0,
        priority      TEXT NOT NULL DEFAULT 'medium',
        reminder_date TEXT,
        created_at    TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS profile (
        id               INTEGER PRIMARY KEY CHECK (id = 1),
        level            INTEGER NOT NULL,
        experience       INTEGER NOT NULL,
        quests_completed INTEGER NOT NULL DEFAULT 0,
        unlocked_rewards TEXT NOT NULL DEFAULT '[]'
    );

    CREATE INDEX IF NOT EXISTS idx_quests_created_at ON quests(created_at);
    CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at);
";

const QUEST_COLUMNS: &str = "id, title, is_boss_quest, is_timer_active, last_started_at,
    time_spent_secs, is_completed, completed_at, pending_notification_ids, created_at";

const TODO_COLUMNS: &str = "id, title, notes, is_completed, priority, reminder_date, created_at";

/// SQLite database for quests, todos and the player profile.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `<data_dir>/questline.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
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

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DatabaseError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

// === Row mapping ===

fn parse_datetime(id: &str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            id: id.to_string(),
            message: format!("bad timestamp '{value}': {e}"),
        })
}

fn parse_optional_datetime(id: &str, value: Option<String>) -> Result<Option<DateTime<Utc>>, StoreError> {
    value.map(|v| parse_datetime(id, &v)).transpose()
}

fn parse_string_list(id: &str, value: &str) -> Result<Vec<String>, StoreError> {
    serde_json::from_str(value).map_err(|e| StoreError::Corrupt {
        id: id.to_string(),
        message: format!("bad list: {e}"),
    })
}

fn encode_string_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

struct QuestRow {
    id: String,
    title: String,
    is_boss_quest: bool,
    is_timer_active: bool,
    last_started_at: Option<String>,
    time_spent_secs: u64,
    is_completed: bool,
    completed_at: Option<String>,
    pending_notification_ids: String,
    created_at: String,
}

impl QuestRow {
    fn read(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            is_boss_quest: row.get(2)?,
            is_timer_active: row.get(3)?,
            last_started_at: row.get(4)?,
            time_spent_secs: row.get(5)?,
            is_completed: row.get(6)?,
            completed_at: row.get(7)?,
            pending_notification_ids: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    fn into_quest(self) -> Result<Quest, StoreError> {
        let last_started_at = parse_optional_datetime(&self.id, self.last_started_at)?;
        if self.is_timer_active != last_started_at.is_some() {
            return Err(StoreError::Corrupt {
                id: self.id,
                message: "timer flag disagrees with session start".to_string(),
            });
        }
        Ok(Quest {
            title: self.title,
            is_boss_quest: self.is_boss_quest,
            is_timer_active: self.is_timer_active,
            last_started_at,
            time_spent_secs: self.time_spent_secs,
            is_completed: self.is_completed,
            completed_at: parse_optional_datetime(&self.id, self.completed_at)?,
            pending_notification_ids: parse_string_list(&self.id, &self.pending_notification_ids)?,
            created_at: parse_datetime(&self.id, &self.created_at)?,
            id: self.id,
        })
    }
}

struct TodoRow {
    id: String,
    title: String,
    notes: String,
    is_completed: bool,
    priority: String,
    reminder_date: Option<String>,
    created_at: String,
}

impl TodoRow {
    fn read(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            notes: row.get(2)?,
            is_completed: row.get(3)?,
            priority: row.get(4)?,
            reminder_date: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_todo(self) -> Result<TodoItem, StoreError> {
        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(|message| StoreError::Corrupt {
                id: self.id.clone(),
                message,
            })?;
        Ok(TodoItem {
            title: self.title,
            notes: self.notes,
            is_completed: self.is_completed,
            priority,
            reminder_date: parse_optional_datetime(&self.id, self.reminder_date)?,
            created_at: parse_datetime(&self.id, &self.created_at)?,
            id: self.id,
        })
    }
}

fn upsert_quest(conn: &Connection, quest: &Quest) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO quests (id, title, is_boss_quest, is_timer_active, last_started_at,
            time_spent_secs, is_completed, completed_at, pending_notification_ids, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            quest.id,
            quest.title,
            quest.is_boss_quest,
            quest.is_timer_active,
            quest.last_started_at.map(|t| t.to_rfc3339()),
            quest.time_spent_secs,
            quest.is_completed,
            quest.completed_at.map(|t| t.to_rfc3339()),
            encode_string_list(&quest.pending_notification_ids),
            quest.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn upsert_profile(conn: &Connection, profile: &PlayerProfile) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO profile (id, level, experience, quests_completed, unlocked_rewards)
         VALUES (1, ?1, ?2, ?3, ?4)",
        params![
            profile.level,
            profile.experience,
            profile.quests_completed,
            encode_string_list(&profile.unlocked_rewards),
        ],
    )?;
    Ok(())
}

impl MissionStore for Database {
    fn get_quest(&self, id: &str) -> Result<Option<Quest>, StoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {QUEST_COLUMNS} FROM quests WHERE id = ?1"),
                params![id],
                QuestRow::read,
            )
            .optional()?;
        row.map(QuestRow::into_quest).transpose()
    }

    fn put_quest(&self, quest: &Quest) -> Result<(), StoreError> {
        let conn = self.conn()?;
        upsert_quest(&conn, quest)?;
        Ok(())
    }

    fn delete_quest(&self, id: &str) -> Result<bool, StoreError> {
        let changed = self
            .conn()?
            .execute("DELETE FROM quests WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn list_quests(&self) -> Result<Vec<Quest>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {QUEST_COLUMNS} FROM quests ORDER BY created_at"
        ))?;
        let rows = stmt.query_map([], QuestRow::read)?;
        let mut quests = Vec::new();
        for row in rows {
            quests.push(row?.into_quest()?);
        }
        Ok(quests)
    }

    fn get_todo(&self, id: &str) -> Result<Option<TodoItem>, StoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1"),
                params![id],
                TodoRow::read,
            )
            .optional()?;
        row.map(TodoRow::into_todo).transpose()
    }

    fn put_todo(&self, todo: &TodoItem) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO todos (id, title, notes, is_completed, priority, reminder_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                todo.id,
                todo.title,
                todo.notes,
                todo.is_completed,
                todo.priority.as_str(),
                todo.reminder_date.map(|t| t.to_rfc3339()),
                todo.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete_todo(&self, id: &str) -> Result<bool, StoreError> {
        let changed = self
            .conn()?
            .execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn list_todos(&self) -> Result<Vec<TodoItem>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at"
        ))?;
        let rows = stmt.query_map([], TodoRow::read)?;
        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?.into_todo()?);
        }
        Ok(todos)
    }

    fn load_profile(&self) -> Result<PlayerProfile, StoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT level, experience, quests_completed, unlocked_rewards FROM profile WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, u64>(1)?,
                        row.get::<_, u64>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        match row {
            Some((level, experience, quests_completed, rewards)) => Ok(PlayerProfile {
                level,
                experience,
                quests_completed,
                unlocked_rewards: parse_string_list("profile", &rewards)?,
            }),
            None => Ok(PlayerProfile::default()),
        }
    }

    fn save_profile(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        let conn = self.conn()?;
        upsert_profile(&conn, profile)?;
        Ok(())
    }

    fn commit_completion(&self, quest: &Quest, profile: &PlayerProfile) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        upsert_quest(&tx, quest)?;
        upsert_profile(&tx, profile)?;
        tx.commit()?;
        Ok(())
    }
}
