//! Todo management commands for CLI.

use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use questline_core::{Config, MissionStore, Priority, TodoItem};

use super::{open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum TodoAction {
    /// Create a new todo
    Add {
        /// Todo title
        title: String,
        /// Free-form notes, shown as the reminder subtitle
        #[arg(long)]
        notes: Option<String>,
        /// Priority: low, medium, high or critical
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Reminder time (RFC 3339, e.g. 2026-05-01T09:00:00Z)
        #[arg(long, conflicts_with = "remind_in")]
        remind_at: Option<DateTime<Utc>>,
        /// Reminder in this many minutes from now
        #[arg(long)]
        remind_in: Option<i64>,
    },
    /// Edit a todo and reschedule its reminder
    Edit {
        /// Todo ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
        /// New reminder time (RFC 3339)
        #[arg(long, conflicts_with_all = ["remind_in", "clear_reminder"])]
        remind_at: Option<DateTime<Utc>>,
        /// New reminder in this many minutes from now
        #[arg(long, conflicts_with = "clear_reminder")]
        remind_in: Option<i64>,
        /// Remove the reminder
        #[arg(long)]
        clear_reminder: bool,
        /// Set completed status
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a todo completed
    Complete {
        /// Todo ID
        id: String,
    },
    /// Delete a todo and its reminder
    Delete {
        /// Todo ID
        id: String,
    },
    /// List todos
    List {
        /// Include completed todos
        #[arg(long)]
        all: bool,
    },
}

pub async fn run(action: TodoAction) -> CliResult {
    let config = Config::load()?;
    let app = open_app(&config)?;
    let now = Utc::now();

    match action {
        TodoAction::Add {
            title,
            notes,
            priority,
            remind_at,
            remind_in,
        } => {
            let mut todo = TodoItem::new(title, now).with_priority(priority);
            if let Some(notes) = notes {
                todo = todo.with_notes(notes);
            }
            todo.reminder_date = reminder_time(remind_at, remind_in, now)?;
            let report = app.create_todo(todo).await?;
            print_json(&report)?;
        }
        TodoAction::Edit {
            id,
            title,
            notes,
            priority,
            remind_at,
            remind_in,
            clear_reminder,
            completed,
        } => {
            let mut todo = app.todo(&id)?;
            if let Some(title) = title {
                todo.title = title;
            }
            if let Some(notes) = notes {
                todo.notes = notes;
            }
            if let Some(priority) = priority {
                todo.priority = priority;
            }
            if clear_reminder {
                todo.reminder_date = None;
            } else if let Some(at) = reminder_time(remind_at, remind_in, now)? {
                todo.reminder_date = Some(at);
            }
            if let Some(completed) = completed {
                todo.is_completed = completed;
            }
            let report = app.save_todo(todo).await?;
            print_json(&report)?;
        }
        TodoAction::Complete { id } => {
            let report = app.complete_todo(&id).await?;
            print_json(&report)?;
        }
        TodoAction::Delete { id } => {
            app.delete_todo(&id).await?;
            println!("Todo deleted: {id}");
        }
        TodoAction::List { all } => {
            let todos: Vec<_> = app
                .store()
                .list_todos()?
                .into_iter()
                .filter(|todo| all || !todo.is_completed)
                .collect();
            print_json(&todos)?;
        }
    }
    Ok(())
}

fn reminder_time(
    at: Option<DateTime<Utc>>,
    in_minutes: Option<i64>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, String> {
    match (at, in_minutes) {
        (Some(at), _) => Ok(Some(at)),
        (None, Some(minutes)) => Duration::try_minutes(minutes)
            .and_then(|offset| now.checked_add_signed(offset))
            .map(Some)
            .ok_or_else(|| format!("reminder out of range: {minutes} minutes from now")),
        (None, None) => Ok(None),
    }
}
