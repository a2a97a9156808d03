//! Notification outbox commands.
//!
//! The CLI has no platform notification center; scheduled requests wait in
//! the outbox and `due` hands back the ones whose fire time has passed.

use chrono::Utc;
use clap::Subcommand;
use questline_core::Config;
use serde_json::json;

use super::{open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// List pending notifications, soonest first
    List,
    /// Deliver (print and remove) notifications that are due
    Due,
    /// Cancel every pending notification
    CancelAll,
    /// Enable notifications and restore todo reminders
    Authorize,
}

pub async fn run(action: NotifyAction) -> CliResult {
    let mut config = Config::load()?;

    match action {
        NotifyAction::List => {
            let app = open_app(&config)?;
            let pending = app.scheduler().center().pending()?;
            print_json(&pending)?;
        }
        NotifyAction::Due => {
            let app = open_app(&config)?;
            let due = app.scheduler().center().take_due(Utc::now())?;
            print_json(&due)?;
        }
        NotifyAction::CancelAll => {
            let app = open_app(&config)?;
            let count = app.scheduler().pending_ids().len();
            app.cancel_all_notifications();
            print_json(&json!({ "cancelled": count }))?;
        }
        NotifyAction::Authorize => {
            config.set("notifications.enabled", "true")?;
            let app = open_app(&config)?;
            let granted = app.request_authorization().await?;
            let reminders = app.scheduler().pending_ids().len();
            print_json(&json!({ "granted": granted, "pending": reminders }))?;
        }
    }
    Ok(())
}
