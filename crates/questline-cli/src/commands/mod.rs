pub mod config;
pub mod notify;
pub mod profile;
pub mod quest;
pub mod todo;

use std::sync::Arc;

use questline_core::{
    Config, CoreError, Database, MissionCoordinator, NotificationOutbox, NotificationScheduler,
    StaticAuthorization, SystemClock,
};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub type App =
    MissionCoordinator<Database, NotificationOutbox, StaticAuthorization, SystemClock>;

/// Build a coordinator over the on-disk store and outbox.
pub fn open_app(config: &Config) -> Result<App, CoreError> {
    let store = Arc::new(Database::open()?);
    let outbox = Arc::new(NotificationOutbox::open()?);
    let auth = Arc::new(StaticAuthorization::new(config.notifications.enabled));
    Ok(MissionCoordinator::new(
        store,
        NotificationScheduler::new(outbox, auth),
        Arc::new(SystemClock),
        config.leveling_rules(),
    ))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
