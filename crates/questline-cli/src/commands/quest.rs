//! Quest lifecycle commands for CLI.

use clap::Subcommand;
use questline_core::{Completion, Config, MissionStore};
use serde_json::json;

use super::{open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum QuestAction {
    /// Create a new quest
    Add {
        /// Quest title
        title: String,
        /// Mark as a boss quest (double experience)
        #[arg(long)]
        boss: bool,
    },
    /// List quests
    List {
        /// Include completed quests
        #[arg(long)]
        all: bool,
    },
    /// Start or resume the session timer
    Start {
        /// Quest ID
        id: String,
    },
    /// Pause the session timer
    Pause {
        /// Quest ID
        id: String,
    },
    /// Complete a quest and collect its experience
    Complete {
        /// Quest ID
        id: String,
        /// Delay the completion alert by this many seconds
        #[arg(long)]
        after: Option<u64>,
    },
    /// Clear accumulated time
    Reset {
        /// Quest ID
        id: String,
    },
    /// Delete a quest and its pending alerts
    Delete {
        /// Quest ID
        id: String,
    },
    /// Show a quest with its live elapsed time
    Status {
        /// Quest ID
        id: String,
    },
}

pub async fn run(action: QuestAction) -> CliResult {
    let config = Config::load()?;
    let app = open_app(&config)?;

    match action {
        QuestAction::Add { title, boss } => {
            let quest = app.create_quest(&title, boss).await?;
            print_json(&quest)?;
        }
        QuestAction::List { all } => {
            let quests: Vec<_> = app
                .store()
                .list_quests()?
                .into_iter()
                .filter(|quest| all || !quest.is_completed())
                .collect();
            print_json(&quests)?;
        }
        QuestAction::Start { id } => {
            let outcome = app.start_quest(&id).await?;
            print_json(&json!({ "id": id, "outcome": outcome }))?;
        }
        QuestAction::Pause { id } => {
            let outcome = app.pause_quest(&id).await?;
            print_json(&outcome)?;
        }
        QuestAction::Complete { id, after } => {
            let delay = after.unwrap_or(config.notifications.session_complete_delay_secs);
            let completion = if delay == 0 {
                Completion::Now
            } else {
                Completion::After(delay)
            };
            let outcome = app.complete_quest(&id, completion).await?;
            print_json(&outcome)?;
        }
        QuestAction::Reset { id } => {
            let quest = app.reset_quest(&id).await?;
            print_json(&quest)?;
        }
        QuestAction::Delete { id } => {
            app.delete_quest(&id).await?;
            println!("Quest deleted: {id}");
        }
        QuestAction::Status { id } => {
            let quest = app.quest(&id)?;
            let elapsed = app.live_elapsed(&id)?;
            print_json(&json!({
                "quest": quest,
                "elapsed_secs": elapsed,
                "running": quest.is_timer_active(),
            }))?;
        }
    }
    Ok(())
}
