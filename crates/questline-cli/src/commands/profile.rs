//! Player profile commands.

use clap::Subcommand;
use questline_core::Config;
use serde_json::json;

use super::{open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show level, experience and rewards
    Show,
}

pub fn run(action: ProfileAction) -> CliResult {
    let config = Config::load()?;
    let app = open_app(&config)?;

    match action {
        ProfileAction::Show => {
            let profile = app.profile()?;
            let curve = &app.rules().curve;
            let upcoming: Vec<_> = app
                .rules()
                .catalog
                .rewards
                .iter()
                .filter(|reward| reward.unlock_level > profile.level)
                .collect();
            print_json(&json!({
                "level": profile.level,
                "experience": profile.experience,
                "experience_into_level": profile.experience_into_level(curve),
                "experience_to_next_level": profile.experience_to_next_level(curve),
                "progress": curve.progress(profile.experience),
                "quests_completed": profile.quests_completed,
                "unlocked_rewards": profile.unlocked_rewards,
                "upcoming_rewards": upcoming,
            }))?;
        }
    }
    Ok(())
}
