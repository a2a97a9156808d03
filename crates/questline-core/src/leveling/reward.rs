//! Quest completion rewards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::curve::LevelCurve;
use crate::model::{PlayerProfile, Quest};
use crate::timer;

pub const BOSS_MULTIPLIER: u64 = 2;

/// A reward unlocked on reaching `unlock_level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDef {
    pub name: String,
    pub unlock_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardCatalog {
    pub rewards: Vec<RewardDef>,
}

impl Default for RewardCatalog {
    fn default() -> Self {
        let defs = [
            ("Bronze Focus Badge", 2),
            ("Custom Quest Colors", 3),
            ("Silver Focus Badge", 5),
            ("Boss Quest Banner", 7),
            ("Gold Focus Badge", 10),
        ];
        Self {
            rewards: defs
                .into_iter()
                .map(|(name, unlock_level)| RewardDef {
                    name: name.to_string(),
                    unlock_level,
                })
                .collect(),
        }
    }
}

impl RewardCatalog {
    /// Rewards crossed when moving from `from_level` to `to_level`.
    ///
    /// The lower bound is exclusive, so the same transition never awards a
    /// reward twice and a level that was already held awards nothing.
    pub fn unlocked_between(&self, from_level: u32, to_level: u32) -> Vec<String> {
        let mut crossed: Vec<&RewardDef> = self
            .rewards
            .iter()
            .filter(|r| r.unlock_level > from_level && r.unlock_level <= to_level)
            .collect();
        crossed.sort_by_key(|r| r.unlock_level);
        crossed.into_iter().map(|r| r.name.clone()).collect()
    }
}

/// Everything the leveling engine needs to price a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelingRules {
    pub xp_per_minute: u64,
    pub curve: LevelCurve,
    pub catalog: RewardCatalog,
}

impl Default for LevelingRules {
    fn default() -> Self {
        Self {
            xp_per_minute: 2,
            curve: LevelCurve::default(),
            catalog: RewardCatalog::default(),
        }
    }
}

/// Result of completing a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp_gained: u64,
    pub previous_level: u32,
    pub new_level: u32,
    pub leveled_up: bool,
    pub unlocked_rewards: Vec<String>,
    /// Lifetime experience after this reward.
    pub total_experience: u64,
}

impl Reward {
    /// The profile after applying this reward.
    pub fn apply(&self, profile: &PlayerProfile) -> PlayerProfile {
        let mut next = profile.clone();
        next.experience = self.total_experience;
        next.level = self.new_level;
        next.quests_completed = next.quests_completed.saturating_add(1);
        for name in &self.unlocked_rewards {
            if !next.unlocked_rewards.contains(name) {
                next.unlocked_rewards.push(name.clone());
            }
        }
        next
    }
}

/// Experience for `elapsed_secs` of focus, before any boss bonus.
/// Only whole minutes count.
pub fn base_experience(elapsed_secs: u64, xp_per_minute: u64) -> u64 {
    (elapsed_secs / 60).saturating_mul(xp_per_minute)
}

/// Price a just-completed quest against the current profile.
///
/// Deterministic: the same quest, profile, instant and rules always produce
/// the same reward.
pub fn compute_reward(
    quest: &Quest,
    profile: &PlayerProfile,
    now: DateTime<Utc>,
    rules: &LevelingRules,
) -> Reward {
    let elapsed = timer::live_elapsed(quest, now);
    let mut xp_gained = base_experience(elapsed, rules.xp_per_minute);
    if quest.is_boss_quest {
        xp_gained = xp_gained.saturating_mul(BOSS_MULTIPLIER);
    }

    let previous_level = rules.curve.level_for(profile.experience);
    let total_experience = profile.experience.saturating_add(xp_gained);
    let new_level = rules.curve.level_for(total_experience);
    let leveled_up = new_level > previous_level;
    let unlocked_rewards = if leveled_up {
        rules.catalog.unlocked_between(previous_level, new_level)
    } else {
        Vec::new()
    };

    Reward {
        xp_gained,
        previous_level,
        new_level,
        leveled_up,
        unlocked_rewards,
        total_experience,
    }
}
