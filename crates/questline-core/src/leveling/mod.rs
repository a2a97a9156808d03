//! Experience and level progression.
//!
//! Pure functions only: the coordinator persists whatever these return.

mod curve;
mod reward;

pub use curve::{LevelCurve, MAX_LEVEL};
pub use reward::{compute_reward, base_experience, LevelingRules, Reward, RewardCatalog, RewardDef, BOSS_MULTIPLIER};
