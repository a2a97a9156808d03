//! Step curve mapping lifetime experience to a level.

use serde::{Deserialize, Serialize};

/// Hard ceiling so a degenerate curve can't spin forever.
pub const MAX_LEVEL: u32 = 999;

/// Leveling curve.
///
/// Going from level `k` to `k + 1` costs `base_threshold + growth * (k - 1)`
/// experience, so each level is at least as expensive as the one before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCurve {
    pub base_threshold: u64,
    pub growth: u64,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base_threshold: 100,
            growth: 50,
        }
    }
}

impl LevelCurve {
    pub fn new(base_threshold: u64, growth: u64) -> Self {
        Self {
            base_threshold: base_threshold.max(1),
            growth,
        }
    }

    /// Lifetime experience required to reach `level`.
    pub fn threshold_for(&self, level: u32) -> u64 {
        if level <= 1 {
            return 0;
        }
        let steps = u64::from(level - 1);
        let linear = steps.saturating_mul(self.base_threshold.max(1));
        // growth * (0 + 1 + ... + steps-1)
        let triangular = steps.saturating_mul(steps - 1) / 2;
        linear.saturating_add(self.growth.saturating_mul(triangular))
    }

    /// Highest level whose threshold is covered by `experience`.
    pub fn level_for(&self, experience: u64) -> u32 {
        let mut level = 1;
        while level < MAX_LEVEL && self.threshold_for(level + 1) <= experience {
            level += 1;
        }
        level
    }

    /// Fraction (0.0 .. 1.0) of the way through the current level.
    pub fn progress(&self, experience: u64) -> f64 {
        let level = self.level_for(experience);
        let floor = self.threshold_for(level);
        let ceiling = self.threshold_for(level + 1);
        if ceiling <= floor {
            return 1.0;
        }
        (experience - floor) as f64 / (ceiling - floor) as f64
    }
}
