//! Aggregate progression state.

use serde::{Deserialize, Serialize};

use crate::leveling::LevelCurve;

/// Player progression. `experience` is lifetime experience; `level` is
/// cached and always recomputable from it via [`LevelCurve::level_for`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub level: u32,
    pub experience: u64,
    #[serde(default)]
    pub quests_completed: u64,
    /// Every reward ever awarded, in award order.
    #[serde(default)]
    pub unlocked_rewards: Vec<String>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            quests_completed: 0,
            unlocked_rewards: Vec::new(),
        }
    }
}

impl PlayerProfile {
    /// The level the curve assigns when it disagrees with the stored one.
    pub fn drift(&self, curve: &LevelCurve) -> Option<u32> {
        let expected = curve.level_for(self.experience);
        (expected != self.level).then_some(expected)
    }

    /// Repairs a drifted level. Returns true if anything changed.
    pub fn reconcile(&mut self, curve: &LevelCurve) -> bool {
        match self.drift(curve) {
            Some(level) => {
                tracing::warn!(
                    stored = self.level,
                    expected = level,
                    experience = self.experience,
                    "profile level drifted from experience, reconciling"
                );
                self.level = level;
                true
            }
            None => false,
        }
    }

    pub fn experience_into_level(&self, curve: &LevelCurve) -> u64 {
        self.experience
            .saturating_sub(curve.threshold_for(curve.level_for(self.experience)))
    }

    pub fn experience_to_next_level(&self, curve: &LevelCurve) -> u64 {
        let next = curve.level_for(self.experience).saturating_add(1);
        curve.threshold_for(next).saturating_sub(self.experience)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_level_one() {
        let profile = PlayerProfile::default();
        assert_eq!(profile.level, 1);
        assert_eq!(profile.experience, 0);
        assert!(profile.drift(&LevelCurve::default()).is_none());
    }

    #[test]
    fn reconcile_fixes_drift() {
        let curve = LevelCurve::default();
        let mut profile = PlayerProfile {
            level: 1,
            experience: 260,
            ..PlayerProfile::default()
        };
        assert_eq!(profile.drift(&curve), Some(3));
        assert!(profile.reconcile(&curve));
        assert_eq!(profile.level, 3);
        assert!(!profile.reconcile(&curve));
    }

    #[test]
    fn progress_within_level() {
        let curve = LevelCurve::default();
        let profile = PlayerProfile {
            level: 2,
            experience: 130,
            ..PlayerProfile::default()
        };
        assert_eq!(profile.experience_into_level(&curve), 30);
        assert_eq!(profile.experience_to_next_level(&curve), 120);
    }
}
