//! Tactical adaptation and opponent-learning configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticsConfig {
    /// Numerical-disadvantage defense switching and opponent-based offense switching
    pub auto_adapt: bool,
    /// Periodic defense re-evaluation interval in seconds (default: 1.0)
    pub evaluation_interval_secs: f32,
    /// Minimum learner confidence before an offense switch (default: 0.7)
    pub adaptation_confidence: f32,
    /// Risk tolerance ceiling applied when countering a pressing defense (default: 0.3)
    pub pressing_risk_cap: f32,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            auto_adapt: true,
            evaluation_interval_secs: 1.0,
            adaptation_confidence: 0.7,
            pressing_risk_cap: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// Seconds of match time between formation samples (default: 3.0)
    pub sample_interval_secs: f32,
    /// A defender farther than this from every attacker counts as zone evidence (default: 3.0)
    pub loose_marking_distance: f32,
    /// A defender closer than this to an attacker counts as man-to-man evidence (default: 2.0)
    pub tight_marking_distance: f32,
    /// Samples with fewer defenders or attackers are skipped (default: 3)
    pub min_players_per_side: usize,
    /// Quarters spent observing before the single adaptation attempt (default: 1)
    pub observation_quarters: u8,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: 3.0,
            loose_marking_distance: 3.0,
            tight_marking_distance: 2.0,
            min_players_per_side: 3,
            observation_quarters: 1,
        }
    }
}
