//! Officiating engine configuration

use serde::{Deserialize, Serialize};

use crate::referee::OfficiatingProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficiatingConfig {
    /// Referee personality
    pub profile: OfficiatingProfile,
    /// Minimum referee-managed setup time after a whistle (default: 2.0)
    pub foul_management_secs: f32,
    /// Farthest distance from the attacked goal at which a scoring chance is
    /// considered live for the advantage rule (default: 10.0)
    pub scoring_range_m: f32,
    /// Brutality resolves straight to permanent exclusion (default: false)
    #[serde(default)]
    pub brutality_disqualifies: bool,
}

impl Default for OfficiatingConfig {
    fn default() -> Self {
        Self {
            profile: OfficiatingProfile::default(),
            foul_management_secs: 2.0,
            scoring_range_m: 10.0,
            brutality_disqualifies: false,
        }
    }
}
