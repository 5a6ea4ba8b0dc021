//! Match clock configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Number of quarters (default: 4)
    pub quarters: u8,
    /// Length of one quarter in seconds of running time (default: 480)
    pub quarter_length_secs: f32,
    /// Full shot clock (default: 30)
    pub shot_clock_secs: f32,
    /// Shot clock after an exclusion is awarded, if less remains (default: 20)
    pub shot_clock_after_exclusion_secs: f32,
    /// Exclusion length (default: 20)
    pub exclusion_secs: f32,
    /// Break between quarters (default: 120)
    pub quarter_break_secs: f32,
    /// Dead time after a goal before the restart (default: 5)
    pub goal_celebration_secs: f32,
    /// Timeout length (default: 60)
    pub timeout_secs: f32,
    /// Timeouts available to each team per match (default: 2)
    pub timeouts_per_team: u8,
    /// Stop exclusion countdowns whenever the match clock is stopped.
    /// Default false: exclusions run on elapsed match time regardless of whistles.
    #[serde(default)]
    pub freeze_exclusions_with_clock: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            quarters: 4,
            quarter_length_secs: 480.0,
            shot_clock_secs: 30.0,
            shot_clock_after_exclusion_secs: 20.0,
            exclusion_secs: 20.0,
            quarter_break_secs: 120.0,
            goal_celebration_secs: 5.0,
            timeout_secs: 60.0,
            timeouts_per_team: 2,
            freeze_exclusions_with_clock: false,
        }
    }
}

impl ClockConfig {
    /// Short quarters for quick simulated runs.
    pub fn quick() -> Self {
        Self {
            quarter_length_secs: 120.0,
            quarter_break_secs: 10.0,
            timeout_secs: 10.0,
            ..Self::default()
        }
    }
}
