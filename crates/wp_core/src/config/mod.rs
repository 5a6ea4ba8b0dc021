//! # Match Configuration
//!
//! Every tuning constant of the core lives in one serde tree so a match can be
//! described by a single JSON document.
//!
//! ## Usage
//! ```rust
//! use wp_core::config::MatchConfig;
//!
//! let config = MatchConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let quick = MatchConfig::quick();
//! assert!(quick.clock.quarter_length_secs < config.clock.quarter_length_secs);
//! ```

mod clock_config;
mod officiating_config;
mod tactics_config;

pub use clock_config::ClockConfig;
pub use officiating_config::OfficiatingConfig;
pub use tactics_config::{LearnerConfig, TacticsConfig};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::PoolGeometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Players in the water per team at full strength, goalkeeper included (default: 7)
    pub players_in_water: u8,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { players_in_water: 7 }
    }
}

/// Rates for the synthetic collaborator feed used by the CLI and JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Reported contacts per minute of running time
    pub contacts_per_minute: f32,
    /// Share of contacts that are deliberate strikes flagged as brutality
    pub brutality_share: f32,
    /// Two-meter violations considered per minute
    pub two_meter_per_minute: f32,
    /// Shots per minute by the team in possession
    pub shots_per_minute: f32,
    /// Probability that a shot scores
    pub shot_conversion: f32,
    /// Probability that a penalty throw scores
    pub penalty_conversion: f32,
    /// Possession losses per minute that are not shots or fouls
    pub turnovers_per_minute: f32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            contacts_per_minute: 8.0,
            brutality_share: 0.01,
            two_meter_per_minute: 0.5,
            shots_per_minute: 2.0,
            shot_conversion: 0.35,
            penalty_conversion: 0.75,
            turnovers_per_minute: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MatchConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub officiating: OfficiatingConfig,
    #[serde(default)]
    pub tactics: TacticsConfig,
    #[serde(default)]
    pub learner: LearnerConfig,
    #[serde(default)]
    pub pool: PoolGeometry,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

impl MatchConfig {
    /// Regulation match (default)
    pub fn regulation() -> Self {
        Self::default()
    }

    /// Short quarters and breaks
    pub fn quick() -> Self {
        Self { clock: ClockConfig::quick(), ..Self::default() }
    }

    /// Load from a JSON file and validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse from a JSON string and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.officiating.profile.validate()?;

        let clock = &self.clock;
        if clock.quarters == 0 {
            return Err(ConfigError::Validation("clock.quarters must be at least 1".into()));
        }
        for (name, value) in [
            ("clock.quarter_length_secs", clock.quarter_length_secs),
            ("clock.shot_clock_secs", clock.shot_clock_secs),
            ("clock.exclusion_secs", clock.exclusion_secs),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::Validation(format!("{} must be positive, got {}", name, value)));
            }
        }
        for (name, value) in [
            ("clock.shot_clock_after_exclusion_secs", clock.shot_clock_after_exclusion_secs),
            ("clock.quarter_break_secs", clock.quarter_break_secs),
            ("clock.goal_celebration_secs", clock.goal_celebration_secs),
            ("clock.timeout_secs", clock.timeout_secs),
            ("officiating.foul_management_secs", self.officiating.foul_management_secs),
            ("officiating.scoring_range_m", self.officiating.scoring_range_m),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Validation(format!("{} must not be negative, got {}", name, value)));
            }
        }
        if clock.shot_clock_after_exclusion_secs > clock.shot_clock_secs {
            return Err(ConfigError::Validation(format!(
                "clock.shot_clock_after_exclusion_secs ({}) exceeds clock.shot_clock_secs ({})",
                clock.shot_clock_after_exclusion_secs, clock.shot_clock_secs
            )));
        }

        if self.tactics.evaluation_interval_secs <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "tactics.evaluation_interval_secs must be positive, got {}",
                self.tactics.evaluation_interval_secs
            )));
        }
        for (name, value) in [
            ("tactics.adaptation_confidence", self.tactics.adaptation_confidence),
            ("tactics.pressing_risk_cap", self.tactics.pressing_risk_cap),
            ("feed.brutality_share", self.feed.brutality_share),
            ("feed.shot_conversion", self.feed.shot_conversion),
            ("feed.penalty_conversion", self.feed.penalty_conversion),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!("{} must be 0.0-1.0, got {}", name, value)));
            }
        }

        let learner = &self.learner;
        if learner.sample_interval_secs <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "learner.sample_interval_secs must be positive, got {}",
                learner.sample_interval_secs
            )));
        }
        if learner.tight_marking_distance > learner.loose_marking_distance {
            return Err(ConfigError::Validation(format!(
                "learner.tight_marking_distance ({}) exceeds learner.loose_marking_distance ({})",
                learner.tight_marking_distance, learner.loose_marking_distance
            )));
        }

        if !(3..=7).contains(&self.roster.players_in_water) {
            return Err(ConfigError::Validation(format!(
                "roster.players_in_water must be 3-7, got {}",
                self.roster.players_in_water
            )));
        }
        if self.pool.length_m <= 0.0 || self.pool.width_m <= 0.0 {
            return Err(ConfigError::Validation("pool dimensions must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_valid() {
        assert!(MatchConfig::default().validate().is_ok());
        assert!(MatchConfig::quick().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MatchConfig::from_json(r#"{ "clock": {
            "quarters": 2, "quarter_length_secs": 60.0, "shot_clock_secs": 30.0,
            "shot_clock_after_exclusion_secs": 20.0, "exclusion_secs": 20.0,
            "quarter_break_secs": 5.0, "goal_celebration_secs": 2.0,
            "timeout_secs": 30.0, "timeouts_per_team": 1 } }"#)
        .unwrap();
        assert_eq!(config.clock.quarters, 2);
        assert!(!config.clock.freeze_exclusions_with_clock);
        assert_eq!(config.tactics, TacticsConfig::default());
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut config = MatchConfig::default();
        config.tactics.adaptation_confidence = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = MatchConfig::default();
        config.roster.players_in_water = 9;
        assert!(config.validate().is_err());

        let mut config = MatchConfig::default();
        config.clock.shot_clock_after_exclusion_secs = 35.0;
        assert!(config.validate().is_err());

        let mut config = MatchConfig::default();
        config.learner.tight_marking_distance = 4.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(MatchConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&MatchConfig::quick()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = MatchConfig::load(file.path()).unwrap();
        assert_eq!(loaded, MatchConfig::quick());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = MatchConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
