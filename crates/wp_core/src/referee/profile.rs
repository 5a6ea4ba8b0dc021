//! Referee Profiles
//!
//! An `OfficiatingProfile` is the referee's personality. It is fixed for the
//! duration of a match and drives every probabilistic officiating decision.
//!
//! ## Presets
//!
//! | Preset | Character |
//! |--------|-----------|
//! | balanced | Default FINA-style referee |
//! | strict | Low call threshold, quick to exclude |
//! | lenient | Lets contact go, rarely excludes |
//! | advantage_minded | Plays advantage whenever possible |
//! | erratic | Inconsistent, error-prone |
//!
//! ## Environment Variables
//!
//! - `WP_REFEREE_PROFILE`: Select preset by name

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ConfigError;

pub const PRESET_NAMES: [&str; 5] = ["balanced", "strict", "lenient", "advantage_minded", "erratic"];

/// Linear interpolation from `a` (t = 0) to `b` (t = 1).
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficiatingProfile {
    pub strictness: f32,
    pub advantage_orientation: f32,
    /// When the error model fires: probability of inverting the call rather
    /// than flipping a coin.
    pub consistency: f32,
    /// Chance of seeing an underwater contact at all.
    pub vision_accuracy: f32,
    pub two_meter_vigilance: f32,
    pub penalty_threshold: f32,
    pub error_rate: f32,
    pub exclusion_tendency: f32,
    pub hand_check_strictness: f32,
    /// Longest advantage window in seconds.
    pub max_advantage_window_secs: f32,
    /// Advantage is only played when the attack is at least this far from goal;
    /// closer fouls are judged as denied chances instead.
    pub min_advantage_distance_to_goal_m: f32,
}

impl Default for OfficiatingProfile {
    fn default() -> Self {
        Self::balanced()
    }
}

impl OfficiatingProfile {
    pub fn balanced() -> Self {
        Self {
            strictness: 0.5,
            advantage_orientation: 0.5,
            consistency: 0.8,
            vision_accuracy: 0.7,
            two_meter_vigilance: 0.6,
            penalty_threshold: 0.7,
            error_rate: 0.05,
            exclusion_tendency: 0.5,
            hand_check_strictness: 0.5,
            max_advantage_window_secs: 3.0,
            min_advantage_distance_to_goal_m: 5.0,
        }
    }

    pub fn strict() -> Self {
        Self {
            strictness: 0.85,
            advantage_orientation: 0.25,
            exclusion_tendency: 0.8,
            hand_check_strictness: 0.8,
            two_meter_vigilance: 0.85,
            penalty_threshold: 0.6,
            error_rate: 0.03,
            max_advantage_window_secs: 2.0,
            ..Self::balanced()
        }
    }

    pub fn lenient() -> Self {
        Self {
            strictness: 0.15,
            advantage_orientation: 0.6,
            exclusion_tendency: 0.2,
            hand_check_strictness: 0.25,
            two_meter_vigilance: 0.35,
            penalty_threshold: 0.85,
            ..Self::balanced()
        }
    }

    pub fn advantage_minded() -> Self {
        Self {
            advantage_orientation: 0.9,
            max_advantage_window_secs: 4.0,
            min_advantage_distance_to_goal_m: 4.0,
            ..Self::balanced()
        }
    }

    pub fn erratic() -> Self {
        Self {
            consistency: 0.3,
            vision_accuracy: 0.45,
            error_rate: 0.2,
            ..Self::balanced()
        }
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "balanced" | "default" => Ok(Self::balanced()),
            "strict" => Ok(Self::strict()),
            "lenient" => Ok(Self::lenient()),
            "advantage_minded" | "advantage" => Ok(Self::advantage_minded()),
            "erratic" => Ok(Self::erratic()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    /// Preset named by `WP_REFEREE_PROFILE`, or `balanced`.
    pub fn from_env_or_default() -> Self {
        match env::var("WP_REFEREE_PROFILE") {
            Ok(name) => Self::preset(&name).unwrap_or_else(|err| {
                log::warn!("{}; falling back to balanced referee", err);
                Self::balanced()
            }),
            Err(_) => Self::balanced(),
        }
    }

    /// Minimum severity that is worth a call: lerp(0.7, 0.3, strictness).
    pub fn call_threshold(&self) -> f32 {
        lerp(0.7, 0.3, self.strictness)
    }

    /// Minimum severity for an exclusion: lerp(0.8, 0.5, exclusion_tendency).
    pub fn exclusion_threshold(&self) -> f32 {
        lerp(0.8, 0.5, self.exclusion_tendency)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("strictness", self.strictness),
            ("advantage_orientation", self.advantage_orientation),
            ("consistency", self.consistency),
            ("vision_accuracy", self.vision_accuracy),
            ("two_meter_vigilance", self.two_meter_vigilance),
            ("penalty_threshold", self.penalty_threshold),
            ("error_rate", self.error_rate),
            ("exclusion_tendency", self.exclusion_tendency),
            ("hand_check_strictness", self.hand_check_strictness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "profile.{} must be 0.0-1.0, got {}",
                    name, value
                )));
            }
        }
        if self.max_advantage_window_secs < 0.0 {
            return Err(ConfigError::Validation(format!(
                "profile.max_advantage_window_secs must not be negative, got {}",
                self.max_advantage_window_secs
            )));
        }
        if self.min_advantage_distance_to_goal_m < 0.0 {
            return Err(ConfigError::Validation(format!(
                "profile.min_advantage_distance_to_goal_m must not be negative, got {}",
                self.min_advantage_distance_to_goal_m
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let mut p = OfficiatingProfile::balanced();
        p.strictness = 0.5;
        assert!((p.call_threshold() - 0.5).abs() < 1e-6);
        p.strictness = 1.0;
        assert!((p.call_threshold() - 0.3).abs() < 1e-6);
        p.exclusion_tendency = 0.0;
        assert!((p.exclusion_threshold() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_all_presets_valid() {
        for name in PRESET_NAMES {
            let profile = OfficiatingProfile::preset(name).unwrap();
            assert!(profile.validate().is_ok(), "{} invalid", name);
        }
    }

    #[test]
    fn test_strict_calls_more_than_lenient() {
        assert!(OfficiatingProfile::strict().call_threshold() < OfficiatingProfile::lenient().call_threshold());
        assert!(
            OfficiatingProfile::strict().exclusion_threshold()
                < OfficiatingProfile::lenient().exclusion_threshold()
        );
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(OfficiatingProfile::preset("var"), Err(ConfigError::UnknownPreset(_))));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut p = OfficiatingProfile::balanced();
        p.error_rate = -0.1;
        assert!(p.validate().is_err());
    }
}
