//! JSON entry point for hosts that only speak strings (game engines, tools).

use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::engine::{MatchReport, MatchSimulation};
use crate::error::{ConfigError, Result};
use crate::referee::OfficiatingProfile;

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub seed: u64,
    /// Full match configuration. Defaults to a regulation match.
    #[serde(default)]
    pub config: Option<MatchConfig>,
    /// Referee preset name; overrides the profile inside `config`.
    #[serde(default)]
    pub referee_preset: Option<String>,
    /// Keep the notification log in the response (large).
    #[serde(default)]
    pub include_notifications: bool,
}

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    #[serde(flatten)]
    pub report: MatchReport,
}

/// Run one seeded match described by `request_json` and return the
/// serialized `MatchResponse`.
pub fn simulate_match_json(request_json: &str) -> Result<String> {
    let request: MatchRequest = serde_json::from_str(request_json)?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(ConfigError::Validation(format!(
            "unsupported schema version: {}",
            request.schema_version
        ))
        .into());
    }

    let mut config = request.config.unwrap_or_default();
    if let Some(name) = &request.referee_preset {
        config.officiating.profile = OfficiatingProfile::preset(name)?;
    }

    let mut sim = MatchSimulation::new(config, request.seed)?;
    let mut report = sim.run_to_end()?;
    if !request.include_notifications {
        report.notifications.clear();
    }
    log::info!(
        "Simulated match seed {}: {}-{}",
        request.seed,
        report.home_goals,
        report.away_goals
    );

    let response = MatchResponse { schema_version: SCHEMA_VERSION, report };
    Ok(serde_json::to_string(&response)?)
}
