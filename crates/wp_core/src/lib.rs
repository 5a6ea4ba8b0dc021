//! # wp_core - Deterministic Water Polo Officiating and Tactics Engine
//!
//! Referee decisions, tactical adaptation and opponent-pattern learning for a
//! water polo match, driven by a fixed-timestep match loop.
//!
//! ## Features
//! - Referee personality (strictness, error rate, advantage orientation)
//! - Personal-foul ledger with automatic disqualification
//! - Defensive scheme switching on player-count changes
//! - First-quarter read of the opponent's defense
//! - 100% deterministic simulation (same seed = same result)
//! - JSON API for hosts that only speak strings

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally in tests and presets
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod referee;
pub mod tactics;

// Re-export main API
pub use api::{simulate_match_json, MatchRequest, MatchResponse};
pub use config::MatchConfig;
pub use engine::{MatchPhase, MatchReport, MatchSimulation};
pub use error::{CoreError, Result};
pub use referee::{OfficiatingEngine, OfficiatingProfile, Sanction};
pub use tactics::{DefenseType, OffenseType, OpponentPatternLearner, TeamTactics};
