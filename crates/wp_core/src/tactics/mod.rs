//! Team tactics: scheme vocabulary, the opponent-pattern learner and the
//! per-team adaptation engine.

pub mod opponent_model;
pub mod team_tactics;
pub mod types;

pub use opponent_model::{AdaptationSignal, LearnerSummary, OpponentPatternLearner};
pub use team_tactics::{TeamTacticalState, TeamTactics};
pub use types::{DefenseType, OffenseType, TacticalScalars};
