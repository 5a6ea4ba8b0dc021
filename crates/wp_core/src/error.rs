use thiserror::Error;

use crate::engine::match_phase::MatchPhase;
use crate::models::{PlayerId, TeamId, ViolationKind};

/// Rejections raised while the referee turns a violation into a sanction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OfficiatingError {
    #[error("violation of kind {kind:?} requires an offender")]
    MissingOffender { kind: ViolationKind },

    #[error("player {player} is already permanently disqualified")]
    PlayerDisqualified { player: PlayerId },

    #[error("referee is busy ({state}); violation dropped")]
    EngineBusy { state: &'static str },
}

/// Rejected match-phase transition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseTransitionError {
    #[error("match is over; only Pregame may follow Postgame (requested {requested:?})")]
    LockedAfterPostgame { requested: MatchPhase },

    #[error("cannot resume: match is not paused")]
    NotPaused,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreboardError {
    #[error("goal rejected during {phase:?}")]
    GoalRejected { phase: MatchPhase },

    #[error("no timeouts left for {team}")]
    NoTimeoutsLeft { team: TeamId },

    #[error("{team} cannot call a timeout without the ball")]
    TimeoutWithoutPossession { team: TeamId },

    #[error("timeouts cannot be called during {phase:?}")]
    TimeoutNotAllowed { phase: MatchPhase },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown referee preset: {0}")]
    UnknownPreset(String),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Officiating(#[from] OfficiatingError),

    #[error(transparent)]
    Phase(#[from] PhaseTransitionError),

    #[error(transparent)]
    Scoreboard(#[from] ScoreboardError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OfficiatingError {
    /// The violation is dropped; referee state is untouched.
    pub fn is_recoverable(&self) -> bool {
        match self {
            OfficiatingError::MissingOffender { .. } => true,
            OfficiatingError::PlayerDisqualified { .. } => true,
            OfficiatingError::EngineBusy { .. } => true,
        }
    }
}

impl PhaseTransitionError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            PhaseTransitionError::LockedAfterPostgame { .. } => true, // reset to Pregame
            PhaseTransitionError::NotPaused => true,
        }
    }
}

impl ScoreboardError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            ScoreboardError::GoalRejected { .. } => true,
            ScoreboardError::NoTimeoutsLeft { .. } => true,
            ScoreboardError::TimeoutWithoutPossession { .. } => true,
            ScoreboardError::TimeoutNotAllowed { .. } => true,
        }
    }
}

impl ConfigError {
    /// Only IO can succeed on retry; bad input has to be fixed first.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ConfigError::Io(_) => true,
            ConfigError::Parse(_) => false,
            ConfigError::Validation(_) => false,
            ConfigError::UnknownPreset(_) => false,
        }
    }
}

impl CoreError {
    /// Runtime rejections leave match state unchanged and are recoverable.
    /// Malformed config or request input is not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CoreError::Officiating(e) => e.is_recoverable(),
            CoreError::Phase(e) => e.is_recoverable(),
            CoreError::Scoreboard(e) => e.is_recoverable(),
            CoreError::Config(e) => e.is_recoverable(),
            CoreError::Serialization(_) => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
