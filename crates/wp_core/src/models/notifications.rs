//! Discrete notifications published by the core for UI, scoreboard, audio and
//! commentary layers. Subscribers only read them.

use serde::{Deserialize, Serialize};

use super::{PlayerId, TeamId};
use crate::engine::match_phase::MatchPhase;
use crate::referee::Sanction;
use crate::tactics::{DefenseType, OffenseType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TacticChange {
    Defense { from: DefenseType, to: DefenseType },
    Offense { from: OffenseType, to: OffenseType },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchNotification {
    PhaseChanged { from: MatchPhase, to: MatchPhase },
    TransitionRejected { from: MatchPhase, requested: MatchPhase },
    FoulCalled { team: TeamId, offender: Option<PlayerId>, sanction: Sanction },
    AdvantagePlayed { team: TeamId, offender: Option<PlayerId> },
    ExclusionStarted { player: PlayerId, duration_secs: f32 },
    ExclusionEnded { player: PlayerId },
    PlayerDisqualified { player: PlayerId },
    GoalScored { team: TeamId, scorer: Option<PlayerId> },
    PossessionChanged { from: Option<PlayerId>, to: Option<PlayerId> },
    ShotClockExpired { team: TeamId },
    TimeoutCalled { team: TeamId },
    TacticChanged { team: TeamId, change: TacticChange, reason: String },
}

impl MatchNotification {
    /// Short label for logs and the match report.
    pub fn label(&self) -> &'static str {
        match self {
            MatchNotification::PhaseChanged { .. } => "phase_changed",
            MatchNotification::TransitionRejected { .. } => "transition_rejected",
            MatchNotification::FoulCalled { .. } => "foul_called",
            MatchNotification::AdvantagePlayed { .. } => "advantage_played",
            MatchNotification::ExclusionStarted { .. } => "exclusion_started",
            MatchNotification::ExclusionEnded { .. } => "exclusion_ended",
            MatchNotification::PlayerDisqualified { .. } => "player_disqualified",
            MatchNotification::GoalScored { .. } => "goal_scored",
            MatchNotification::PossessionChanged { .. } => "possession_changed",
            MatchNotification::ShotClockExpired { .. } => "shot_clock_expired",
            MatchNotification::TimeoutCalled { .. } => "timeout_called",
            MatchNotification::TacticChanged { .. } => "tactic_changed",
        }
    }
}
