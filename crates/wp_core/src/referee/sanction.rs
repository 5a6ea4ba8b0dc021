//! Sanction determination.
//!
//! Pure function of the violation, the referee profile and the offender's
//! record so far. Evaluated once the engine has committed to a call.

use serde::{Deserialize, Serialize};

use super::foul_record::{FoulRecord, MAJOR_SANCTIONS_FOR_DISQUALIFICATION};
use super::profile::OfficiatingProfile;
use crate::engine::match_phase::MatchPhase;
use crate::models::ViolationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sanction {
    OrdinaryFoul,
    /// Team-attributed violation: ball goes to the other team, nobody is charged.
    Turnover,
    Exclusion,
    Penalty,
    ExclusionAndPenalty,
    /// Removal for the rest of the match. The flags record which of the
    /// exclusion and penalty conditions the violation itself met.
    PermanentExclusion { exclusion: bool, penalty: bool },
}

impl Sanction {
    /// Takes the player out of the water, for 20 seconds or for good.
    pub fn includes_exclusion(self) -> bool {
        matches!(
            self,
            Sanction::Exclusion | Sanction::ExclusionAndPenalty | Sanction::PermanentExclusion { .. }
        )
    }

    pub fn includes_penalty(self) -> bool {
        matches!(
            self,
            Sanction::Penalty
                | Sanction::ExclusionAndPenalty
                | Sanction::PermanentExclusion { penalty: true, .. }
        )
    }

    /// Strikes this sanction adds to the offender's record as
    /// `(exclusions, penalties)`. A permanent exclusion is the last strike and
    /// books exactly one: the exclusion if its condition was met, otherwise
    /// the penalty.
    pub fn booked_majors(self) -> (u8, u8) {
        match self {
            Sanction::Exclusion => (1, 0),
            Sanction::Penalty => (0, 1),
            Sanction::ExclusionAndPenalty => (1, 1),
            Sanction::PermanentExclusion { exclusion: false, penalty: true } => (0, 1),
            Sanction::PermanentExclusion { .. } => (1, 0),
            Sanction::OrdinaryFoul | Sanction::Turnover => (0, 0),
        }
    }

    /// Counts toward the three-strike disqualification.
    pub fn is_major(self) -> bool {
        self.includes_exclusion() || self.includes_penalty()
    }

    pub fn is_permanent(self) -> bool {
        matches!(self, Sanction::PermanentExclusion { .. })
    }

    /// Phase the match moves to while the sanction is being set up.
    pub fn restart_phase(self) -> MatchPhase {
        if self.includes_penalty() {
            MatchPhase::Penalty
        } else if self.includes_exclusion() {
            MatchPhase::ExclusionSetup
        } else {
            MatchPhase::FreeThrow
        }
    }
}

/// Decide the sanction for a violation the referee has chosen to call.
pub fn determine_sanction(
    violation: &ViolationEvent,
    profile: &OfficiatingProfile,
    prior: &FoulRecord,
    brutality_disqualifies: bool,
) -> Sanction {
    let penalty =
        violation.prevented_scoring_chance && violation.severity >= profile.penalty_threshold;
    let exclusion = violation.is_brutality || violation.severity >= profile.exclusion_threshold();

    if !penalty && !exclusion {
        return Sanction::OrdinaryFoul;
    }

    let third_major = prior.major_sanctions() + 1 >= MAJOR_SANCTIONS_FOR_DISQUALIFICATION;
    if third_major || (violation.is_brutality && brutality_disqualifies) {
        return Sanction::PermanentExclusion { exclusion, penalty };
    }

    match (exclusion, penalty) {
        (true, true) => Sanction::ExclusionAndPenalty,
        (true, false) => Sanction::Exclusion,
        _ => Sanction::Penalty,
    }
}
