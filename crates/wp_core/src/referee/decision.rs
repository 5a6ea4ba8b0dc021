//! Call decision rule.
//!
//! Decides whether a violation is whistled now, deferred under the advantage
//! rule, or let go. Referee fallibility is simulated here: with probability
//! `error_rate` the otherwise-correct outcome is inverted (probability
//! `consistency`) or replaced by a coin flip. Brutality is always called.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::profile::OfficiatingProfile;
use crate::models::ViolationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallDecision {
    Ignore,
    Call,
    PlayAdvantage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionTrace {
    pub decision: CallDecision,
    /// Outcome before the error model ran.
    pub intended: CallDecision,
    pub error_injected: bool,
}

pub fn decide_call<R: Rng + ?Sized>(
    violation: &ViolationEvent,
    profile: &OfficiatingProfile,
    advantage_opportunity: bool,
    rng: &mut R,
) -> DecisionTrace {
    if violation.is_brutality {
        return DecisionTrace {
            decision: CallDecision::Call,
            intended: CallDecision::Call,
            error_injected: false,
        };
    }

    let severity = violation.severity;
    let intended = if severity.is_nan() || severity < profile.call_threshold() {
        CallDecision::Ignore
    } else if advantage_opportunity && rng.gen::<f32>() < profile.advantage_orientation {
        CallDecision::PlayAdvantage
    } else {
        CallDecision::Call
    };

    if rng.gen::<f32>() >= profile.error_rate {
        return DecisionTrace { decision: intended, intended, error_injected: false };
    }

    let decision = if rng.gen::<f32>() < profile.consistency {
        match intended {
            CallDecision::Call => CallDecision::Ignore,
            CallDecision::Ignore | CallDecision::PlayAdvantage => CallDecision::Call,
        }
    } else if rng.gen::<f32>() < 0.5 {
        CallDecision::Call
    } else {
        CallDecision::Ignore
    };

    DecisionTrace { decision, intended, error_injected: true }
}
