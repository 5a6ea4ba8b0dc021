//! Officiating: referee personality, call decisions, sanctions, the foul
//! ledger and the engine that ties them to the match.

pub mod decision;
pub mod engine;
pub mod foul_record;
pub mod profile;
pub mod sanction;

pub use decision::{decide_call, CallDecision, DecisionTrace};
pub use engine::{
    OfficiatingContext, OfficiatingEngine, RefereeEvent, RefereeOutcome, RefereeState, RefereeStats,
    Whistle,
};
pub use foul_record::{FoulLedger, FoulRecord, MAJOR_SANCTIONS_FOR_DISQUALIFICATION};
pub use profile::{lerp, OfficiatingProfile, PRESET_NAMES};
pub use sanction::{determine_sanction, Sanction};
