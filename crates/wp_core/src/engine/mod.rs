//! Match machinery: clock, phase controller, scoreboard, roster, player
//! agents, the event bus and the scheduler that drives them.

pub mod clock;
pub mod event_bus;
pub mod feed;
pub mod match_phase;
pub mod match_sim;
pub mod player;
pub mod roster;
pub mod scoreboard;
pub mod timestep;


pub use clock::{ClockTick, ExclusionTimer, MatchClock};
pub use event_bus::{EventBus, Publisher, Subscription};
pub use feed::{FeedEvent, FeedSnapshot, PositionFeed, SyntheticFeed};
pub use match_phase::{is_valid_transition, MatchPhase, MatchPhaseController};
pub use match_sim::{FoulLedgerEntry, MatchReport, MatchSimulation, TeamReport};
pub use player::{AiSwimmer, ArmPose, DecisionContext, ObservedPlayer, PlayerAgent, PlayerIntent};
pub use roster::{MatchRoster, PlayerStatus, Roster};
pub use scoreboard::{Scoreboard, TeamStats};
pub use timestep::{seconds_to_ticks, SIM_DT, TICKS_PER_SECOND};
