//! Player capability interface.
//!
//! The officiating and tactical core only ever sees `dyn PlayerAgent`. AI
//! swimmers and externally driven players (a VR user, a replay) are separate
//! structs behind the same interface.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::models::{ContactType, PlayerId, Position, TeamId};
use crate::tactics::{DefenseType, OffenseType, TacticalScalars};

/// Arm position, read by animation and by contact detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArmPose {
    #[default]
    Treading,
    /// Ball held above the water
    Raised,
    /// Reaching toward an opponent
    Reaching,
    Shooting,
}

/// What a player wants to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerIntent {
    Hold,
    Pass,
    Shoot,
    Swim,
    Press,
    Foul(ContactType),
}

/// Everything a player may look at when deciding.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext {
    pub position: Position,
    pub team_in_possession: Option<TeamId>,
    pub distance_to_goal: f32,
    pub nearest_opponent_distance: f32,
    pub shot_clock_remaining: f32,
    pub defense: DefenseType,
    pub offense: OffenseType,
    pub scalars: TacticalScalars,
}

pub trait PlayerAgent {
    fn id(&self) -> PlayerId;

    /// Choose this tick's intent. Randomness comes only from `rng`.
    fn decide(&mut self, ctx: &DecisionContext, rng: &mut dyn RngCore) -> PlayerIntent;

    fn arm_pose(&self) -> ArmPose;

    fn take_possession(&mut self);

    fn release_possession(&mut self);

    fn has_possession(&self) -> bool;
}

// ============================================================================
// AI swimmer
// ============================================================================

/// Seeded AI player driven by the team's tactical scalars.
#[derive(Debug, Clone)]
pub struct AiSwimmer {
    id: PlayerId,
    has_ball: bool,
    pose: ArmPose,
}

impl AiSwimmer {
    pub fn new(id: PlayerId) -> Self {
        Self { id, has_ball: false, pose: ArmPose::Treading }
    }

    fn decide_attacking(&self, ctx: &DecisionContext, rng: &mut dyn RngCore) -> PlayerIntent {
        if !self.has_ball {
            return PlayerIntent::Swim;
        }
        let in_range = ctx.distance_to_goal <= ctx.offense.preferred_shot_distance() + 1.0;
        if ctx.shot_clock_remaining < 4.0 && ctx.distance_to_goal < 12.0 {
            return PlayerIntent::Shoot;
        }
        if in_range && rng.gen::<f32>() < 0.2 + 0.4 * ctx.scalars.risk_tolerance {
            PlayerIntent::Shoot
        } else if rng.gen::<f32>() < 1.0 - ctx.scalars.possession_orientation * 0.5 {
            PlayerIntent::Pass
        } else {
            PlayerIntent::Hold
        }
    }

    fn decide_defending(&self, ctx: &DecisionContext, rng: &mut dyn RngCore) -> PlayerIntent {
        if ctx.nearest_opponent_distance > 2.0 {
            return match ctx.defense {
                DefenseType::Pressing | DefenseType::ManToMan => PlayerIntent::Press,
                DefenseType::Zone | DefenseType::Wall => PlayerIntent::Swim,
            };
        }
        if rng.gen::<f32>() < 0.1 + 0.3 * ctx.scalars.aggressiveness {
            let contact = match rng.gen_range(0..10) {
                0..=3 => ContactType::Holding,
                4..=5 => ContactType::Pushing,
                6 => ContactType::Pulling,
                7 => ContactType::Grabbing,
                8 => ContactType::Blocking,
                _ => ContactType::Submersion,
            };
            PlayerIntent::Foul(contact)
        } else {
            PlayerIntent::Press
        }
    }
}

impl PlayerAgent for AiSwimmer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn decide(&mut self, ctx: &DecisionContext, rng: &mut dyn RngCore) -> PlayerIntent {
        let intent = match ctx.team_in_possession {
            Some(team) if team == self.id.team => self.decide_attacking(ctx, rng),
            Some(_) => self.decide_defending(ctx, rng),
            None => PlayerIntent::Swim,
        };
        self.pose = match intent {
            PlayerIntent::Shoot => ArmPose::Shooting,
            PlayerIntent::Foul(_) | PlayerIntent::Press => ArmPose::Reaching,
            _ if self.has_ball => ArmPose::Raised,
            _ => ArmPose::Treading,
        };
        intent
    }

    fn arm_pose(&self) -> ArmPose {
        self.pose
    }

    fn take_possession(&mut self) {
        self.has_ball = true;
        self.pose = ArmPose::Raised;
    }

    fn release_possession(&mut self) {
        self.has_ball = false;
        self.pose = ArmPose::Treading;
    }

    fn has_possession(&self) -> bool {
        self.has_ball
    }
}

// ============================================================================
// Externally driven player
// ============================================================================

/// Player whose choices come from outside the simulation, e.g. a tracked VR
/// user. The host sets the pose and queues intents; each queued intent is
/// reported once, then the player holds.
#[derive(Debug, Clone)]
pub struct ObservedPlayer {
    id: PlayerId,
    has_ball: bool,
    pose: ArmPose,
    pending: Option<PlayerIntent>,
}

impl ObservedPlayer {
    pub fn new(id: PlayerId) -> Self {
        Self { id, has_ball: false, pose: ArmPose::Treading, pending: None }
    }

    pub fn set_arm_pose(&mut self, pose: ArmPose) {
        self.pose = pose;
    }

    pub fn queue_intent(&mut self, intent: PlayerIntent) {
        self.pending = Some(intent);
    }
}

impl PlayerAgent for ObservedPlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn decide(&mut self, _ctx: &DecisionContext, _rng: &mut dyn RngCore) -> PlayerIntent {
        self.pending.take().unwrap_or(PlayerIntent::Hold)
    }

    fn arm_pose(&self) -> ArmPose {
        self.pose
    }

    fn take_possession(&mut self) {
        self.has_ball = true;
    }

    fn release_possession(&mut self) {
        self.has_ball = false;
    }

    fn has_possession(&self) -> bool {
        self.has_ball
    }
}
