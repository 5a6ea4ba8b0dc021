//! Synthetic collaborator feed.
//!
//! Stands in for the physics, contact detection and ball handling that sit
//! outside the core. Each tick it lays the players out according to both
//! teams' tactics and turns the player agents' intents into the inputs the
//! match loop consumes: possession changes, goals, violation reports and
//! timeout calls. All randomness comes from the rng the caller passes in.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::player::{DecisionContext, PlayerIntent};
use super::roster::Roster;
use crate::config::FeedConfig;
use crate::models::{
    ContactType, ContactZone, PlayerId, PoolGeometry, Position, RawContact, TeamId, ViolationEvent,
};
use crate::referee::OfficiatingProfile;
use crate::tactics::{DefenseType, TeamTacticalState};

/// Probability per tick that the ball carrier looks for a shot once the shot
/// clock is nearly out.
const LATE_LOOK_PER_TICK: f32 = 0.2;
const LATE_SHOT_CLOCK_SECS: f32 = 4.0;
/// Radius of the arc of attackers beyond the preferred shot distance.
const PERIMETER_DEPTH_M: f32 = 2.0;
const ZONE_RADIUS_M: f32 = 2.5;
const WALL_RADIUS_M: f32 = 1.0;
const MARKING_GAP_M: f32 = 1.0;
const PRESSING_GAP_M: f32 = 0.7;
const POSITION_JITTER_M: f32 = 0.5;
/// Fouls on the carrier inside this distance can cost a scoring chance.
const SCORING_CHANCE_DISTANCE_M: f32 = 6.0;

/// One input for the match loop.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Possession(Option<PlayerId>),
    Goal { scorer: PlayerId },
    Violation(ViolationEvent),
    Timeout(TeamId),
}

impl FeedEvent {
    /// Processing order inside one tick: possession, goals, violations, then
    /// timeouts.
    pub fn order(&self) -> u8 {
        match self {
            FeedEvent::Possession(_) => 0,
            FeedEvent::Goal { .. } => 1,
            FeedEvent::Violation(_) => 2,
            FeedEvent::Timeout(_) => 3,
        }
    }
}

/// Player positions as seen by the tactical layer.
pub trait PositionFeed {
    fn position(&self, player: PlayerId) -> Option<Position>;

    /// Positions of `team`'s field players in the water, goalkeeper excluded.
    fn field_positions(&self, team: TeamId) -> Vec<Position>;
}

/// What the feed needs to know about the match this tick.
#[derive(Debug, Clone, Copy)]
pub struct FeedSnapshot {
    pub carrier: Option<PlayerId>,
    pub match_secs: f32,
    pub final_quarter: bool,
    pub quarter_remaining: f32,
    pub shot_clock_remaining: f32,
    /// Goals as (home, away).
    pub score: (u32, u32),
    pub timeouts_left: [u8; 2],
    /// Indexed by `TeamId::index`.
    pub tactics: [TeamTacticalState; 2],
}

pub struct SyntheticFeed {
    config: FeedConfig,
    pool: PoolGeometry,
    profile: OfficiatingProfile,
    positions: BTreeMap<PlayerId, Position>,
    timeout_requested: [bool; 2],
}

impl SyntheticFeed {
    pub fn new(config: FeedConfig, pool: PoolGeometry, profile: OfficiatingProfile) -> Self {
        Self {
            config,
            pool,
            profile,
            positions: BTreeMap::new(),
            timeout_requested: [false; 2],
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Produce this tick's inputs. Only call while play is live.
    pub fn generate(
        &mut self,
        dt: f32,
        snapshot: &FeedSnapshot,
        roster: &mut dyn Roster,
        rng: &mut dyn RngCore,
    ) -> Vec<FeedEvent> {
        let mut events = Vec::new();

        let Some(carrier) = snapshot.carrier else {
            // loose ball: first hand on it takes it
            let team = if rng.gen::<bool>() { TeamId::Home } else { TeamId::Away };
            if let Some(p) = pick_player(roster, team, None, rng) {
                events.push(FeedEvent::Possession(Some(p)));
            }
            return events;
        };

        let attacking = carrier.team;
        let defending = attacking.opponent();
        self.layout(roster, attacking, snapshot, rng);

        if let Some(team) = self.timeout_wanted(snapshot) {
            self.timeout_requested[team.index()] = true;
            events.push(FeedEvent::Timeout(team));
            return events;
        }

        let per_tick = |per_minute: f32| per_minute * dt / 60.0;

        // ball carrier
        let late = snapshot.shot_clock_remaining < LATE_SHOT_CLOCK_SECS;
        let look = if late { LATE_LOOK_PER_TICK } else { per_tick(self.config.shots_per_minute) };
        if rng.gen::<f32>() < look {
            let ctx = self.decision_context(carrier, Some(attacking), snapshot);
            let intent = roster.agent_mut(carrier).map(|agent| agent.decide(&ctx, rng));
            match intent {
                Some(PlayerIntent::Shoot) => {
                    if rng.gen::<f32>() < self.config.shot_conversion {
                        events.push(FeedEvent::Goal { scorer: carrier });
                    } else {
                        events.push(FeedEvent::Possession(rebound(roster, defending, rng)));
                    }
                }
                Some(PlayerIntent::Pass) => {
                    if let Some(p) = pick_player(roster, attacking, Some(carrier), rng) {
                        events.push(FeedEvent::Possession(Some(p)));
                    }
                }
                _ => {}
            }
        } else if rng.gen::<f32>() < per_tick(self.config.turnovers_per_minute) {
            if let Some(p) = pick_player(roster, defending, None, rng) {
                events.push(FeedEvent::Possession(Some(p)));
            }
        }

        if rng.gen::<f32>() < per_tick(self.config.contacts_per_minute) {
            if let Some(v) = self.contact(carrier, snapshot, roster, rng) {
                events.push(FeedEvent::Violation(v));
            }
        }

        let two_meter = per_tick(self.config.two_meter_per_minute) * self.profile.two_meter_vigilance;
        if rng.gen::<f32>() < two_meter {
            if let Some(offender) = pick_field_player(roster, attacking, Some(carrier), rng) {
                let goal = self.pool.attacking_goal(attacking);
                let location = self.pool.clamp(Position::new(
                    goal.x + toward_center(attacking) * 1.5,
                    goal.y + rng.gen_range(-1.0..1.0),
                ));
                let severity = rng.gen_range(0.5..1.0);
                events.push(FeedEvent::Violation(ViolationEvent::two_meter(
                    offender,
                    location,
                    severity,
                    snapshot.match_secs,
                )));
            }
        }

        events
    }

    /// Forget positions and timeout requests for a new match.
    pub fn reset(&mut self) {
        self.positions.clear();
        self.timeout_requested = [false; 2];
    }

    // ------------------------------------------------------------------------

    /// One defender's contact on an attacker, if the defender goes for it and
    /// the referee's eyes pick it up.
    fn contact(
        &self,
        carrier: PlayerId,
        snapshot: &FeedSnapshot,
        roster: &mut dyn Roster,
        rng: &mut dyn RngCore,
    ) -> Option<ViolationEvent> {
        let attacking = carrier.team;
        let defender = pick_field_player(roster, attacking.opponent(), None, rng)?;
        let victim = if rng.gen::<f32>() < 0.5 {
            carrier
        } else {
            pick_player(roster, attacking, None, rng)?
        };

        let brutality = rng.gen::<f32>() < self.config.brutality_share;
        let contact_type = if brutality {
            ContactType::Strike
        } else {
            let ctx = self.decision_context(defender, Some(attacking), snapshot);
            match roster.agent_mut(defender)?.decide(&ctx, rng) {
                PlayerIntent::Foul(contact_type) => contact_type,
                _ => return None,
            }
        };

        let raw = RawContact {
            force: rng.gen_range(0.2..1.0),
            contact_type,
            zone: if rng.gen::<f32>() < 0.3 { ContactZone::Underwater } else { ContactZone::AboveWater },
            duration_secs: rng.gen_range(0.0..1.5),
        };
        if !brutality && !self.detected(&raw, rng) {
            log::trace!("Contact {:?} by {} went unseen", contact_type, defender);
            return None;
        }

        let location = self.position(victim).unwrap_or_else(|| self.pool.attacking_goal(attacking));
        let near_goal = self.pool.distance_to_attacking_goal(attacking, &location) < SCORING_CHANCE_DISTANCE_M;
        let prevented = victim == carrier && near_goal && rng.gen::<f32>() < 0.5;
        Some(
            ViolationEvent::from_contact(defender, victim, location, &raw, snapshot.match_secs)
                .with_brutality(brutality)
                .with_prevented_scoring_chance(prevented),
        )
    }

    /// Whether the referee sees a contact. Underwater contacts are harder to
    /// spot; hand checks depend on how much the referee cares about them.
    fn detected(&self, raw: &RawContact, rng: &mut dyn RngCore) -> bool {
        let mut p = self.profile.vision_accuracy;
        if raw.zone == ContactZone::Underwater {
            p *= 0.8;
        }
        if raw.contact_type.is_hand_check() {
            p *= 0.5 + 0.5 * self.profile.hand_check_strictness;
        }
        rng.gen::<f32>() < p
    }

    /// A team trailing late in the final quarter burns a timeout once.
    fn timeout_wanted(&self, snapshot: &FeedSnapshot) -> Option<TeamId> {
        let team = snapshot.carrier?.team;
        if !snapshot.final_quarter || snapshot.quarter_remaining > 60.0 {
            return None;
        }
        if self.timeout_requested[team.index()] || snapshot.timeouts_left[team.index()] == 0 {
            return None;
        }
        let (home, away) = snapshot.score;
        let (own, other) = match team {
            TeamId::Home => (home, away),
            TeamId::Away => (away, home),
        };
        (own < other && other - own <= 2).then_some(team)
    }

    fn decision_context(
        &self,
        player: PlayerId,
        team_in_possession: Option<TeamId>,
        snapshot: &FeedSnapshot,
    ) -> DecisionContext {
        let position = self.position(player).unwrap_or_default();
        let nearest_opponent_distance = self
            .positions
            .iter()
            .filter(|(id, _)| id.team != player.team)
            .map(|(_, p)| p.distance(&position))
            .fold(f32::INFINITY, f32::min);
        let tactics = snapshot.tactics[player.team.index()];
        DecisionContext {
            position,
            team_in_possession,
            distance_to_goal: self.pool.distance_to_attacking_goal(player.team, &position),
            nearest_opponent_distance,
            shot_clock_remaining: snapshot.shot_clock_remaining,
            defense: tactics.defense,
            offense: tactics.offense,
            scalars: tactics.scalars,
        }
    }

    /// Place everyone in the water for a set attack by `attacking`.
    ///
    /// Attackers spread on an arc at their offense's preferred shooting
    /// distance. Defenders follow their scheme: marking goal-side of an
    /// attacker (man-to-man, pressing), holding spots near the goal (zone) or
    /// packing the crease (wall).
    fn layout(
        &mut self,
        roster: &dyn Roster,
        attacking: TeamId,
        snapshot: &FeedSnapshot,
        rng: &mut dyn RngCore,
    ) {
        self.positions.clear();
        let defending = attacking.opponent();
        let goal = self.pool.attacking_goal(attacking);
        let dir = toward_center(attacking);
        let offense = snapshot.tactics[attacking.index()].offense;
        let defense = snapshot.tactics[defending.index()].defense;

        let on_arc = |radius: f32, angle: f32| {
            Position::new(goal.x + dir * radius * angle.cos(), goal.y + radius * angle.sin())
        };

        // goalkeepers
        let own_goal = self.pool.attacking_goal(defending);
        self.positions.insert(
            PlayerId::new(attacking, 1),
            Position::new(own_goal.x - dir * 1.0, own_goal.y),
        );
        self.positions.insert(PlayerId::new(defending, 1), Position::new(goal.x + dir * 0.5, goal.y));

        let attackers = field_players(roster, attacking);
        let radius = offense.preferred_shot_distance() + PERIMETER_DEPTH_M;
        let mut attacker_spots = Vec::with_capacity(attackers.len());
        for (i, &player) in attackers.iter().enumerate() {
            let angle = spread(i, attackers.len(), 1.2);
            let spot = on_arc(radius + jitter(rng, 1.0), angle + jitter(rng, 0.1));
            let spot = self.pool.clamp(spot);
            attacker_spots.push((spot, angle));
            self.positions.insert(player, spot);
        }

        let defenders = field_players(roster, defending);
        for (i, &player) in defenders.iter().enumerate() {
            let spot = match defense {
                DefenseType::ManToMan | DefenseType::Pressing if !attacker_spots.is_empty() => {
                    let (mark, angle) = attacker_spots[i % attacker_spots.len()];
                    let gap = if defense == DefenseType::Pressing { PRESSING_GAP_M } else { MARKING_GAP_M };
                    // goal-side of the mark
                    let gap = gap + jitter(rng, 0.4);
                    Position::new(mark.x - dir * gap * angle.cos(), mark.y - gap * angle.sin())
                }
                DefenseType::Wall => on_arc(WALL_RADIUS_M + jitter(rng, 0.2), spread(i, defenders.len(), 1.0)),
                _ => on_arc(ZONE_RADIUS_M + jitter(rng, 0.4), spread(i, defenders.len(), 1.0)),
            };
            self.positions.insert(player, self.pool.clamp(spot));
        }
    }
}

impl PositionFeed for SyntheticFeed {
    fn position(&self, player: PlayerId) -> Option<Position> {
        self.positions.get(&player).copied()
    }

    fn field_positions(&self, team: TeamId) -> Vec<Position> {
        self.positions
            .iter()
            .filter(|(id, _)| id.team == team && !id.is_goalkeeper())
            .map(|(_, p)| *p)
            .collect()
    }
}

/// +1 when the team attacks the x = 0 goal, -1 when it attacks the far end:
/// the x direction pointing from that goal back into the pool.
fn toward_center(attacking: TeamId) -> f32 {
    match attacking {
        TeamId::Home => -1.0,
        TeamId::Away => 1.0,
    }
}

fn jitter(rng: &mut dyn RngCore, scale: f32) -> f32 {
    rng.gen_range(-POSITION_JITTER_M..POSITION_JITTER_M) * scale
}

/// Evenly spaced angle for slot `i` of `n` in [-half_width, half_width].
fn spread(i: usize, n: usize, half_width: f32) -> f32 {
    if n <= 1 {
        return 0.0;
    }
    -half_width + 2.0 * half_width * i as f32 / (n - 1) as f32
}

fn field_players(roster: &dyn Roster, team: TeamId) -> Vec<PlayerId> {
    roster.players_in_water(team).into_iter().filter(|p| !p.is_goalkeeper()).collect()
}

fn pick_player(
    roster: &dyn Roster,
    team: TeamId,
    except: Option<PlayerId>,
    rng: &mut dyn RngCore,
) -> Option<PlayerId> {
    let candidates: Vec<PlayerId> =
        roster.players_in_water(team).into_iter().filter(|p| Some(*p) != except).collect();
    candidates.choose(rng).copied()
}

fn pick_field_player(
    roster: &dyn Roster,
    team: TeamId,
    except: Option<PlayerId>,
    rng: &mut dyn RngCore,
) -> Option<PlayerId> {
    let candidates: Vec<PlayerId> =
        field_players(roster, team).into_iter().filter(|p| Some(*p) != except).collect();
    candidates.choose(rng).copied()
}

/// Missed shots mostly end with the goalkeeper.
fn rebound(roster: &dyn Roster, team: TeamId, rng: &mut dyn RngCore) -> Option<PlayerId> {
    let keeper = PlayerId::new(team, 1);
    if roster.is_eligible(keeper) && rng.gen::<f32>() < 0.7 {
        Some(keeper)
    } else {
        pick_player(roster, team, None, rng)
    }
}
