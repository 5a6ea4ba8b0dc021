//! Officiating Engine
//!
//! State machine that turns violation reports into calls:
//!
//! ```text
//! Observing ──call──────────────────────► Whistling ──► FoulManagement ──dwell──► Resuming ──► Observing
//!     │                                      ▲
//!     └─advantage─► AdvantagePending ─window/lost ball─┘
//!                         │
//!                         └─victim scores─► Observing
//! ```
//!
//! `Whistling` and `Resuming` complete within the call that enters them. All
//! sanction side effects (foul ledger, scoreboard, exclusion timers, roster)
//! are applied synchronously while whistling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::decision::{decide_call, CallDecision};
use super::foul_record::FoulLedger;
use super::profile::OfficiatingProfile;
use super::sanction::{determine_sanction, Sanction};
use crate::config::OfficiatingConfig;
use crate::engine::clock::MatchClock;
use crate::engine::event_bus::Publisher;
use crate::engine::match_phase::{MatchPhase, MatchPhaseController};
use crate::engine::roster::Roster;
use crate::engine::scoreboard::Scoreboard;
use crate::error::OfficiatingError;
use crate::models::{MatchNotification, PlayerId, PoolGeometry, TeamId, ViolationEvent};

/// Observable referee state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefereeState {
    Observing,
    AdvantagePending,
    Whistling,
    FoulManagement,
    Resuming,
}

impl RefereeState {
    pub fn as_str(self) -> &'static str {
        match self {
            RefereeState::Observing => "observing",
            RefereeState::AdvantagePending => "advantage_pending",
            RefereeState::Whistling => "whistling",
            RefereeState::FoulManagement => "foul_management",
            RefereeState::Resuming => "resuming",
        }
    }
}

#[derive(Debug, Clone)]
enum EngineState {
    Observing,
    AdvantagePending { violation: ViolationEvent, elapsed: f32 },
    FoulManagement { elapsed: f32, sanction: Sanction },
}

impl EngineState {
    fn label(&self) -> RefereeState {
        match self {
            EngineState::Observing => RefereeState::Observing,
            EngineState::AdvantagePending { .. } => RefereeState::AdvantagePending,
            EngineState::FoulManagement { .. } => RefereeState::FoulManagement,
        }
    }
}

/// A call that was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Whistle {
    pub offending_team: TeamId,
    pub offender: Option<PlayerId>,
    pub sanction: Sanction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefereeOutcome {
    Ignored,
    AdvantagePlayed,
    Whistled(Whistle),
}

/// Something the referee did on its own during `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefereeEvent {
    /// A pending advantage was called back.
    Whistled(Whistle),
    /// Play restarted after the sanction was set up.
    Resumed(Sanction),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefereeStats {
    pub violations_seen: u32,
    pub calls: u32,
    pub ignored: u32,
    pub advantages_played: u32,
    /// Advantages that ended with the fouled team scoring.
    pub advantages_converted: u32,
    /// Decisions changed by the error model.
    pub erroneous_calls: u32,
    /// Violations rejected as invalid or arriving while busy.
    pub dropped: u32,
}

/// Collaborators the referee reads and mutates during one call.
pub struct OfficiatingContext<'a> {
    pub clock: &'a mut MatchClock,
    pub phase: &'a mut MatchPhaseController,
    pub scoreboard: &'a mut Scoreboard,
    pub roster: &'a mut dyn Roster,
    /// Team currently holding the ball, if any.
    pub possession: Option<TeamId>,
    pub pool: &'a PoolGeometry,
}

impl OfficiatingContext<'_> {
    fn now(&self) -> f32 {
        self.clock.elapsed_secs()
    }
}

pub struct OfficiatingEngine {
    config: OfficiatingConfig,
    state: EngineState,
    ledger: FoulLedger,
    stats: RefereeStats,
    transitions: Vec<(f32, RefereeState, RefereeState)>,
    publisher: Publisher<MatchNotification>,
}

impl OfficiatingEngine {
    pub fn new(config: OfficiatingConfig, publisher: Publisher<MatchNotification>) -> Self {
        Self {
            config,
            state: EngineState::Observing,
            ledger: FoulLedger::new(),
            stats: RefereeStats::default(),
            transitions: Vec::new(),
            publisher,
        }
    }

    pub fn config(&self) -> &OfficiatingConfig {
        &self.config
    }

    pub fn profile(&self) -> &OfficiatingProfile {
        &self.config.profile
    }

    pub fn state(&self) -> RefereeState {
        self.state.label()
    }

    pub fn ledger(&self) -> &FoulLedger {
        &self.ledger
    }

    pub fn stats(&self) -> &RefereeStats {
        &self.stats
    }

    /// State changes as `(match_secs, from, to)`, transient states included.
    pub fn transitions(&self) -> &[(f32, RefereeState, RefereeState)] {
        &self.transitions
    }

    /// The violation waiting on the advantage window, if any.
    pub fn pending_violation(&self) -> Option<&ViolationEvent> {
        match &self.state {
            EngineState::AdvantagePending { violation, .. } => Some(violation),
            _ => None,
        }
    }

    /// Whether the fouled team has a live scoring chance worth playing on for.
    pub fn advantage_opportunity(&self, violation: &ViolationEvent, ctx: &OfficiatingContext<'_>) -> bool {
        let Some(victim) = violation.victim_team() else {
            return false;
        };
        if ctx.possession != Some(victim) {
            return false;
        }
        let distance = ctx.pool.distance_to_attacking_goal(victim, &violation.location);
        distance >= self.config.profile.min_advantage_distance_to_goal_m
            && distance <= self.config.scoring_range_m
    }

    /// Consume one violation report.
    pub fn ingest<R: Rng + ?Sized>(
        &mut self,
        violation: ViolationEvent,
        ctx: &mut OfficiatingContext<'_>,
        rng: &mut R,
    ) -> Result<RefereeOutcome, OfficiatingError> {
        self.stats.violations_seen += 1;

        if violation.kind.requires_offender() && violation.offender.is_none() {
            self.stats.dropped += 1;
            log::warn!("Dropped {:?} violation without an offender", violation.kind);
            return Err(OfficiatingError::MissingOffender { kind: violation.kind });
        }
        if let Some(player) = violation.offender {
            if self.ledger.is_disqualified(player) {
                self.stats.dropped += 1;
                log::warn!("Dropped violation by disqualified player {}", player);
                return Err(OfficiatingError::PlayerDisqualified { player });
            }
        }

        // brutality is never let go, whatever the referee is doing
        if violation.is_brutality {
            if matches!(self.state, EngineState::AdvantagePending { .. }) {
                self.call_back_advantage(ctx);
            }
            let whistle = if matches!(self.state, EngineState::Observing) && ctx.phase.current().is_live() {
                self.whistle(&violation, ctx)
            } else {
                let sanction = self.sanction_for(&violation);
                self.apply_sanction(&violation, sanction, ctx)
            };
            return Ok(RefereeOutcome::Whistled(whistle));
        }

        if !matches!(self.state, EngineState::Observing) {
            self.stats.dropped += 1;
            let state = self.state.label().as_str();
            log::debug!("Referee busy ({}), dropped {:?}", state, violation.kind);
            return Err(OfficiatingError::EngineBusy { state });
        }
        if !ctx.phase.current().is_live() {
            self.stats.dropped += 1;
            log::debug!("Dead ball ({:?}), dropped {:?}", ctx.phase.current(), violation.kind);
            return Err(OfficiatingError::EngineBusy { state: "dead_ball" });
        }

        if violation.offender.is_none() {
            return Ok(RefereeOutcome::Whistled(self.whistle(&violation, ctx)));
        }

        let opportunity = self.advantage_opportunity(&violation, ctx);
        let trace = decide_call(&violation, &self.config.profile, opportunity, rng);
        if trace.error_injected {
            self.stats.erroneous_calls += 1;
            log::debug!("Referee error: intended {:?}, decided {:?}", trace.intended, trace.decision);
        }

        match trace.decision {
            CallDecision::Ignore => {
                self.stats.ignored += 1;
                log::debug!(
                    "Let go {:?} by {:?} (severity {:.2})",
                    violation.kind,
                    violation.offender,
                    violation.severity
                );
                Ok(RefereeOutcome::Ignored)
            }
            CallDecision::PlayAdvantage => {
                self.stats.advantages_played += 1;
                log::debug!("Advantage played for {:?}", violation.victim_team());
                self.publisher.publish(MatchNotification::AdvantagePlayed {
                    team: violation.offending_team,
                    offender: violation.offender,
                });
                let now = ctx.now();
                self.enter(EngineState::AdvantagePending { violation, elapsed: 0.0 }, now);
                Ok(RefereeOutcome::AdvantagePlayed)
            }
            CallDecision::Call => Ok(RefereeOutcome::Whistled(self.whistle(&violation, ctx))),
        }
    }

    /// Advance the advantage window and the foul-management dwell. Neither
    /// progresses while the match is paused or in a timeout.
    pub fn tick(&mut self, dt: f32, ctx: &mut OfficiatingContext<'_>) -> Option<RefereeEvent> {
        let frozen = matches!(ctx.phase.current(), MatchPhase::Paused | MatchPhase::Timeout);
        if frozen {
            return None;
        }

        match &mut self.state {
            EngineState::Observing => None,
            EngineState::AdvantagePending { violation, elapsed } => {
                *elapsed += dt;
                let victim = violation.victim_team();
                let lost_ball = ctx.possession.is_some() && ctx.possession != victim;
                if !lost_ball && *elapsed < self.config.profile.max_advantage_window_secs {
                    return None;
                }
                if lost_ball {
                    log::debug!("Advantage lost with the ball, calling back");
                }
                self.call_back_advantage(ctx).map(RefereeEvent::Whistled)
            }
            EngineState::FoulManagement { elapsed, sanction } => {
                *elapsed += dt;
                if *elapsed < self.config.foul_management_secs {
                    return None;
                }
                let sanction = *sanction;
                self.resume(sanction, ctx);
                Some(RefereeEvent::Resumed(sanction))
            }
        }
    }

    /// `team` is about to score. If the referee is playing an advantage
    /// against `team`, the foul is called back first and the whistle kills
    /// the ball, so the goal cannot stand.
    pub fn review_goal(&mut self, team: TeamId, ctx: &mut OfficiatingContext<'_>) -> Option<Whistle> {
        let against_scorer = matches!(
            &self.state,
            EngineState::AdvantagePending { violation, .. } if violation.victim_team() != Some(team)
        );
        if !against_scorer {
            return None;
        }
        log::debug!("{} scored while an advantage ran against them, calling back", team);
        self.call_back_advantage(ctx)
    }

    /// A goal was registered for `team`.
    ///
    /// An advantage the scoring side was playing is settled without a
    /// whistle. Brutality sanctions still stand. An advantage running against
    /// the scorer is called back instead.
    pub fn on_goal(&mut self, team: TeamId, ctx: &mut OfficiatingContext<'_>) -> Option<Whistle> {
        if let Some(whistle) = self.review_goal(team, ctx) {
            return Some(whistle);
        }
        self.settle(Some(team), ctx);
        None
    }

    /// The period ran out. A pending advantage lapses the same way it does on
    /// a goal, and any foul set-up is abandoned.
    pub fn on_period_end(&mut self, ctx: &mut OfficiatingContext<'_>) {
        self.settle(None, ctx);
    }

    /// Clear everything match-scoped.
    pub fn reset(&mut self) {
        self.state = EngineState::Observing;
        self.ledger.reset();
        self.stats = RefereeStats::default();
        self.transitions.clear();
    }

    // ------------------------------------------------------------------------

    fn settle(&mut self, scored_by: Option<TeamId>, ctx: &mut OfficiatingContext<'_>) {
        let now = ctx.now();
        match std::mem::replace(&mut self.state, EngineState::Observing) {
            EngineState::AdvantagePending { violation, .. } => {
                if let Some(team) = scored_by.filter(|t| violation.victim_team() == Some(*t)) {
                    self.stats.advantages_converted += 1;
                    log::debug!("Advantage converted by {}", team);
                }
                if violation.is_brutality {
                    let sanction = self.sanction_for(&violation);
                    self.apply_sanction(&violation, sanction, ctx);
                }
                self.transitions.push((now, RefereeState::AdvantagePending, RefereeState::Observing));
            }
            EngineState::FoulManagement { .. } => {
                self.transitions.push((now, RefereeState::FoulManagement, RefereeState::Observing));
            }
            EngineState::Observing => {}
        }
    }

    fn enter(&mut self, next: EngineState, at_secs: f32) {
        let from = self.state.label();
        let to = next.label();
        self.state = next;
        if from != to {
            self.transitions.push((at_secs, from, to));
        }
    }

    fn call_back_advantage(&mut self, ctx: &mut OfficiatingContext<'_>) -> Option<Whistle> {
        let violation = match &self.state {
            EngineState::AdvantagePending { violation, .. } => violation.clone(),
            _ => return None,
        };
        Some(self.whistle(&violation, ctx))
    }

    fn sanction_for(&self, violation: &ViolationEvent) -> Sanction {
        match violation.offender {
            None => Sanction::Turnover,
            Some(player) => determine_sanction(
                violation,
                &self.config.profile,
                &self.ledger.record(player),
                self.config.brutality_disqualifies,
            ),
        }
    }

    fn whistle(&mut self, violation: &ViolationEvent, ctx: &mut OfficiatingContext<'_>) -> Whistle {
        let now = ctx.now();
        self.transitions.push((now, self.state.label(), RefereeState::Whistling));

        let sanction = self.sanction_for(violation);
        ctx.clock.stop();
        request_phase(ctx, MatchPhase::FoulCalled);
        request_phase(ctx, sanction.restart_phase());
        let whistle = self.apply_sanction(violation, sanction, ctx);

        self.state = EngineState::FoulManagement { elapsed: 0.0, sanction };
        self.transitions.push((now, RefereeState::Whistling, RefereeState::FoulManagement));
        whistle
    }

    fn apply_sanction(
        &mut self,
        violation: &ViolationEvent,
        sanction: Sanction,
        ctx: &mut OfficiatingContext<'_>,
    ) -> Whistle {
        let team = violation.offending_team;
        let offender = violation.offender;
        self.stats.calls += 1;
        log::info!("Whistle: {:?} on {} ({:?})", sanction, team, offender);

        ctx.scoreboard.record_sanction(team, sanction);
        self.publisher.publish(MatchNotification::FoulCalled { team, offender, sanction });

        if let Some(player) = offender {
            let record = self.ledger.record_call(player, sanction);
            if record.disqualified {
                ctx.clock.cancel_exclusion(player);
                ctx.roster.disqualify(player);
                log::info!("{} removed for the rest of the match", player);
                self.publisher.publish(MatchNotification::PlayerDisqualified { player });
            } else if sanction.includes_exclusion() {
                let duration_secs = ctx.clock.start_exclusion(player);
                ctx.roster.set_excluded(player, true);
                self.publisher.publish(MatchNotification::ExclusionStarted { player, duration_secs });
            }
        }

        Whistle { offending_team: team, offender, sanction }
    }

    fn resume(&mut self, sanction: Sanction, ctx: &mut OfficiatingContext<'_>) {
        let now = ctx.now();
        self.transitions.push((now, RefereeState::FoulManagement, RefereeState::Resuming));

        if sanction == Sanction::Turnover || sanction.includes_penalty() {
            ctx.clock.reset_shot_clock();
        } else if sanction.includes_exclusion() {
            ctx.clock.reset_shot_clock_after_exclusion();
        }

        // a goal, quarter end or timeout may have taken over the phase meanwhile
        if ctx.phase.current().is_foul_phase() {
            request_phase(ctx, MatchPhase::Playing);
            if ctx.clock.quarter_remaining() > 0.0 {
                ctx.clock.start();
            }
        }

        self.state = EngineState::Observing;
        self.transitions.push((now, RefereeState::Resuming, RefereeState::Observing));
    }
}

fn request_phase(ctx: &mut OfficiatingContext<'_>, to: MatchPhase) {
    let now = ctx.now();
    if let Err(e) = ctx.phase.request(to, now) {
        log::warn!("Referee phase request ignored: {}", e);
    }
}
