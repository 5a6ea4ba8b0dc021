//! Match Simulation
//!
//! Single scheduler that owns every core component and advances them in a
//! fixed order each tick:
//!
//! ```text
//! inputs (possession → goals → violations → timeouts)
//!   → clock (exclusion returns, shot clock, end of quarter)
//!   → referee (advantage window, foul-management dwell)
//!   → phase timers (goal celebration, quarter break, timeout)
//!   → tactics (numbers rule, opponent sampling, adaptation)
//! ```
//!
//! Violations and clock updates land before tactics run, so an exclusion is
//! reflected in the excluded team's defense within the same tick.
//!
//! Inputs come either from the caller (`tick`) or from the built-in
//! `SyntheticFeed` (`step`, `run_to_end`).

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::clock::MatchClock;
use super::event_bus::{EventBus, Publisher, Subscription};
use super::feed::{FeedEvent, FeedSnapshot, PositionFeed, SyntheticFeed};
use super::match_phase::{MatchPhase, MatchPhaseController};
use super::roster::{MatchRoster, Roster};
use super::scoreboard::{Scoreboard, TeamStats};
use super::timestep::{seconds_to_ticks, SIM_DT};
use crate::config::MatchConfig;
use crate::error::{Result, ScoreboardError};
use crate::models::{MatchNotification, PlayerId, PoolGeometry, TeamId, ViolationEvent};
use crate::referee::{
    FoulRecord, OfficiatingContext, OfficiatingEngine, OfficiatingProfile, RefereeEvent, RefereeOutcome,
    RefereeStats, Whistle,
};
use crate::tactics::{LearnerSummary, TeamTacticalState, TeamTactics};

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub team: TeamId,
    pub stats: TeamStats,
    pub tactics: TeamTacticalState,
    pub learner: LearnerSummary,
    /// Eligible players in the water at the end.
    pub field_players: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoulLedgerEntry {
    pub player: PlayerId,
    pub record: FoulRecord,
}

/// Everything worth keeping once the final whistle has gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub seed: u64,
    pub final_phase: MatchPhase,
    pub home_goals: u32,
    pub away_goals: u32,
    pub quarters_played: u8,
    pub match_secs: f32,
    pub home: TeamReport,
    pub away: TeamReport,
    pub fouls: Vec<FoulLedgerEntry>,
    pub referee: RefereeStats,
    pub referee_profile: OfficiatingProfile,
    pub phase_transitions: usize,
    pub notifications: Vec<MatchNotification>,
}

impl MatchReport {
    pub fn winner(&self) -> Option<TeamId> {
        match self.home_goals.cmp(&self.away_goals) {
            std::cmp::Ordering::Greater => Some(TeamId::Home),
            std::cmp::Ordering::Less => Some(TeamId::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn team(&self, team: TeamId) -> &TeamReport {
        match team {
            TeamId::Home => &self.home,
            TeamId::Away => &self.away,
        }
    }

    pub fn count(&self, label: &str) -> usize {
        self.notifications.iter().filter(|n| n.label() == label).count()
    }
}

// ============================================================================
// Match table
// ============================================================================

/// The officials' table: clock, phase, scoreboard and roster, plus who holds
/// the ball. This is what the referee reads and writes.
struct MatchTable {
    clock: MatchClock,
    phase: MatchPhaseController,
    scoreboard: Scoreboard,
    roster: MatchRoster,
    pool: PoolGeometry,
    carrier: Option<PlayerId>,
}

impl MatchTable {
    fn ctx(&mut self) -> OfficiatingContext<'_> {
        OfficiatingContext {
            clock: &mut self.clock,
            phase: &mut self.phase,
            scoreboard: &mut self.scoreboard,
            roster: &mut self.roster,
            possession: self.carrier.map(|p| p.team),
            pool: &self.pool,
        }
    }

    fn now(&self) -> f32 {
        self.clock.elapsed_secs()
    }

    fn request_phase(&mut self, to: MatchPhase) {
        let now = self.now();
        if let Err(e) = self.phase.request(to, now) {
            log::warn!("Phase request ignored: {}", e);
        }
    }
}

// ============================================================================
// Simulation
// ============================================================================

pub struct MatchSimulation {
    config: MatchConfig,
    seed: u64,
    rng: ChaCha8Rng,
    bus: EventBus<MatchNotification>,
    publisher: Publisher<MatchNotification>,
    log: Subscription<MatchNotification>,
    notifications: Vec<MatchNotification>,
    table: MatchTable,
    referee: OfficiatingEngine,
    tactics: [TeamTactics; 2],
    feed: SyntheticFeed,
    positions: Option<Box<dyn PositionFeed>>,
    /// Team that last held the ball. Survives a loose ball.
    possession_team: Option<TeamId>,
    restart_team: Option<TeamId>,
    phase_timer: f32,
    timeout_return: Option<MatchPhase>,
    clock_before_pause: bool,
    since_evaluation: f32,
    field_counts: [usize; 2],
    ticks: u64,
}

impl MatchSimulation {
    pub fn new(config: MatchConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let bus = EventBus::new();
        let log = bus.subscribe();
        let publisher = bus.publisher();
        let table = MatchTable {
            clock: MatchClock::new(config.clock.clone()),
            phase: MatchPhaseController::new(bus.publisher()),
            scoreboard: Scoreboard::new(),
            roster: MatchRoster::ai_teams(config.roster.players_in_water),
            pool: config.pool,
            carrier: None,
        };
        let referee = OfficiatingEngine::new(config.officiating.clone(), bus.publisher());
        let tactics = TeamId::BOTH.map(|team| {
            TeamTactics::new(team, config.tactics.clone(), config.learner.clone(), bus.publisher())
        });
        let feed = SyntheticFeed::new(config.feed.clone(), config.pool, config.officiating.profile.clone());
        let full = usize::from(config.roster.players_in_water);

        Ok(Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            bus,
            publisher,
            log,
            notifications: Vec::new(),
            table,
            referee,
            tactics,
            feed,
            positions: None,
            possession_team: None,
            restart_team: None,
            phase_timer: 0.0,
            timeout_return: None,
            clock_before_pause: false,
            since_evaluation: 0.0,
            field_counts: [full; 2],
            ticks: 0,
            config,
        })
    }

    /// Replace the roster, e.g. to put externally driven players in the water.
    pub fn with_roster(mut self, roster: MatchRoster) -> Self {
        self.field_counts = TeamId::BOTH.map(|t| roster.field_player_count(t));
        self.table.roster = roster;
        self
    }

    /// Read player positions from an outside source instead of the synthetic
    /// feed's layout.
    pub fn with_position_feed(mut self, positions: Box<dyn PositionFeed>) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn subscribe(&self) -> Subscription<MatchNotification> {
        self.bus.subscribe()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> MatchPhase {
        self.table.phase.current()
    }

    pub fn phase_history(&self) -> &[(f32, MatchPhase, MatchPhase)] {
        self.table.phase.history()
    }

    pub fn clock(&self) -> &MatchClock {
        &self.table.clock
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.table.scoreboard
    }

    pub fn roster(&self) -> &MatchRoster {
        &self.table.roster
    }

    pub fn referee(&self) -> &OfficiatingEngine {
        &self.referee
    }

    pub fn tactics(&self, team: TeamId) -> &TeamTactics {
        &self.tactics[team.index()]
    }

    /// Manual tactic selection and the auto-adaptation switch.
    pub fn tactics_mut(&mut self, team: TeamId) -> &mut TeamTactics {
        &mut self.tactics[team.index()]
    }

    pub fn carrier(&self) -> Option<PlayerId> {
        self.table.carrier
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Every notification published so far, oldest first.
    pub fn notifications(&self) -> &[MatchNotification] {
        &self.notifications
    }

    // ------------------------------------------------------------------------
    // Match control
    // ------------------------------------------------------------------------

    /// Leave `Pregame` for `Playing` and start the clock. The ball starts
    /// loose (swim-off).
    pub fn start_match(&mut self) -> Result<()> {
        let now = self.table.now();
        self.table.phase.request(MatchPhase::Playing, now)?;
        self.table.clock.start();
        log::info!("Match started (seed {})", self.seed);
        self.collect_notifications();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.table.phase.is_paused() {
            return Ok(());
        }
        let now = self.table.now();
        self.table.phase.pause(now)?;
        self.clock_before_pause = self.table.clock.is_running();
        self.table.clock.stop();
        self.collect_notifications();
        Ok(())
    }

    /// Back to the phase that was interrupted. Returns that phase.
    pub fn resume(&mut self) -> Result<MatchPhase> {
        let now = self.table.now();
        let back_to = self.table.phase.resume(now)?;
        if self.clock_before_pause {
            self.table.clock.start();
        }
        self.collect_notifications();
        Ok(back_to)
    }

    /// A team with the ball stops play. Returns the timeouts it has left.
    pub fn call_timeout(&mut self, team: TeamId) -> Result<u8> {
        let phase = self.table.phase.current();
        if !(phase.is_live() || phase.is_foul_phase()) {
            return Err(ScoreboardError::TimeoutNotAllowed { phase }.into());
        }
        if self.possession_team != Some(team) {
            return Err(ScoreboardError::TimeoutWithoutPossession { team }.into());
        }
        let left = self.table.scoreboard.use_timeout(team, self.config.clock.timeouts_per_team)?;

        self.timeout_return = Some(phase);
        self.table.clock.stop();
        self.table.request_phase(MatchPhase::Timeout);
        self.phase_timer = 0.0;
        log::info!("Timeout {} ({} left)", team, left);
        self.publisher.publish(MatchNotification::TimeoutCalled { team });
        self.collect_notifications();
        Ok(left)
    }

    /// Hand the ball to `to` (or drop it). A change of team resets the shot
    /// clock.
    pub fn change_possession(&mut self, to: Option<PlayerId>) {
        let from = self.table.carrier;
        if from == to {
            return;
        }
        if let Some(player) = to {
            if !self.table.roster.is_eligible(player) {
                log::warn!("{} is not in the water and cannot take the ball", player);
                return;
            }
        }

        if let Some(agent) = from.and_then(|p| self.table.roster.agent_mut(p)) {
            agent.release_possession();
        }
        if let Some(player) = to {
            if let Some(agent) = self.table.roster.agent_mut(player) {
                agent.take_possession();
            }
            if self.possession_team != Some(player.team) {
                self.table.clock.reset_shot_clock();
                self.possession_team = Some(player.team);
            }
        }
        self.table.carrier = to;
        log::trace!("Possession {:?} -> {:?}", from, to);
        self.publisher.publish(MatchNotification::PossessionChanged { from, to });
    }

    /// Register a goal by `scorer`. Rejected unless the phase accepts goals.
    pub fn score_goal(&mut self, scorer: PlayerId) -> Result<()> {
        let team = scorer.team;
        if let Some(whistle) = self.referee.review_goal(team, &mut self.table.ctx()) {
            self.after_whistle(whistle);
            let phase = self.table.phase.current();
            log::debug!("Goal by {} disallowed, foul called back", scorer);
            return Err(ScoreboardError::GoalRejected { phase }.into());
        }
        let phase = self.table.phase.current();
        let quarter = self.table.clock.quarter();
        self.table.scoreboard.register_goal(team, quarter, phase)?;

        let (home, away) = self.table.scoreboard.score();
        log::info!("Goal {} by {} ({}-{})", team, scorer, home, away);
        self.publisher.publish(MatchNotification::GoalScored { team, scorer: Some(scorer) });

        if let Some(whistle) = self.referee.on_goal(team, &mut self.table.ctx()) {
            self.after_whistle(whistle);
        }
        self.table.clock.stop();
        self.change_possession(None);
        self.possession_team = None;
        self.table.clock.reset_shot_clock();
        self.restart_team = Some(team.opponent());
        self.table.request_phase(MatchPhase::GoalScored);
        self.phase_timer = 0.0;
        Ok(())
    }

    /// Hand a violation report to the referee.
    pub fn report_violation(&mut self, violation: ViolationEvent) -> Result<RefereeOutcome> {
        let outcome = self.referee.ingest(violation, &mut self.table.ctx(), &mut self.rng)?;
        if let RefereeOutcome::Whistled(whistle) = outcome {
            self.after_whistle(whistle);
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------------
    // Scheduler
    // ------------------------------------------------------------------------

    /// Advance one step with inputs from the caller.
    pub fn tick(&mut self, dt: f32, mut inputs: Vec<FeedEvent>) {
        let phase = self.table.phase.current();
        if matches!(phase, MatchPhase::Pregame | MatchPhase::Paused | MatchPhase::Postgame) {
            self.collect_notifications();
            return;
        }
        self.ticks += 1;

        inputs.sort_by_key(FeedEvent::order);
        for input in inputs {
            self.apply_input(input);
        }
        self.advance_clock(dt);
        self.advance_referee(dt);
        self.advance_phase_timers(dt);
        self.update_tactics(dt);
        self.collect_notifications();
    }

    /// Advance one step with inputs from the synthetic feed.
    pub fn step(&mut self, dt: f32) {
        let inputs = if self.table.phase.current().is_live() {
            let snapshot = self.snapshot();
            self.feed.generate(dt, &snapshot, &mut self.table.roster, &mut self.rng)
        } else {
            Vec::new()
        };
        self.tick(dt, inputs);
    }

    /// Play the whole match on the synthetic feed and report.
    pub fn run_to_end(&mut self) -> Result<MatchReport> {
        if self.table.phase.current() == MatchPhase::Pregame {
            self.start_match()?;
        }
        let clock = &self.config.clock;
        let budget = f32::from(clock.quarters) * (clock.quarter_length_secs + clock.quarter_break_secs);
        // stoppages make match time longer than running time
        let max_ticks = seconds_to_ticks(budget * 10.0);

        let mut steps = 0u64;
        while self.table.phase.current() != MatchPhase::Postgame {
            if self.table.phase.is_paused() {
                log::warn!("Match paused, stopping the run at {:.1}s", self.table.now());
                break;
            }
            if steps >= max_ticks {
                log::warn!("Match did not finish within {} ticks", max_ticks);
                break;
            }
            self.step(SIM_DT);
            steps += 1;
        }
        Ok(self.report())
    }

    /// Back to `Pregame` with every match-scoped record cleared and the rng
    /// reseeded, so the same seed replays the same match.
    pub fn reset(&mut self) {
        self.table.clock.reset();
        self.table.phase.reset();
        self.table.scoreboard.reset();
        self.table.roster.reset();
        self.table.carrier = None;
        self.referee.reset();
        for tactics in &mut self.tactics {
            tactics.reset();
        }
        self.feed.reset();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);

        self.log.drain();
        self.notifications.clear();
        self.possession_team = None;
        self.restart_team = None;
        self.phase_timer = 0.0;
        self.timeout_return = None;
        self.clock_before_pause = false;
        self.since_evaluation = 0.0;
        self.field_counts = TeamId::BOTH.map(|t| self.table.roster.field_player_count(t));
        self.ticks = 0;
        log::info!("Match reset");
    }

    pub fn report(&self) -> MatchReport {
        let (home_goals, away_goals) = self.table.scoreboard.score();
        let team_report = |team: TeamId| {
            let tactics = &self.tactics[team.index()];
            TeamReport {
                team,
                stats: self.table.scoreboard.stats(team).clone(),
                tactics: tactics.state(),
                learner: tactics.learner().summary(),
                field_players: self.table.roster.field_player_count(team),
            }
        };
        MatchReport {
            seed: self.seed,
            final_phase: self.table.phase.current(),
            home_goals,
            away_goals,
            quarters_played: self.table.clock.quarter(),
            match_secs: self.table.now(),
            home: team_report(TeamId::Home),
            away: team_report(TeamId::Away),
            fouls: self
                .referee
                .ledger()
                .records()
                .into_iter()
                .map(|(player, record)| FoulLedgerEntry { player, record })
                .collect(),
            referee: *self.referee.stats(),
            referee_profile: self.referee.profile().clone(),
            phase_transitions: self.table.phase.history().len(),
            notifications: self.notifications.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Tick stages
    // ------------------------------------------------------------------------

    fn apply_input(&mut self, input: FeedEvent) {
        match input {
            FeedEvent::Possession(to) => self.change_possession(to),
            FeedEvent::Goal { scorer } => {
                if let Err(e) = self.score_goal(scorer) {
                    log::debug!("Goal by {} not counted: {}", scorer, e);
                }
            }
            FeedEvent::Violation(violation) => {
                if let Err(e) = self.report_violation(violation) {
                    log::debug!("Violation not sanctioned: {}", e);
                }
            }
            FeedEvent::Timeout(team) => {
                if let Err(e) = self.call_timeout(team) {
                    log::debug!("Timeout refused: {}", e);
                }
            }
        }
    }

    fn advance_clock(&mut self, dt: f32) {
        let tick = self.table.clock.advance(dt);

        for player in tick.expired_exclusions {
            self.table.roster.set_excluded(player, false);
            log::info!("{} returns from exclusion", player);
            self.publisher.publish(MatchNotification::ExclusionEnded { player });
        }

        if tick.shot_clock_expired && self.table.phase.current().is_live() {
            self.expire_possession();
        }

        if tick.quarter_ended {
            self.end_quarter();
        }
    }

    fn expire_possession(&mut self) {
        let Some(team) = self.possession_team else {
            self.table.clock.reset_shot_clock();
            return;
        };
        log::debug!("Shot clock expired for {}", team);
        self.publisher.publish(MatchNotification::ShotClockExpired { team });

        let location = self
            .table
            .carrier
            .and_then(|p| self.position_of(p))
            .unwrap_or_else(|| self.table.pool.attacking_goal(team));
        let violation = ViolationEvent::shot_clock_expiry(team, location, self.table.now());
        if let Err(e) = self.report_violation(violation) {
            // the referee is busy; the ball still changes hands
            log::debug!("Shot clock violation not whistled ({}), turning the ball over", e);
            self.table.scoreboard.record_turnover(team);
            let taker = self.free_throw_taker(team.opponent());
            self.change_possession(taker);
        }
    }

    fn end_quarter(&mut self) {
        self.referee.on_period_end(&mut self.table.ctx());
        self.change_possession(None);
        self.possession_team = None;
        self.phase_timer = 0.0;

        let quarter = self.table.clock.quarter();
        if self.table.clock.is_final_quarter() {
            self.table.request_phase(MatchPhase::Postgame);
            let (home, away) = self.table.scoreboard.score();
            log::info!("Final whistle: {}-{}", home, away);
        } else {
            self.table.request_phase(MatchPhase::QuarterEnd);
            log::info!("End of quarter {}", quarter);
        }
    }

    fn advance_referee(&mut self, dt: f32) {
        match self.referee.tick(dt, &mut self.table.ctx()) {
            Some(RefereeEvent::Whistled(whistle)) => self.after_whistle(whistle),
            Some(RefereeEvent::Resumed(sanction)) if sanction.includes_penalty() => self.take_penalty(),
            _ => {}
        }
    }

    fn advance_phase_timers(&mut self, dt: f32) {
        let clock = &self.config.clock;
        let phase = self.table.phase.current();
        let limit = match phase {
            MatchPhase::GoalScored => clock.goal_celebration_secs,
            MatchPhase::QuarterEnd => clock.quarter_break_secs,
            MatchPhase::Timeout => clock.timeout_secs,
            _ => return,
        };
        self.phase_timer += dt;
        if self.phase_timer < limit {
            return;
        }
        self.phase_timer = 0.0;

        match phase {
            MatchPhase::GoalScored => {
                self.restart_play();
                if let Some(team) = self.restart_team.take() {
                    let taker = self.free_throw_taker(team);
                    self.change_possession(taker);
                }
            }
            MatchPhase::QuarterEnd => {
                if self.table.clock.begin_next_quarter() {
                    log::info!("Quarter {} starts", self.table.clock.quarter());
                    self.restart_play();
                } else {
                    self.table.request_phase(MatchPhase::Postgame);
                }
            }
            MatchPhase::Timeout => {
                let back_to = self.timeout_return.take().unwrap_or(MatchPhase::Playing);
                if back_to == MatchPhase::Playing {
                    self.restart_play();
                } else {
                    // the referee finishes setting up the foul and restarts play
                    self.table.request_phase(back_to);
                }
            }
            _ => {}
        }
    }

    fn update_tactics(&mut self, dt: f32) {
        let counts = TeamId::BOTH.map(|t| self.table.roster.field_player_count(t));
        let numbers_changed = counts != self.field_counts;
        self.field_counts = counts;

        self.since_evaluation += dt;
        let due = self.since_evaluation >= self.config.tactics.evaluation_interval_secs;
        if due {
            self.since_evaluation = 0.0;
        }
        if numbers_changed || due {
            for tactics in &mut self.tactics {
                tactics.evaluate_defense(counts[tactics.team().index()]);
            }
        }

        let quarter = self.table.clock.quarter();
        if self.table.phase.current().is_live() {
            if let Some(team) = self.table.carrier.map(|p| p.team) {
                let (defenders, attackers) = match &self.positions {
                    Some(feed) => (feed.field_positions(team.opponent()), feed.field_positions(team)),
                    None => (
                        self.feed.field_positions(team.opponent()),
                        self.feed.field_positions(team),
                    ),
                };
                self.tactics[team.index()].observe_opponent(dt, quarter, &defenders, &attackers);
            }
        }
        for tactics in &mut self.tactics {
            if let Some((signal, applied)) = tactics.poll_learner(quarter) {
                log::debug!(
                    "{} learner signal {:?} at {:.2}: {}",
                    tactics.team(),
                    signal.detected,
                    signal.confidence,
                    if applied { "applied" } else { "declined" }
                );
            }
        }
    }

    fn collect_notifications(&mut self) {
        self.notifications.extend(self.log.drain());
    }

    // ------------------------------------------------------------------------

    /// After a whistle the ball belongs to the fouled side.
    fn after_whistle(&mut self, whistle: Whistle) {
        let team = whistle.offending_team.opponent();
        let holder = self.table.carrier.filter(|p| p.team == team && self.table.roster.is_eligible(*p));
        if holder.is_none() {
            let taker = self.free_throw_taker(team);
            self.change_possession(taker);
        }
    }

    /// Penalty throw by the player on the ball once the referee restarts play.
    fn take_penalty(&mut self) {
        let Some(shooter) = self.table.carrier else {
            return;
        };
        if self.rng.gen::<f32>() < self.config.feed.penalty_conversion {
            if let Err(e) = self.score_goal(shooter) {
                log::debug!("Penalty goal not counted: {}", e);
            }
        } else {
            log::debug!("Penalty by {} saved", shooter);
            let keeper = PlayerId::new(shooter.team.opponent(), 1);
            let rebound = if self.table.roster.is_eligible(keeper) {
                Some(keeper)
            } else {
                self.free_throw_taker(shooter.team.opponent())
            };
            self.change_possession(rebound);
        }
    }

    fn restart_play(&mut self) {
        self.table.request_phase(MatchPhase::Playing);
        if self.table.clock.quarter_remaining() > 0.0 {
            self.table.clock.start();
        }
    }

    fn free_throw_taker(&mut self, team: TeamId) -> Option<PlayerId> {
        let field: Vec<PlayerId> = self
            .table
            .roster
            .players_in_water(team)
            .into_iter()
            .filter(|p| !p.is_goalkeeper())
            .collect();
        field.choose(&mut self.rng).copied()
    }

    fn position_of(&self, player: PlayerId) -> Option<crate::models::Position> {
        match &self.positions {
            Some(feed) => feed.position(player),
            None => self.feed.position(player),
        }
    }

    fn snapshot(&self) -> FeedSnapshot {
        let clock = &self.table.clock;
        let max = self.config.clock.timeouts_per_team;
        FeedSnapshot {
            carrier: self.table.carrier,
            match_secs: clock.elapsed_secs(),
            final_quarter: clock.is_final_quarter(),
            quarter_remaining: clock.quarter_remaining(),
            shot_clock_remaining: clock.shot_clock_remaining(),
            score: self.table.scoreboard.score(),
            timeouts_left: TeamId::BOTH
                .map(|t| max.saturating_sub(self.table.scoreboard.stats(t).timeouts_used)),
            tactics: [self.tactics[0].state(), self.tactics[1].state()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactType, ContactZone, Position, RawContact};
    use crate::tactics::DefenseType;

    fn home(n: u8) -> PlayerId {
        PlayerId::new(TeamId::Home, n)
    }

    fn away(n: u8) -> PlayerId {
        PlayerId::new(TeamId::Away, n)
    }

    fn exact_config() -> MatchConfig {
        let mut config = MatchConfig::quick();
        config.officiating.profile = OfficiatingProfile {
            strictness: 0.5,
            error_rate: 0.0,
            exclusion_tendency: 0.5,
            advantage_orientation: 0.0,
            ..OfficiatingProfile::balanced()
        };
        config
    }

    fn started(config: MatchConfig) -> MatchSimulation {
        let mut sim = MatchSimulation::new(config, 7).unwrap();
        sim.start_match().unwrap();
        sim
    }

    fn idle(sim: &mut MatchSimulation, secs: f32) {
        for _ in 0..seconds_to_ticks(secs) {
            sim.tick(SIM_DT, Vec::new());
        }
    }

    fn hard_foul(offender: PlayerId, victim: PlayerId, at: f32) -> ViolationEvent {
        let contact = RawContact {
            force: 0.8,
            contact_type: ContactType::Holding,
            zone: ContactZone::AboveWater,
            duration_secs: 0.0,
        };
        ViolationEvent::from_contact(offender, victim, Position::new(12.0, 10.0), &contact, at)
            .with_severity(0.95)
    }

    #[test]
    fn test_quick_match_runs_to_postgame() {
        let mut sim = MatchSimulation::new(MatchConfig::quick(), 42).unwrap();
        let report = sim.run_to_end().unwrap();

        assert_eq!(report.final_phase, MatchPhase::Postgame);
        assert_eq!(report.quarters_played, 4);
        let by_quarter: u32 = report.home.stats.goals_by_quarter.iter().sum();
        assert_eq!(by_quarter, report.home_goals);
        assert_eq!(report.count("goal_scored") as u32, report.home_goals + report.away_goals);
    }

    #[test]
    fn test_same_seed_same_match() {
        let a = MatchSimulation::new(MatchConfig::quick(), 9).unwrap().run_to_end().unwrap();
        let b = MatchSimulation::new(MatchConfig::quick(), 9).unwrap().run_to_end().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exclusion_forces_zone_in_same_tick() {
        let mut sim = started(exact_config());
        sim.tick(SIM_DT, vec![FeedEvent::Possession(Some(home(5)))]);

        sim.tick(SIM_DT, vec![FeedEvent::Violation(hard_foul(away(4), home(5), 0.2))]);
        assert_eq!(sim.roster().field_player_count(TeamId::Away), 6);
        assert_eq!(sim.tactics(TeamId::Away).defense(), DefenseType::Zone);
        assert_eq!(sim.carrier(), Some(home(5)));

        idle(&mut sim, 21.0);
        assert_eq!(sim.roster().field_player_count(TeamId::Away), 7);
        assert_eq!(sim.tactics(TeamId::Away).defense(), DefenseType::ManToMan);
        assert!(sim.notifications().iter().any(|n| *n == MatchNotification::ExclusionEnded { player: away(4) }));
    }

    #[test]
    fn test_shot_clock_expiry_hands_ball_over() {
        let mut sim = started(exact_config());
        sim.tick(SIM_DT, vec![FeedEvent::Possession(Some(home(5)))]);
        idle(&mut sim, 30.5);

        assert!(sim.notifications().contains(&MatchNotification::ShotClockExpired { team: TeamId::Home }));
        assert_eq!(sim.carrier().map(|p| p.team), Some(TeamId::Away));
        assert_eq!(sim.scoreboard().stats(TeamId::Home).turnovers, 1);
    }

    #[test]
    fn test_goal_then_restart_by_opponent() {
        let mut sim = started(exact_config());
        sim.tick(SIM_DT, vec![FeedEvent::Possession(Some(home(5)))]);
        sim.tick(SIM_DT, vec![FeedEvent::Goal { scorer: home(5) }]);

        assert_eq!(sim.scoreboard().score(), (1, 0));
        assert_eq!(sim.phase(), MatchPhase::GoalScored);
        assert!(!sim.clock().is_running());

        idle(&mut sim, 5.1);
        assert_eq!(sim.phase(), MatchPhase::Playing);
        assert!(sim.clock().is_running());
        assert_eq!(sim.carrier().map(|p| p.team), Some(TeamId::Away));
        assert!(sim.clock().shot_clock_remaining() > 29.0);
    }

    #[test]
    fn test_goal_rejected_before_start() {
        let mut sim = MatchSimulation::new(MatchConfig::quick(), 1).unwrap();
        let err = sim.score_goal(home(5)).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(sim.scoreboard().score(), (0, 0));
    }

    #[test]
    fn test_timeout_needs_the_ball_and_returns_to_play() {
        let mut sim = started(exact_config());
        sim.tick(SIM_DT, vec![FeedEvent::Possession(Some(home(5)))]);

        assert!(sim.call_timeout(TeamId::Away).is_err());
        assert_eq!(sim.call_timeout(TeamId::Home).unwrap(), 1);
        assert_eq!(sim.phase(), MatchPhase::Timeout);
        assert!(!sim.clock().is_running());

        idle(&mut sim, 10.1);
        assert_eq!(sim.phase(), MatchPhase::Playing);
        assert!(sim.clock().is_running());

        sim.call_timeout(TeamId::Home).unwrap();
        idle(&mut sim, 10.1);
        assert!(matches!(
            sim.call_timeout(TeamId::Home),
            Err(crate::error::CoreError::Scoreboard(ScoreboardError::NoTimeoutsLeft { .. }))
        ));
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut sim = started(exact_config());
        sim.tick(SIM_DT, vec![FeedEvent::Possession(Some(home(5)))]);
        let before = sim.clock().elapsed_secs();

        sim.pause().unwrap();
        idle(&mut sim, 5.0);
        assert_eq!(sim.clock().elapsed_secs(), before);
        assert_eq!(sim.resume().unwrap(), MatchPhase::Playing);
        assert!(sim.clock().is_running());
    }

    #[test]
    fn test_penalty_is_taken_after_the_dwell() {
        let mut config = exact_config();
        config.feed.penalty_conversion = 1.0;
        let mut sim = started(config);
        sim.tick(SIM_DT, vec![FeedEvent::Possession(Some(home(5)))]);

        let foul = hard_foul(away(3), home(5), 0.2).with_prevented_scoring_chance(true);
        sim.tick(SIM_DT, vec![FeedEvent::Violation(foul)]);
        assert_eq!(sim.phase(), MatchPhase::Penalty);
        assert_eq!(sim.scoreboard().stats(TeamId::Away).penalties_conceded, 1);

        idle(&mut sim, 2.1);
        assert_eq!(sim.scoreboard().score(), (1, 0));
        assert!(sim.notifications().iter().any(|n| matches!(
            n,
            MatchNotification::FoulCalled { sanction, .. } if sanction.includes_penalty()
        )));
        // severity 0.95 also clears the exclusion threshold
        assert_eq!(sim.roster().field_player_count(TeamId::Away), 6);
    }

    #[test]
    fn test_reset_restores_pregame() {
        let mut sim = MatchSimulation::new(MatchConfig::quick(), 3).unwrap();
        let first = sim.run_to_end().unwrap();

        sim.reset();
        assert_eq!(sim.phase(), MatchPhase::Pregame);
        assert_eq!(sim.scoreboard().score(), (0, 0));
        assert!(sim.referee().ledger().records().is_empty());
        assert_eq!(sim.tactics(TeamId::Home).learner().samples(), 0);
        assert!(!sim.tactics(TeamId::Home).learner().adaptation_attempted());
        assert!(sim.clock().active_exclusions().is_empty());
        assert!(sim.notifications().is_empty());

        assert_eq!(sim.run_to_end().unwrap(), first);
    }
}
