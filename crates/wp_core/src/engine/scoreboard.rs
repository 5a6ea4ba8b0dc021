//! Scoreboard: authoritative goal and statistics ledger.

use serde::{Deserialize, Serialize};

use super::match_phase::MatchPhase;
use crate::error::ScoreboardError;
use crate::models::TeamId;
use crate::referee::Sanction;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub goals: u32,
    pub ordinary_fouls: u32,
    pub exclusions: u32,
    /// Penalties awarded against this team.
    pub penalties_conceded: u32,
    pub permanent_exclusions: u32,
    pub turnovers: u32,
    pub timeouts_used: u8,
    /// Goals per quarter, index 0 = first quarter.
    pub goals_by_quarter: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    teams: [TeamStats; 2],
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a goal. Only `Playing` and `Penalty` accept goals.
    pub fn register_goal(
        &mut self,
        team: TeamId,
        quarter: u8,
        phase: MatchPhase,
    ) -> Result<u32, ScoreboardError> {
        if !phase.accepts_goal() {
            return Err(ScoreboardError::GoalRejected { phase });
        }
        let stats = &mut self.teams[team.index()];
        stats.goals += 1;

        let slot = usize::from(quarter.max(1) - 1);
        if stats.goals_by_quarter.len() <= slot {
            stats.goals_by_quarter.resize(slot + 1, 0);
        }
        stats.goals_by_quarter[slot] += 1;
        Ok(stats.goals)
    }

    /// Charge a called sanction to the offending team.
    pub fn record_sanction(&mut self, team: TeamId, sanction: Sanction) {
        let stats = &mut self.teams[team.index()];
        match sanction {
            Sanction::Turnover => stats.turnovers += 1,
            _ => stats.ordinary_fouls += 1,
        }
        if sanction.includes_exclusion() {
            stats.exclusions += 1;
        }
        if sanction.includes_penalty() {
            stats.penalties_conceded += 1;
        }
        if sanction.is_permanent() {
            stats.permanent_exclusions += 1;
        }
    }

    pub fn record_turnover(&mut self, team: TeamId) {
        self.teams[team.index()].turnovers += 1;
    }

    pub fn use_timeout(&mut self, team: TeamId, max_per_team: u8) -> Result<u8, ScoreboardError> {
        let stats = &mut self.teams[team.index()];
        if stats.timeouts_used >= max_per_team {
            return Err(ScoreboardError::NoTimeoutsLeft { team });
        }
        stats.timeouts_used += 1;
        Ok(max_per_team - stats.timeouts_used)
    }

    /// `(home, away)` goals.
    pub fn score(&self) -> (u32, u32) {
        (self.teams[0].goals, self.teams[1].goals)
    }

    pub fn stats(&self, team: TeamId) -> &TeamStats {
        &self.teams[team.index()]
    }

    pub fn reset(&mut self) {
        self.teams = Default::default();
    }
}
