//! Roster collaborator.
//!
//! The core asks the roster how many field players each team has available and
//! tells it about exclusions and disqualifications. A disqualified player never
//! returns and is not replaced.

use serde::{Deserialize, Serialize};

use super::player::{AiSwimmer, PlayerAgent};
use crate::models::{PlayerId, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    InWater,
    Excluded,
    Disqualified,
}

pub trait Roster {
    /// Players of `team` currently eligible to play: the active roster minus
    /// excluded and disqualified players.
    fn field_player_count(&self, team: TeamId) -> usize;

    fn set_excluded(&mut self, player: PlayerId, excluded: bool);

    /// Remove the player for the rest of the match.
    fn disqualify(&mut self, player: PlayerId);

    fn is_eligible(&self, player: PlayerId) -> bool;

    fn players_in_water(&self, team: TeamId) -> Vec<PlayerId>;

    fn agent_mut(&mut self, player: PlayerId) -> Option<&mut (dyn PlayerAgent + 'static)>;

    /// Everyone back in the water for a new match.
    fn reset(&mut self);
}

struct RosterEntry {
    agent: Box<dyn PlayerAgent>,
    status: PlayerStatus,
}

/// Default roster: a fixed set of agents per team, caps numbered from 1.
pub struct MatchRoster {
    entries: Vec<RosterEntry>,
}

impl MatchRoster {
    pub fn new(agents: Vec<Box<dyn PlayerAgent>>) -> Self {
        let entries = agents
            .into_iter()
            .map(|agent| RosterEntry { agent, status: PlayerStatus::InWater })
            .collect();
        Self { entries }
    }

    /// Two teams of AI swimmers, `per_team` each.
    pub fn ai_teams(per_team: u8) -> Self {
        let agents = TeamId::BOTH
            .iter()
            .flat_map(|&team| {
                (1..=per_team).map(move |n| {
                    Box::new(AiSwimmer::new(PlayerId::new(team, n))) as Box<dyn PlayerAgent>
                })
            })
            .collect();
        Self::new(agents)
    }

    /// Swap the agent driving a cap number, e.g. to put a tracked user in the
    /// water. Returns false if no such player is on the roster.
    pub fn replace_agent(&mut self, agent: Box<dyn PlayerAgent>) -> bool {
        let id = agent.id();
        match self.entries.iter_mut().find(|e| e.agent.id() == id) {
            Some(entry) => {
                entry.agent = agent;
                true
            }
            None => false,
        }
    }

    pub fn status(&self, player: PlayerId) -> Option<PlayerStatus> {
        self.entry(player).map(|e| e.status)
    }

    pub fn players(&self, team: TeamId) -> Vec<PlayerId> {
        self.entries.iter().map(|e| e.agent.id()).filter(|p| p.team == team).collect()
    }

    fn entry(&self, player: PlayerId) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.agent.id() == player)
    }

    fn entry_mut(&mut self, player: PlayerId) -> Option<&mut RosterEntry> {
        self.entries.iter_mut().find(|e| e.agent.id() == player)
    }
}

impl Roster for MatchRoster {
    fn field_player_count(&self, team: TeamId) -> usize {
        self.entries
            .iter()
            .filter(|e| e.agent.id().team == team && e.status == PlayerStatus::InWater)
            .count()
    }

    fn set_excluded(&mut self, player: PlayerId, excluded: bool) {
        if let Some(entry) = self.entry_mut(player) {
            if entry.status == PlayerStatus::Disqualified {
                return;
            }
            entry.status = if excluded { PlayerStatus::Excluded } else { PlayerStatus::InWater };
            if excluded {
                entry.agent.release_possession();
            }
        }
    }

    fn disqualify(&mut self, player: PlayerId) {
        if let Some(entry) = self.entry_mut(player) {
            entry.status = PlayerStatus::Disqualified;
            entry.agent.release_possession();
        }
    }

    fn is_eligible(&self, player: PlayerId) -> bool {
        self.entry(player).is_some_and(|e| e.status == PlayerStatus::InWater)
    }

    fn players_in_water(&self, team: TeamId) -> Vec<PlayerId> {
        self.entries
            .iter()
            .filter(|e| e.status == PlayerStatus::InWater)
            .map(|e| e.agent.id())
            .filter(|p| p.team == team)
            .collect()
    }

    fn agent_mut(&mut self, player: PlayerId) -> Option<&mut (dyn PlayerAgent + 'static)> {
        self.entry_mut(player).map(|e| e.agent.as_mut())
    }

    fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.status = PlayerStatus::InWater;
            entry.agent.release_possession();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::player::ObservedPlayer;

    #[test]
    fn test_full_strength() {
        let roster = MatchRoster::ai_teams(7);
        assert_eq!(roster.field_player_count(TeamId::Home), 7);
        assert_eq!(roster.field_player_count(TeamId::Away), 7);
        assert_eq!(roster.players_in_water(TeamId::Away).len(), 7);
    }

    #[test]
    fn test_exclusion_and_return() {
        let mut roster = MatchRoster::ai_teams(7);
        let p = PlayerId::new(TeamId::Home, 4);
        roster.set_excluded(p, true);
        assert_eq!(roster.field_player_count(TeamId::Home), 6);
        assert!(!roster.is_eligible(p));
        roster.set_excluded(p, false);
        assert_eq!(roster.field_player_count(TeamId::Home), 7);
    }

    #[test]
    fn test_disqualified_never_returns() {
        let mut roster = MatchRoster::ai_teams(7);
        let p = PlayerId::new(TeamId::Away, 6);
        roster.set_excluded(p, true);
        roster.disqualify(p);
        roster.set_excluded(p, false);
        assert_eq!(roster.status(p), Some(PlayerStatus::Disqualified));
        assert_eq!(roster.field_player_count(TeamId::Away), 6);

        roster.reset();
        assert_eq!(roster.status(p), Some(PlayerStatus::InWater));
    }

    #[test]
    fn test_exclusion_drops_ball() {
        let mut roster = MatchRoster::ai_teams(7);
        let p = PlayerId::new(TeamId::Home, 7);
        if let Some(agent) = roster.agent_mut(p) {
            agent.take_possession();
        }
        roster.set_excluded(p, true);
        assert!(roster.agent_mut(p).is_some_and(|a| !a.has_possession()));
    }

    #[test]
    fn test_replace_agent() {
        let mut roster = MatchRoster::ai_teams(7);
        assert!(roster.replace_agent(Box::new(ObservedPlayer::new(PlayerId::new(TeamId::Home, 3)))));
        assert!(!roster.replace_agent(Box::new(ObservedPlayer::new(PlayerId::new(TeamId::Home, 12)))));
        assert_eq!(roster.players(TeamId::Home).len(), 7);
    }

    #[test]
    fn test_unknown_player_is_ignored() {
        let mut roster = MatchRoster::ai_teams(6);
        roster.set_excluded(PlayerId::new(TeamId::Home, 7), true);
        assert_eq!(roster.field_player_count(TeamId::Home), 6);
        assert!(roster.agent_mut(PlayerId::new(TeamId::Home, 7)).is_none());
    }
}
