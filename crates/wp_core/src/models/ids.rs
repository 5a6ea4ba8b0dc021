//! Team and player identifiers shared by every component.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamId {
    Home,
    Away,
}

impl TeamId {
    pub const BOTH: [TeamId; 2] = [TeamId::Home, TeamId::Away];

    pub fn opponent(self) -> Self {
        match self {
            TeamId::Home => TeamId::Away,
            TeamId::Away => TeamId::Home,
        }
    }

    /// Array slot for per-team storage (home = 0, away = 1).
    pub fn index(self) -> usize {
        match self {
            TeamId::Home => 0,
            TeamId::Away => 1,
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TeamId::Home => write!(f, "home"),
            TeamId::Away => write!(f, "away"),
        }
    }
}

/// Cap number within a team. Number 1 is the goalkeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId {
    pub team: TeamId,
    pub number: u8,
}

impl PlayerId {
    pub fn new(team: TeamId, number: u8) -> Self {
        Self { team, number }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.number == 1
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.team {
            TeamId::Home => 'H',
            TeamId::Away => 'A',
        };
        write!(f, "{}{}", prefix, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_roundtrip() {
        assert_eq!(TeamId::Home.opponent(), TeamId::Away);
        assert_eq!(TeamId::Away.opponent().opponent(), TeamId::Away);
    }

    #[test]
    fn test_player_display() {
        assert_eq!(PlayerId::new(TeamId::Home, 7).to_string(), "H7");
        assert_eq!(PlayerId::new(TeamId::Away, 1).to_string(), "A1");
        assert!(PlayerId::new(TeamId::Away, 1).is_goalkeeper());
    }
}
