//! Pool coordinates in meters.
//!
//! Origin is the corner at the home goal line; `x` runs along the length of the
//! field of play toward the away goal, `y` across its width.

use serde::{Deserialize, Serialize};

use super::TeamId;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Field-of-play dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolGeometry {
    pub length_m: f32,
    pub width_m: f32,
}

impl Default for PoolGeometry {
    fn default() -> Self {
        Self { length_m: 25.0, width_m: 20.0 }
    }
}

impl PoolGeometry {
    /// Centre of the goal that `team` attacks. Home attacks the far end.
    pub fn attacking_goal(&self, team: TeamId) -> Position {
        match team {
            TeamId::Home => Position::new(self.length_m, self.width_m / 2.0),
            TeamId::Away => Position::new(0.0, self.width_m / 2.0),
        }
    }

    pub fn distance_to_attacking_goal(&self, team: TeamId, at: &Position) -> f32 {
        self.attacking_goal(team).distance(at)
    }

    pub fn clamp(&self, p: Position) -> Position {
        Position::new(p.x.clamp(0.0, self.length_m), p.y.clamp(0.0, self.width_m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_attacking_goal_ends() {
        let pool = PoolGeometry::default();
        let near_away_goal = Position::new(23.0, 10.0);
        assert!((pool.distance_to_attacking_goal(TeamId::Home, &near_away_goal) - 2.0).abs() < 1e-5);
        assert!(pool.distance_to_attacking_goal(TeamId::Away, &near_away_goal) > 20.0);
    }
}
