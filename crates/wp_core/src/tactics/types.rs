//! Tactical vocabulary: defense and offense schemes and the team scalars they nudge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Team defense scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DefenseType {
    /// Every defender marks one attacker
    #[default]
    ManToMan,
    /// Defenders hold areas in front of goal
    Zone,
    /// Aggressive marking high up the pool
    Pressing,
    /// Compact block in front of goal when two or more players down
    Wall,
}

impl DefenseType {
    /// Schemes the opponent-pattern learner keeps evidence for, in tie-break order.
    pub const LEARNABLE: [DefenseType; 3] =
        [DefenseType::ManToMan, DefenseType::Zone, DefenseType::Pressing];

    /// `(aggressiveness, risk_tolerance, possession_orientation)` nudge applied on switching to this scheme.
    pub fn nudge(self) -> (f32, f32, f32) {
        match self {
            DefenseType::ManToMan => (0.05, 0.0, 0.0),
            DefenseType::Zone => (-0.05, -0.05, 0.05),
            DefenseType::Pressing => (0.15, 0.10, -0.05),
            DefenseType::Wall => (-0.15, -0.10, 0.10),
        }
    }
}

impl fmt::Display for DefenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DefenseType::ManToMan => "man-to-man",
            DefenseType::Zone => "zone",
            DefenseType::Pressing => "pressing",
            DefenseType::Wall => "wall",
        };
        f.write_str(name)
    }
}

/// Team offense scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OffenseType {
    #[default]
    Standard,
    /// Feed the centre forward at two meters
    ThroughPivot,
    /// Counter-attack before the defense sets
    FastBreak,
    /// Outside shots over a packed zone
    PerimeterShot,
    /// Draw the press and kick the ball to the open man
    DrawAndKick,
}

impl OffenseType {
    /// `(aggressiveness, risk_tolerance, possession_orientation)` nudge applied on switching to this scheme.
    pub fn nudge(self) -> (f32, f32, f32) {
        match self {
            OffenseType::Standard => (0.0, 0.0, 0.0),
            OffenseType::ThroughPivot => (0.05, 0.0, 0.05),
            OffenseType::FastBreak => (0.10, 0.15, -0.10),
            OffenseType::PerimeterShot => (0.0, 0.10, -0.05),
            OffenseType::DrawAndKick => (-0.05, -0.10, 0.10),
        }
    }

    /// Shot range in meters the scheme is built around.
    pub fn preferred_shot_distance(self) -> f32 {
        match self {
            OffenseType::ThroughPivot => 3.0,
            OffenseType::PerimeterShot => 8.0,
            OffenseType::FastBreak => 5.0,
            OffenseType::Standard | OffenseType::DrawAndKick => 6.0,
        }
    }
}

impl fmt::Display for OffenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OffenseType::Standard => "standard",
            OffenseType::ThroughPivot => "through-pivot",
            OffenseType::FastBreak => "fast-break",
            OffenseType::PerimeterShot => "perimeter-shot",
            OffenseType::DrawAndKick => "draw-and-kick",
        };
        f.write_str(name)
    }
}

/// Team-wide tendencies read by the player agents. All values in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TacticalScalars {
    pub aggressiveness: f32,
    pub risk_tolerance: f32,
    pub possession_orientation: f32,
}

impl Default for TacticalScalars {
    fn default() -> Self {
        Self { aggressiveness: 0.5, risk_tolerance: 0.5, possession_orientation: 0.5 }
    }
}

impl TacticalScalars {
    /// Add a nudge and clamp every scalar back into [0, 1].
    pub fn nudge(&mut self, (aggressiveness, risk, possession): (f32, f32, f32)) {
        self.aggressiveness = (self.aggressiveness + aggressiveness).clamp(0.0, 1.0);
        self.risk_tolerance = (self.risk_tolerance + risk).clamp(0.0, 1.0);
        self.possession_orientation = (self.possession_orientation + possession).clamp(0.0, 1.0);
    }

    pub fn cap_risk(&mut self, max: f32) {
        self.risk_tolerance = self.risk_tolerance.min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nudge_accumulates() {
        let mut s = TacticalScalars::default();
        s.nudge(DefenseType::Pressing.nudge());
        s.nudge(DefenseType::Pressing.nudge());
        assert!((s.aggressiveness - 0.8).abs() < 1e-6);
        assert!((s.risk_tolerance - 0.7).abs() < 1e-6);
        assert!((s.possession_orientation - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_nudge_clamps() {
        let mut s = TacticalScalars { aggressiveness: 0.95, risk_tolerance: 0.02, possession_orientation: 1.0 };
        s.nudge((0.2, -0.1, 0.1));
        assert_eq!(s.aggressiveness, 1.0);
        assert_eq!(s.risk_tolerance, 0.0);
        assert_eq!(s.possession_orientation, 1.0);
    }

    #[test]
    fn test_cap_risk_never_raises() {
        let mut s = TacticalScalars { risk_tolerance: 0.2, ..TacticalScalars::default() };
        s.cap_risk(0.3);
        assert_eq!(s.risk_tolerance, 0.2);
        s.risk_tolerance = 0.6;
        s.cap_risk(0.3);
        assert_eq!(s.risk_tolerance, 0.3);
    }

    #[test]
    fn test_learnable_excludes_wall() {
        assert!(!DefenseType::LEARNABLE.contains(&DefenseType::Wall));
        assert_eq!(DefenseType::LEARNABLE[0], DefenseType::ManToMan);
    }
}
