//! Tactical Adaptation Engine
//!
//! Per-team defense and offense selection. With auto-adaptation on, the
//! defense is dictated by the number of eligible field players:
//!
//! | field players | defense |
//! |---------------|---------|
//! | 5 or fewer    | Wall    |
//! | 6             | Zone    |
//! | 7             | back to ManToMan if the numbers forced the last change |
//!
//! The offense reacts once per match to what the opponent-pattern learner
//! read from the opposing defense.

use serde::{Deserialize, Serialize};

use super::opponent_model::{AdaptationSignal, OpponentPatternLearner};
use super::types::{DefenseType, OffenseType, TacticalScalars};
use crate::config::{LearnerConfig, TacticsConfig};
use crate::engine::event_bus::Publisher;
use crate::models::{MatchNotification, Position, TacticChange, TeamId};

/// Snapshot of a team's tactical setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamTacticalState {
    pub defense: DefenseType,
    pub offense: OffenseType,
    pub scalars: TacticalScalars,
    /// Defense is currently dictated by numerical disadvantage.
    pub forced_by_numbers: bool,
}

pub struct TeamTactics {
    team: TeamId,
    config: TacticsConfig,
    defense: DefenseType,
    offense: OffenseType,
    scalars: TacticalScalars,
    forced: bool,
    adapted_to: Option<DefenseType>,
    learner: OpponentPatternLearner,
    publisher: Publisher<MatchNotification>,
}

impl TeamTactics {
    pub fn new(
        team: TeamId,
        config: TacticsConfig,
        learner_config: LearnerConfig,
        publisher: Publisher<MatchNotification>,
    ) -> Self {
        Self {
            team,
            config,
            defense: DefenseType::ManToMan,
            offense: OffenseType::Standard,
            scalars: TacticalScalars::default(),
            forced: false,
            adapted_to: None,
            learner: OpponentPatternLearner::new(learner_config),
            publisher,
        }
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn defense(&self) -> DefenseType {
        self.defense
    }

    pub fn offense(&self) -> OffenseType {
        self.offense
    }

    pub fn scalars(&self) -> TacticalScalars {
        self.scalars
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    pub fn auto_adapt(&self) -> bool {
        self.config.auto_adapt
    }

    pub fn set_auto_adapt(&mut self, enabled: bool) {
        self.config.auto_adapt = enabled;
    }

    /// Detected defense the offense was last adapted to.
    pub fn adapted_to(&self) -> Option<DefenseType> {
        self.adapted_to
    }

    pub fn learner(&self) -> &OpponentPatternLearner {
        &self.learner
    }

    pub fn state(&self) -> TeamTacticalState {
        TeamTacticalState {
            defense: self.defense,
            offense: self.offense,
            scalars: self.scalars,
            forced_by_numbers: self.forced,
        }
    }

    /// Manual defense choice. Refused while the numbers dictate the defense.
    pub fn select_defense(&mut self, defense: DefenseType) -> bool {
        if self.config.auto_adapt && self.forced {
            log::debug!("{} defense locked to {:?} while short-handed", self.team, self.defense);
            return false;
        }
        self.change_defense(defense, "manual selection")
    }

    /// Manual offense choice.
    pub fn select_offense(&mut self, offense: OffenseType) -> bool {
        self.change_offense(offense, "manual selection")
    }

    /// Apply the numerical-disadvantage rule for `field_players` eligible
    /// players. Returns the new defense if it changed.
    pub fn evaluate_defense(&mut self, field_players: usize) -> Option<DefenseType> {
        if !self.config.auto_adapt {
            return None;
        }
        let before = self.defense;
        match field_players {
            0..=5 => {
                self.forced = true;
                self.change_defense(DefenseType::Wall, &format!("{} field players", field_players));
            }
            6 => {
                self.forced = true;
                self.change_defense(DefenseType::Zone, "one player down");
            }
            _ => {
                if self.forced {
                    self.forced = false;
                    self.change_defense(DefenseType::ManToMan, "back to full strength");
                }
            }
        }
        (self.defense != before).then_some(self.defense)
    }

    /// React to the opposing defense. Applies only with auto-adaptation on,
    /// `confidence` at or above the threshold, and a detected scheme not acted
    /// on before. Returns whether the adaptation was applied.
    pub fn adapt_to_opponent_defense(&mut self, detected: DefenseType, confidence: f32) -> bool {
        if !self.config.auto_adapt {
            return false;
        }
        if confidence < self.config.adaptation_confidence {
            log::debug!(
                "{} keeps its offense: {:?} read with confidence {:.2}",
                self.team,
                detected,
                confidence
            );
            return false;
        }
        if self.adapted_to == Some(detected) {
            return false;
        }

        let offense = match detected {
            DefenseType::Zone => OffenseType::PerimeterShot,
            DefenseType::Pressing => OffenseType::DrawAndKick,
            DefenseType::ManToMan => OffenseType::ThroughPivot,
            DefenseType::Wall => return false,
        };
        let reason = format!("opponent plays {} ({:.0}% confidence)", detected, confidence * 100.0);
        self.change_offense(offense, &reason);
        if detected == DefenseType::Pressing {
            self.scalars.cap_risk(self.config.pressing_risk_cap);
        }
        self.adapted_to = Some(detected);
        true
    }

    /// Feed the learner `dt` seconds of play and, when a sample is due, the
    /// opposing defenders and own attackers. Returns whether a sample was scored.
    pub fn observe_opponent(
        &mut self,
        dt: f32,
        quarter: u8,
        defenders: &[Position],
        attackers: &[Position],
    ) -> bool {
        self.learner.sample_due(dt, quarter) && self.learner.observe(defenders, attackers)
    }

    /// Hand the learner's one-shot signal to `adapt_to_opponent_defense`.
    /// Does nothing before the observation window closes or after the signal
    /// was used.
    pub fn poll_learner(&mut self, quarter: u8) -> Option<(AdaptationSignal, bool)> {
        let signal = self.learner.poll_adaptation(quarter)?;
        let applied = self.adapt_to_opponent_defense(signal.detected, signal.confidence);
        Some((signal, applied))
    }

    /// Back to the opening setup. The learner starts over too.
    pub fn reset(&mut self) {
        self.defense = DefenseType::ManToMan;
        self.offense = OffenseType::Standard;
        self.scalars = TacticalScalars::default();
        self.forced = false;
        self.adapted_to = None;
        self.learner.reset();
    }

    fn change_defense(&mut self, to: DefenseType, reason: &str) -> bool {
        let from = self.defense;
        if from == to {
            return false;
        }
        self.defense = to;
        self.scalars.nudge(to.nudge());
        log::info!("{} defense {} -> {} ({})", self.team, from, to, reason);
        self.publisher.publish(MatchNotification::TacticChanged {
            team: self.team,
            change: TacticChange::Defense { from, to },
            reason: reason.to_string(),
        });
        true
    }

    fn change_offense(&mut self, to: OffenseType, reason: &str) -> bool {
        let from = self.offense;
        if from == to {
            return false;
        }
        self.offense = to;
        self.scalars.nudge(to.nudge());
        log::info!("{} offense {} -> {} ({})", self.team, from, to, reason);
        self.publisher.publish(MatchNotification::TacticChanged {
            team: self.team,
            change: TacticChange::Offense { from, to },
            reason: reason.to_string(),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::event_bus::EventBus;

    fn tactics() -> TeamTactics {
        TeamTactics::new(
            TeamId::Home,
            TacticsConfig::default(),
            LearnerConfig::default(),
            Publisher::detached(),
        )
    }

    #[test]
    fn test_one_down_forces_zone() {
        let mut t = tactics();
        assert_eq!(t.evaluate_defense(6), Some(DefenseType::Zone));
        assert!(t.is_forced());
        assert_eq!(t.evaluate_defense(6), None);
        assert_eq!(t.evaluate_defense(7), Some(DefenseType::ManToMan));
        assert!(!t.is_forced());
    }

    #[test]
    fn test_two_down_forces_wall() {
        let mut t = tactics();
        assert_eq!(t.evaluate_defense(5), Some(DefenseType::Wall));
        assert_eq!(t.evaluate_defense(4), None);
        assert_eq!(t.evaluate_defense(6), Some(DefenseType::Zone));
    }

    #[test]
    fn test_full_strength_keeps_manual_choice() {
        let mut t = tactics();
        assert!(t.select_defense(DefenseType::Pressing));
        assert_eq!(t.evaluate_defense(7), None);
        assert_eq!(t.defense(), DefenseType::Pressing);
    }

    #[test]
    fn test_manual_selection_refused_while_short_handed() {
        let mut t = tactics();
        t.evaluate_defense(6);
        assert!(!t.select_defense(DefenseType::Pressing));
        assert_eq!(t.defense(), DefenseType::Zone);
    }

    #[test]
    fn test_auto_adapt_off_leaves_defense_alone() {
        let mut t = tactics();
        t.set_auto_adapt(false);
        assert_eq!(t.evaluate_defense(5), None);
        assert_eq!(t.defense(), DefenseType::ManToMan);
        assert!(!t.adapt_to_opponent_defense(DefenseType::Zone, 1.0));
    }

    #[test]
    fn test_defense_switch_nudges_scalars() {
        let mut t = tactics();
        t.evaluate_defense(5);
        let s = t.scalars();
        assert!((s.aggressiveness - 0.35).abs() < 1e-6);
        assert!((s.risk_tolerance - 0.40).abs() < 1e-6);
        assert!((s.possession_orientation - 0.60).abs() < 1e-6);
    }

    #[test]
    fn test_offense_mapping() {
        let mut t = tactics();
        assert!(t.adapt_to_opponent_defense(DefenseType::Zone, 0.9));
        assert_eq!(t.offense(), OffenseType::PerimeterShot);

        let mut t = tactics();
        assert!(t.adapt_to_opponent_defense(DefenseType::ManToMan, 0.7));
        assert_eq!(t.offense(), OffenseType::ThroughPivot);

        let mut t = tactics();
        assert!(!t.adapt_to_opponent_defense(DefenseType::Wall, 1.0));
        assert_eq!(t.offense(), OffenseType::Standard);
    }

    #[test]
    fn test_pressing_counter_caps_risk() {
        let mut t = tactics();
        t.select_offense(OffenseType::FastBreak);
        assert!(t.scalars().risk_tolerance > 0.6);
        assert!(t.adapt_to_opponent_defense(DefenseType::Pressing, 0.8));
        assert_eq!(t.offense(), OffenseType::DrawAndKick);
        assert!(t.scalars().risk_tolerance <= 0.3);
    }

    #[test]
    fn test_low_confidence_declines() {
        let mut t = tactics();
        assert!(!t.adapt_to_opponent_defense(DefenseType::Zone, 0.69));
        assert_eq!(t.offense(), OffenseType::Standard);
        assert_eq!(t.adapted_to(), None);
    }

    #[test]
    fn test_repeat_adaptation_is_noop() {
        let mut t = tactics();
        assert!(t.adapt_to_opponent_defense(DefenseType::Zone, 1.0));
        let before = t.state();
        assert!(!t.adapt_to_opponent_defense(DefenseType::Zone, 1.0));
        assert_eq!(t.state(), before);
    }

    #[test]
    fn test_tactic_changes_are_published_with_reason() {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        let mut t = TeamTactics::new(TeamId::Away, TacticsConfig::default(), LearnerConfig::default(), bus.publisher());
        t.evaluate_defense(6);

        match sub.try_next() {
            Some(MatchNotification::TacticChanged { team, change, reason }) => {
                assert_eq!(team, TeamId::Away);
                assert_eq!(change, TacticChange::Defense { from: DefenseType::ManToMan, to: DefenseType::Zone });
                assert_eq!(reason, "one player down");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_learner_drives_single_adaptation() {
        let mut t = tactics();
        let attackers: Vec<Position> = (0..6).map(|i| Position::new(18.0, 3.0 + 2.5 * i as f32)).collect();
        let defenders: Vec<Position> = attackers.iter().map(|a| Position::new(a.x + 4.0, a.y)).collect();

        let mut scored = 0;
        for _ in 0..300 {
            if t.observe_opponent(0.1, 1, &defenders, &attackers) {
                scored += 1;
            }
        }
        assert!(scored >= 9);
        assert_eq!(t.poll_learner(1), None);

        let (signal, applied) = t.poll_learner(2).expect("signal at second quarter");
        assert_eq!(signal.detected, DefenseType::Zone);
        assert!(applied);
        assert_eq!(t.offense(), OffenseType::PerimeterShot);
        assert_eq!(t.poll_learner(2), None);
    }

    #[test]
    fn test_reset() {
        let mut t = tactics();
        t.evaluate_defense(5);
        t.adapt_to_opponent_defense(DefenseType::Zone, 1.0);
        t.reset();
        assert_eq!(t.state(), TeamTacticalState {
            defense: DefenseType::ManToMan,
            offense: OffenseType::Standard,
            scalars: TacticalScalars::default(),
            forced_by_numbers: false,
        });
        assert_eq!(t.adapted_to(), None);
    }
}
