//! Opponent-Pattern Learner
//!
//! Watches the opposing defense during the observation window (the first
//! quarter by default) and accumulates evidence for the scheme it is playing:
//!
//! - Zone: defenders farther than `loose_marking_distance` from every attacker
//! - ManToMan: defenders closer than `tight_marking_distance` to an attacker
//! - Pressing: no signal yet, always zero
//!
//! Each sample contributes the matching share of defenders, so one sample adds
//! at most 1.0 per scheme. Evidence never decays. Once the window closes the
//! learner emits exactly one adaptation signal and stops.

use serde::{Deserialize, Serialize};

use super::types::DefenseType;
use crate::config::LearnerConfig;
use crate::models::Position;

/// One-shot output of the learner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptationSignal {
    pub detected: DefenseType,
    pub confidence: f32,
}

/// Learner state for the match report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerSummary {
    pub evidence_man_to_man: f32,
    pub evidence_zone: f32,
    pub evidence_pressing: f32,
    pub detected: DefenseType,
    pub confidence: f32,
    pub samples: u32,
    pub adaptation_attempted: bool,
}

#[derive(Debug, Clone)]
pub struct OpponentPatternLearner {
    config: LearnerConfig,
    /// Indexed like `DefenseType::LEARNABLE`.
    evidence: [f32; 3],
    best: DefenseType,
    confidence: f32,
    samples: u32,
    since_sample: f32,
    adaptation_attempted: bool,
}

impl OpponentPatternLearner {
    pub fn new(config: LearnerConfig) -> Self {
        Self {
            config,
            evidence: [0.0; 3],
            best: DefenseType::ManToMan,
            confidence: 0.0,
            samples: 0,
            since_sample: 0.0,
            adaptation_attempted: false,
        }
    }

    pub fn is_observing(&self, quarter: u8) -> bool {
        quarter <= self.config.observation_quarters
    }

    /// Count `dt` seconds of match time toward the next sample. Returns true
    /// when a sample is due. Always false outside the observation window.
    pub fn sample_due(&mut self, dt: f32, quarter: u8) -> bool {
        if !self.is_observing(quarter) {
            return false;
        }
        self.since_sample += dt;
        if self.since_sample >= self.config.sample_interval_secs {
            self.since_sample -= self.config.sample_interval_secs;
            true
        } else {
            false
        }
    }

    /// Score one snapshot of opposing defenders against own attackers.
    /// Returns false if the snapshot was skipped for lack of players.
    pub fn observe(&mut self, defenders: &[Position], attackers: &[Position]) -> bool {
        let min = self.config.min_players_per_side;
        if defenders.len() < min || attackers.len() < min {
            log::debug!(
                "Learner sample skipped: {} defenders, {} attackers",
                defenders.len(),
                attackers.len()
            );
            return false;
        }

        let mut loose = 0usize;
        let mut tight = 0usize;
        for defender in defenders {
            let nearest = attackers
                .iter()
                .map(|a| defender.distance(a))
                .fold(f32::INFINITY, f32::min);
            if nearest > self.config.loose_marking_distance {
                loose += 1;
            } else if nearest < self.config.tight_marking_distance {
                tight += 1;
            }
        }

        let count = defenders.len() as f32;
        self.evidence[index_of(DefenseType::Zone)] += loose as f32 / count;
        self.evidence[index_of(DefenseType::ManToMan)] += tight as f32 / count;
        self.samples += 1;
        self.recompute();

        log::debug!(
            "Learner sample {}: evidence {:?}, best {:?} at {:.2}",
            self.samples,
            self.evidence,
            self.best,
            self.confidence
        );
        true
    }

    /// The single adaptation attempt, made at the first call after the
    /// observation window. `None` before the window closes and forever after.
    pub fn poll_adaptation(&mut self, quarter: u8) -> Option<AdaptationSignal> {
        if self.adaptation_attempted || self.is_observing(quarter) {
            return None;
        }
        self.adaptation_attempted = true;
        log::info!(
            "Opponent defense read as {:?} with confidence {:.2} after {} samples",
            self.best,
            self.confidence,
            self.samples
        );
        Some(AdaptationSignal { detected: self.best, confidence: self.confidence })
    }

    pub fn evidence(&self, defense: DefenseType) -> f32 {
        match defense {
            DefenseType::Wall => 0.0,
            other => self.evidence[index_of(other)],
        }
    }

    pub fn detected(&self) -> DefenseType {
        self.best
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn adaptation_attempted(&self) -> bool {
        self.adaptation_attempted
    }

    pub fn summary(&self) -> LearnerSummary {
        LearnerSummary {
            evidence_man_to_man: self.evidence(DefenseType::ManToMan),
            evidence_zone: self.evidence(DefenseType::Zone),
            evidence_pressing: self.evidence(DefenseType::Pressing),
            detected: self.best,
            confidence: self.confidence,
            samples: self.samples,
            adaptation_attempted: self.adaptation_attempted,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    fn recompute(&mut self) {
        let total: f32 = self.evidence.iter().sum();
        if total <= 0.0 {
            return;
        }
        let mut best = 0;
        for i in 1..self.evidence.len() {
            if self.evidence[i] > self.evidence[best] {
                best = i;
            }
        }
        self.best = DefenseType::LEARNABLE[best];
        self.confidence = (self.evidence[best] / total).clamp(0.0, 1.0);
    }
}

fn index_of(defense: DefenseType) -> usize {
    match defense {
        DefenseType::ManToMan => 0,
        DefenseType::Zone => 1,
        DefenseType::Pressing | DefenseType::Wall => 2,
    }
}


#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn snapshot() -> impl Strategy<Value = Vec<Position>> {
        prop::collection::vec((0.0f32..25.0, 0.0f32..20.0).prop_map(|(x, y)| Position::new(x, y)), 0..8)
    }

    proptest! {
        #[test]
        fn prop_confidence_is_dominant_share(samples in prop::collection::vec((snapshot(), snapshot()), 1..30)) {
            let mut l = OpponentPatternLearner::new(LearnerConfig::default());
            for (defenders, attackers) in &samples {
                l.observe(defenders, attackers);
                let c = l.confidence();
                prop_assert!((0.0..=1.0).contains(&c));

                let evidence: Vec<f32> = DefenseType::LEARNABLE.iter().map(|d| l.evidence(*d)).collect();
                let total: f32 = evidence.iter().sum();
                if total > 0.0 {
                    let max = evidence.iter().cloned().fold(0.0f32, f32::max);
                    prop_assert!((c - max / total).abs() < 1e-4);
                }
            }
        }
    }
}
