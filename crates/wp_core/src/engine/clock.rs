//! Match clock: quarter time, shot clock and concurrent exclusion countdowns.
//!
//! Stopping the clock freezes quarter time and the shot clock together.
//! Exclusion timers keep running on elapsed match time unless
//! `freeze_exclusions_with_clock` is set.

use serde::{Deserialize, Serialize};

use crate::config::ClockConfig;
use crate::models::{PlayerId, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExclusionTimer {
    pub player: PlayerId,
    pub remaining_secs: f32,
    pub initial_secs: f32,
}

/// What happened during one `advance` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClockTick {
    /// Players whose exclusion ran out this tick; their timers are already gone.
    pub expired_exclusions: Vec<PlayerId>,
    pub shot_clock_expired: bool,
    pub quarter_ended: bool,
}

#[derive(Debug, Clone)]
pub struct MatchClock {
    config: ClockConfig,
    quarter: u8,
    quarter_remaining: f32,
    shot_clock_remaining: f32,
    running: bool,
    elapsed: f32,
    exclusions: Vec<ExclusionTimer>,
}

impl MatchClock {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            quarter: 1,
            quarter_remaining: config.quarter_length_secs,
            shot_clock_remaining: config.shot_clock_secs,
            running: false,
            elapsed: 0.0,
            exclusions: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    pub fn quarter_remaining(&self) -> f32 {
        self.quarter_remaining
    }

    pub fn shot_clock_remaining(&self) -> f32 {
        self.shot_clock_remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds of simulated time since the match clock was created or reset,
    /// stoppages included.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }

    pub fn is_final_quarter(&self) -> bool {
        self.quarter >= self.config.quarters
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn advance(&mut self, dt: f32) -> ClockTick {
        let mut tick = ClockTick::default();
        if dt <= 0.0 {
            return tick;
        }
        self.elapsed += dt;

        if self.running {
            if self.shot_clock_remaining > 0.0 {
                self.shot_clock_remaining = (self.shot_clock_remaining - dt).max(0.0);
                tick.shot_clock_expired = self.shot_clock_remaining == 0.0;
            }
            if self.quarter_remaining > 0.0 {
                self.quarter_remaining = (self.quarter_remaining - dt).max(0.0);
                if self.quarter_remaining == 0.0 {
                    tick.quarter_ended = true;
                    // the period ends before the possession does
                    tick.shot_clock_expired = false;
                    self.running = false;
                }
            }
        }

        if self.running || !self.config.freeze_exclusions_with_clock {
            for timer in &mut self.exclusions {
                timer.remaining_secs -= dt;
            }
            // removal and notification happen together so a player is never
            // counted as both excluded and back in play
            self.exclusions.retain(|timer| {
                if timer.remaining_secs <= 0.0 {
                    tick.expired_exclusions.push(timer.player);
                    false
                } else {
                    true
                }
            });
        }

        tick
    }

    pub fn reset_shot_clock(&mut self) {
        self.shot_clock_remaining = self.config.shot_clock_secs;
    }

    /// After an exclusion the attacking team gets at least the reduced shot clock.
    pub fn reset_shot_clock_after_exclusion(&mut self) {
        self.shot_clock_remaining =
            self.shot_clock_remaining.max(self.config.shot_clock_after_exclusion_secs);
    }

    /// Start (or restart) an exclusion countdown. Returns its duration.
    pub fn start_exclusion(&mut self, player: PlayerId) -> f32 {
        let duration = self.config.exclusion_secs;
        self.exclusions.retain(|t| t.player != player);
        self.exclusions.push(ExclusionTimer {
            player,
            remaining_secs: duration,
            initial_secs: duration,
        });
        duration
    }

    pub fn cancel_exclusion(&mut self, player: PlayerId) -> bool {
        let before = self.exclusions.len();
        self.exclusions.retain(|t| t.player != player);
        self.exclusions.len() != before
    }

    pub fn is_excluded(&self, player: PlayerId) -> bool {
        self.exclusions.iter().any(|t| t.player == player)
    }

    pub fn active_exclusions(&self) -> &[ExclusionTimer] {
        &self.exclusions
    }

    pub fn excluded_count(&self, team: TeamId) -> usize {
        self.exclusions.iter().filter(|t| t.player.team == team).count()
    }

    /// Move to the next quarter. Returns false after the last quarter.
    pub fn begin_next_quarter(&mut self) -> bool {
        if self.is_final_quarter() {
            return false;
        }
        self.quarter += 1;
        self.quarter_remaining = self.config.quarter_length_secs;
        self.shot_clock_remaining = self.config.shot_clock_secs;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}
