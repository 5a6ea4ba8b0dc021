//! Per-player foul ledger with three-strike disqualification.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::sanction::Sanction;
use crate::models::PlayerId;

/// Exclusions plus penalties that remove a player for the rest of the match.
pub const MAJOR_SANCTIONS_FOR_DISQUALIFICATION: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoulRecord {
    pub ordinary_fouls: u32,
    pub exclusions: u8,
    pub penalties: u8,
    pub disqualified: bool,
}

impl FoulRecord {
    pub fn major_sanctions(&self) -> u8 {
        self.exclusions.saturating_add(self.penalties)
    }
}

#[derive(Debug, Default)]
pub struct FoulLedger {
    records: HashMap<PlayerId, FoulRecord>,
}

impl FoulLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a called sanction to the offender's record and return the updated record.
    ///
    /// Every call counts as an ordinary foul, whatever the sanction.
    pub fn record_call(&mut self, player: PlayerId, sanction: Sanction) -> FoulRecord {
        let record = self.records.entry(player).or_default();
        record.ordinary_fouls = record.ordinary_fouls.saturating_add(1);

        let (exclusions, penalties) = sanction.booked_majors();
        record.exclusions = record.exclusions.saturating_add(exclusions);
        record.penalties = record.penalties.saturating_add(penalties);
        if sanction.is_permanent()
            || record.major_sanctions() >= MAJOR_SANCTIONS_FOR_DISQUALIFICATION
        {
            record.disqualified = true;
        }
        *record
    }

    pub fn record(&self, player: PlayerId) -> FoulRecord {
        self.records.get(&player).copied().unwrap_or_default()
    }

    pub fn is_disqualified(&self, player: PlayerId) -> bool {
        self.records.get(&player).is_some_and(|r| r.disqualified)
    }

    pub fn disqualified_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.records.iter().filter(|(_, r)| r.disqualified).map(|(p, _)| *p)
    }

    /// All records, sorted by player for stable output.
    pub fn records(&self) -> Vec<(PlayerId, FoulRecord)> {
        let mut all: Vec<_> = self.records.iter().map(|(p, r)| (*p, *r)).collect();
        all.sort_by_key(|(p, _)| *p);
        all
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}
