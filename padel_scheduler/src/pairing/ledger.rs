//! Symmetric pair counters for partnerships and opponents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::{Match, UnitId};

/// Symmetric count of how often two units met in some relation.
///
/// Every write touches both `[a][b]` and `[b][a]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairLedger(BTreeMap<UnitId, BTreeMap<UnitId, u32>>);

impl PairLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero entry for every pair in the roster.
    pub fn with_roster(roster: &[UnitId]) -> Self {
        let mut ledger = BTreeMap::new();
        for a in roster {
            let row: BTreeMap<UnitId, u32> = roster
                .iter()
                .filter(|b| *b != a)
                .map(|b| (b.clone(), 0))
                .collect();
            ledger.insert(a.clone(), row);
        }
        Self(ledger)
    }

    pub fn increment(&mut self, a: &UnitId, b: &UnitId) {
        if a == b {
            return;
        }
        *self
            .0
            .entry(a.clone())
            .or_default()
            .entry(b.clone())
            .or_insert(0) += 1;
        *self
            .0
            .entry(b.clone())
            .or_default()
            .entry(a.clone())
            .or_insert(0) += 1;
    }

    /// Count every intra-team pair of both teams.
    pub fn record_match(&mut self, m: &Match) {
        for team in [&m.team1, &m.team2] {
            for (i, p) in team.iter().enumerate() {
                for q in &team[i + 1..] {
                    self.increment(p, q);
                }
            }
        }
    }

    /// Count every cross-team pair.
    pub fn record_opponents(&mut self, m: &Match) {
        for p in &m.team1 {
            for q in &m.team2 {
                self.increment(p, q);
            }
        }
    }

    pub fn count(&self, a: &UnitId, b: &UnitId) -> u32 {
        self.0
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of entries between each team member and `candidate`.
    pub fn opponent_score(&self, team: &[UnitId], candidate: &UnitId) -> u32 {
        team.iter().map(|member| self.count(member, candidate)).sum()
    }

    /// Sum of a unit's row.
    pub fn total(&self, a: &UnitId) -> u32 {
        self.0.get(a).map(|row| row.values().sum()).unwrap_or(0)
    }

    /// Mean count over all distinct pairs of `pool`; 0 for fewer than two units.
    pub fn average_pair_count(&self, pool: &[&UnitId]) -> f64 {
        let mut sum = 0u64;
        let mut pairs = 0u64;
        for (i, a) in pool.iter().enumerate() {
            for b in &pool[i + 1..] {
                sum += u64::from(self.count(a, b));
                pairs += 1;
            }
        }
        if pairs == 0 {
            0.0
        } else {
            sum as f64 / pairs as f64
        }
    }

    pub fn is_symmetric(&self) -> bool {
        self.0.iter().all(|(a, row)| {
            row.iter()
                .all(|(b, &n)| self.count(b, a) == n)
        })
    }

    /// Every counted pair once, as `(a, b, count)` with `a < b`.
    pub fn pairs(&self) -> impl Iterator<Item = (&UnitId, &UnitId, u32)> {
        self.0.iter().flat_map(|(a, row)| {
            row.iter()
                .filter(move |(b, _)| a < *b)
                .map(move |(b, &n)| (a, b, n))
        })
    }
}
