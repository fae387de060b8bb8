//! Sit-out allocation.
//!
//! Benches the fewest units needed so the rest divide evenly into matches,
//! always choosing the units that have sat out least.

use log::debug;

use crate::entities::{SitOutCounts, UnitId};

/// Outcome of one round's allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitOutSelection {
    /// Units benched this round, in selection order
    pub sitting_out: Vec<UnitId>,
    /// Remaining units, in the caller's order
    pub active: Vec<UnitId>,
    /// Input counts with every sitter incremented
    pub updated_counts: SitOutCounts,
}

/// Number of units that must sit out.
pub fn sit_out_count(roster_len: usize, courts: usize, units_per_match: usize) -> usize {
    if units_per_match == 0 {
        return roster_len;
    }
    let max_active = roster_len.min(courts * units_per_match);
    let active_count = (max_active / units_per_match) * units_per_match;
    roster_len - active_count
}

/// Select this round's sitters.
///
/// Ties between equal counts are broken by position in `roster`, so callers
/// shuffle it first when ties should be random.
pub fn select_sit_outs(
    roster: &[UnitId],
    counts: &SitOutCounts,
    courts: usize,
    units_per_match: usize,
) -> SitOutSelection {
    let num_sit_out = sit_out_count(roster.len(), courts, units_per_match);
    let mut updated_counts = counts.clone();

    if num_sit_out == 0 {
        return SitOutSelection {
            sitting_out: Vec::new(),
            active: roster.to_vec(),
            updated_counts,
        };
    }

    let count_of = |u: &UnitId| counts.get(u).copied().unwrap_or(0);
    let mut order: Vec<usize> = (0..roster.len()).collect();
    order.sort_by_key(|&i| count_of(&roster[i]));

    let mut benched = vec![false; roster.len()];
    let mut sitting_out = Vec::with_capacity(num_sit_out);
    for &i in order.iter().take(num_sit_out) {
        benched[i] = true;
        sitting_out.push(roster[i].clone());
        *updated_counts.entry(roster[i].clone()).or_insert(0) += 1;
    }

    let active = roster
        .iter()
        .zip(benched)
        .filter(|(_, b)| !b)
        .map(|(u, _)| u.clone())
        .collect();

    debug!("Sitting out {} of {}: {:?}", num_sit_out, roster.len(), sitting_out);

    SitOutSelection {
        sitting_out,
        active,
        updated_counts,
    }
}
