//! Score validation and submission.
//!
//! Submissions are all-or-nothing: every entry is validated before anything
//! is written, and callers get back new values rather than mutated ones.

use log::info;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::{Match, RoundScore, ScoreRecord, Scores, UnitId};
use crate::errors::ScoreError;
use crate::settings::{PointSystem, TournamentSettings};

/// Scores typed in for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub team1: u32,
    pub team2: u32,
}

impl ScoreEntry {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self { team1, team2 }
    }
}

impl FromStr for ScoreEntry {
    type Err = String;

    /// Parses `"15-9"` or `"15:9"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(['-', ':'])
            .ok_or_else(|| format!("expected <team1>-<team2>, got {s:?}"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid score {v:?}: {e}"))
        };
        Ok(Self::new(parse(a)?, parse(b)?))
    }
}

/// Check one match score against the point system.
pub fn validate_score(
    settings: &TournamentSettings,
    index: usize,
    entry: ScoreEntry,
) -> Result<(), ScoreError> {
    let target = settings.points_per_match;
    match settings.point_system {
        PointSystem::PointsToPlay => {
            if entry.team1.checked_add(entry.team2) != Some(target) {
                return Err(ScoreError::PointsToPlayMismatch {
                    index,
                    team1: entry.team1,
                    team2: entry.team2,
                    expected: target,
                });
            }
        }
        PointSystem::PointsToWin => {
            if entry.team1.max(entry.team2) < target {
                return Err(ScoreError::TargetNotReached { index, target });
            }
            if entry.team1 == entry.team2 {
                return Err(ScoreError::Drawn { index });
            }
        }
    }
    Ok(())
}

fn apply_entry(m: &Match, entry: ScoreEntry) -> Match {
    let mut m = m.clone();
    m.team1_score = entry.team1;
    m.team2_score = entry.team2;
    m.is_score_submitted = true;
    m
}

/// Submit a whole round.
///
/// # Arguments
///
/// * `matches` - The round's matches, in order
/// * `editing_scores` - One entry per match
/// * `current_scores` - Totals before this round
/// * `sitting_out` - Units benched this round
/// * `round` - Round number being scored
///
/// # Returns
///
/// * `(Vec<Match>, Scores)` - Matches marked submitted and updated totals
pub fn submit_round_scores(
    settings: &TournamentSettings,
    matches: &[Match],
    editing_scores: &[ScoreEntry],
    current_scores: &Scores,
    sitting_out: &[UnitId],
    round: u32,
) -> Result<(Vec<Match>, Scores), ScoreError> {
    if editing_scores.len() != matches.len() {
        return Err(ScoreError::CountMismatch {
            expected: matches.len(),
            got: editing_scores.len(),
        });
    }

    for (index, (m, entry)) in matches.iter().zip(editing_scores).enumerate() {
        if m.is_score_submitted {
            return Err(ScoreError::AlreadySubmitted(index));
        }
        validate_score(settings, index, *entry)?;
    }

    let mut scores = current_scores.clone();
    let submitted: Vec<Match> = matches
        .iter()
        .zip(editing_scores)
        .map(|(m, entry)| apply_entry(m, *entry))
        .collect();

    for m in &submitted {
        for (team, own, other) in [
            (&m.team1, m.team1_score, m.team2_score),
            (&m.team2, m.team2_score, m.team1_score),
        ] {
            for unit in team {
                let record = scores.entry(unit.clone()).or_default();
                record.points = record.points.saturating_add(own);
                record.matches_played += 1;
                if own > other {
                    record.wins += 1;
                }
                record.set_round(round, RoundScore::Points(own));
            }
        }
    }

    for unit in sitting_out {
        scores
            .entry(unit.clone())
            .or_default()
            .set_round(round, RoundScore::Sitout);
    }

    info!("Round {} scored: {} matches", round, submitted.len());
    Ok((submitted, scores))
}

/// Submit a single group or knockout match by index.
///
/// Knockout matches additionally need a winner under either point system.
pub fn submit_match_score(
    settings: &TournamentSettings,
    matches: &[Match],
    index: usize,
    entry: ScoreEntry,
) -> Result<Vec<Match>, ScoreError> {
    let m = matches.get(index).ok_or(ScoreError::UnknownMatch(index))?;
    if m.is_score_submitted {
        return Err(ScoreError::AlreadySubmitted(index));
    }
    validate_score(settings, index, entry)?;
    if m.is_knockout && entry.team1 == entry.team2 {
        return Err(ScoreError::Drawn { index });
    }

    let mut updated = matches.to_vec();
    updated[index] = apply_entry(m, entry);
    Ok(updated)
}

/// Final standings: points, then wins, then name.
pub fn leaderboard(scores: &Scores) -> Vec<(&UnitId, &ScoreRecord)> {
    let mut rows: Vec<(&UnitId, &ScoreRecord)> = scores.iter().collect();
    rows.sort_by(|(ua, a), (ub, b)| {
        b.points
            .cmp(&a.points)
            .then(b.wins.cmp(&a.wins))
            .then(ua.cmp(ub))
    });
    rows
}
