//! Round controller.
//!
//! [`TournamentState`] is a plain value. Every operation borrows the current
//! state and hands back a new one, so a rejected request leaves the caller's
//! state exactly as it was.

use log::info;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::entities::{GroupStanding, Match, ScoreRecord, Scores, SitOutCounts, UnitId};
use crate::errors::{ScoreError, SchedulerError, SchedulerResult};
use crate::pairing::groups::{
    assign_groups, compute_group_standings, generate_group_stage, is_group_stage_complete,
};
use crate::pairing::knockout::{advance_to_next_round, champion, generate_knockout_matches};
use crate::pairing::{Engine, PairLedger, PairRound, RoundInput};
use crate::scoring::{self, ScoreEntry, submit_match_score, submit_round_scores};
use crate::settings::{Format, Mode, TournamentSettings};

/// Everything that changes while a tournament is played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TournamentState {
    /// Current round, or the whole group stage in the groups format
    pub matches: Vec<Match>,
    pub scores: Scores,
    /// Rounds generated so far
    pub round: u32,
    pub sitting_out_players: Vec<UnitId>,
    pub sitting_out_counts: SitOutCounts,
    pub partnerships: PairLedger,
    pub opponents: PairLedger,
    pub groups: Vec<Vec<UnitId>>,
    pub group_standings: Vec<GroupStanding>,
    /// Every knockout round, oldest first
    pub knockout_matches: Vec<Match>,
    pub is_group_stage: bool,
    pub previous_rounds: Vec<Vec<Match>>,
}

/// A freshly generated round and the state that includes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub matches: Vec<Match>,
    pub state: TournamentState,
}

impl TournamentState {
    /// Starting state for validated settings.
    pub fn new(settings: &TournamentSettings) -> SchedulerResult<Self> {
        settings.validate()?;

        let roster = &settings.roster;
        let scores = roster
            .iter()
            .map(|u| (u.clone(), ScoreRecord::default()))
            .collect();
        let sitting_out_counts = roster.iter().map(|u| (u.clone(), 0)).collect();

        let partnerships = match (settings.format, settings.mode) {
            (Format::Americano, Mode::Individual) => PairLedger::with_roster(roster),
            _ => PairLedger::new(),
        };
        let opponents = match settings.format {
            Format::Americano => PairLedger::with_roster(roster),
            _ => PairLedger::new(),
        };

        let (groups, group_standings, is_group_stage) = match settings.format {
            Format::Groups => {
                let groups = assign_groups(roster, settings.teams_per_group);
                let standings = compute_group_standings(&groups, &[]);
                (groups, standings, true)
            }
            _ => (Vec::new(), Vec::new(), false),
        };

        info!(
            "New {} {} tournament with {} units on {} courts",
            settings.mode,
            settings.format,
            roster.len(),
            settings.courts.len()
        );

        Ok(Self {
            scores,
            sitting_out_counts,
            partnerships,
            opponents,
            groups,
            group_standings,
            is_group_stage,
            ..Self::default()
        })
    }

    /// Totals ranked by points, wins, then name.
    pub fn leaderboard(&self) -> Vec<(&UnitId, &ScoreRecord)> {
        scoring::leaderboard(&self.scores)
    }

    /// The most recent knockout round.
    pub fn current_knockout_round(&self) -> Vec<Match> {
        let latest = self.knockout_matches.iter().filter_map(|m| m.round).max();
        self.knockout_matches
            .iter()
            .filter(|m| m.round == latest)
            .cloned()
            .collect()
    }

    /// Knockout winner once the final is scored.
    pub fn champion(&self) -> Option<&UnitId> {
        champion(&self.knockout_matches)
    }
}

fn require_groups(settings: &TournamentSettings, action: &'static str) -> SchedulerResult<()> {
    if settings.format == Format::Groups {
        Ok(())
    } else {
        Err(SchedulerError::WrongPhase(action))
    }
}

/// Generate the next round.
///
/// Round-based formats need the current round fully scored first. The groups
/// format schedules its whole group stage on the first call and refuses any
/// later call; use [`start_knockout`] and [`advance_knockout`] from there.
pub fn generate_next_round(
    settings: &TournamentSettings,
    state: &TournamentState,
    rng: &mut dyn RngCore,
) -> SchedulerResult<RoundOutcome> {
    let Some(engine) = Engine::for_settings(settings) else {
        if state.round > 0 || !state.is_group_stage {
            return Err(SchedulerError::WrongPhase("group stage already scheduled"));
        }
        let matches = generate_group_stage(&state.groups, &settings.courts);
        info!(
            "Group stage scheduled: {} groups, {} matches",
            state.groups.len(),
            matches.len()
        );
        let next = TournamentState {
            matches: matches.clone(),
            round: 1,
            group_standings: compute_group_standings(&state.groups, &matches),
            ..state.clone()
        };
        return Ok(RoundOutcome {
            matches,
            state: next,
        });
    };

    if state.matches.iter().any(|m| !m.is_score_submitted) {
        return Err(ScoreError::RoundIncomplete(state.round).into());
    }

    let round = state.round + 1;
    if settings.max_rounds.is_some_and(|max| round > max) {
        return Err(ScoreError::TournamentFinished.into());
    }

    let input = RoundInput {
        settings,
        round,
        scores: &state.scores,
        sit_out_counts: &state.sitting_out_counts,
        partnerships: &state.partnerships,
        opponents: &state.opponents,
    };
    let plan = engine.pair_round(&input, rng)?;

    let mut previous_rounds = state.previous_rounds.clone();
    if !state.matches.is_empty() {
        previous_rounds.push(state.matches.clone());
    }

    info!(
        "Round {} generated: {} matches, {} sitting out",
        round,
        plan.matches.len(),
        plan.sitting_out.len()
    );

    let next = TournamentState {
        matches: plan.matches.clone(),
        round,
        sitting_out_players: plan.sitting_out,
        sitting_out_counts: plan.sit_out_counts,
        partnerships: plan.partnerships,
        opponents: plan.opponents,
        previous_rounds,
        ..state.clone()
    };
    Ok(RoundOutcome {
        matches: plan.matches,
        state: next,
    })
}

/// Score the current round of a round-based format.
pub fn submit_scores(
    settings: &TournamentSettings,
    state: &TournamentState,
    entries: &[ScoreEntry],
) -> SchedulerResult<TournamentState> {
    if settings.format == Format::Groups {
        return Err(SchedulerError::WrongPhase(
            "group and knockout matches are scored one at a time",
        ));
    }
    if state.round == 0 {
        return Err(SchedulerError::WrongPhase("no round generated yet"));
    }
    let (matches, scores) = submit_round_scores(
        settings,
        &state.matches,
        entries,
        &state.scores,
        &state.sitting_out_players,
        state.round,
    )?;
    Ok(TournamentState {
        matches,
        scores,
        ..state.clone()
    })
}

/// Score one group match and refresh the tables.
pub fn submit_group_match(
    settings: &TournamentSettings,
    state: &TournamentState,
    index: usize,
    entry: ScoreEntry,
) -> SchedulerResult<TournamentState> {
    require_groups(settings, "group matches only exist in the groups format")?;
    if !state.is_group_stage {
        return Err(SchedulerError::WrongPhase("group stage is over"));
    }
    let matches = submit_match_score(settings, &state.matches, index, entry)?;
    let group_standings = compute_group_standings(&state.groups, &matches);
    Ok(TournamentState {
        matches,
        group_standings,
        ..state.clone()
    })
}

/// Close the group stage and draw the first knockout round.
pub fn start_knockout(
    settings: &TournamentSettings,
    state: &TournamentState,
    rng: &mut dyn RngCore,
) -> SchedulerResult<TournamentState> {
    require_groups(settings, "knockout only follows a group stage")?;
    if !state.is_group_stage {
        return Err(SchedulerError::WrongPhase("knockout already started"));
    }
    if state.matches.is_empty() {
        return Err(SchedulerError::WrongPhase("group stage not scheduled yet"));
    }
    if !is_group_stage_complete(&state.matches) {
        return Err(ScoreError::RoundIncomplete(state.round).into());
    }

    let knockout_matches = generate_knockout_matches(
        &state.group_standings,
        settings.teams_advancing,
        &settings.courts,
        rng,
    )?;
    Ok(TournamentState {
        knockout_matches,
        is_group_stage: false,
        ..state.clone()
    })
}

/// Score one knockout match. `index` points into `knockout_matches`.
pub fn submit_knockout_match(
    settings: &TournamentSettings,
    state: &TournamentState,
    index: usize,
    entry: ScoreEntry,
) -> SchedulerResult<TournamentState> {
    require_groups(settings, "knockout only follows a group stage")?;
    if state.is_group_stage {
        return Err(SchedulerError::WrongPhase("knockout not started"));
    }
    let knockout_matches = submit_match_score(settings, &state.knockout_matches, index, entry)?;
    Ok(TournamentState {
        knockout_matches,
        ..state.clone()
    })
}

/// Pair the winners of the latest knockout round.
pub fn advance_knockout(
    settings: &TournamentSettings,
    state: &TournamentState,
) -> SchedulerResult<TournamentState> {
    require_groups(settings, "knockout only follows a group stage")?;
    if state.is_group_stage {
        return Err(SchedulerError::WrongPhase("knockout not started"));
    }
    let next_round = advance_to_next_round(&state.current_knockout_round(), &settings.courts)?;
    let mut knockout_matches = state.knockout_matches.clone();
    knockout_matches.extend(next_round);
    Ok(TournamentState {
        knockout_matches,
        ..state.clone()
    })
}

/// Whether nothing is left to play.
///
/// Round-based formats without `max_rounds` never finish on their own.
pub fn is_finished(settings: &TournamentSettings, state: &TournamentState) -> bool {
    match settings.format {
        Format::Groups => state.champion().is_some(),
        _ => {
            settings.max_rounds.is_some_and(|max| state.round >= max)
                && state.matches.iter().all(|m| m.is_score_submitted)
        }
    }
}
