//! Pairing engines.
//!
//! Each round-based format is an engine implementing [`PairRound`]. The
//! engines are dispatched through the [`Engine`] enum so the round controller
//! holds one concrete type regardless of format:
//!
//! - **Mexicano**: rank groups of four with a rotating split
//! - **Americano**: greedy least-repeat partners and opponents
//! - **Team Americano**: least-repeat opponents between fixed teams
//!
//! Group and knockout scheduling are not round-based and live in [`groups`]
//! and [`knockout`].

use enum_dispatch::enum_dispatch;
use rand::RngCore;

use crate::entities::{Match, Scores, SitOutCounts, UnitId};
use crate::errors::PairingError;
use crate::settings::{Format, Mode, TournamentSettings};

pub mod americano;
pub mod groups;
pub mod knockout;
pub mod ledger;
pub mod mexicano;
pub mod sit_out;

pub use americano::{AmericanoEngine, TeamAmericanoEngine};
pub use ledger::PairLedger;
pub use mexicano::MexicanoEngine;
pub use sit_out::{SitOutSelection, select_sit_outs};

/// Read-only view of the state a round is built from.
#[derive(Debug, Clone, Copy)]
pub struct RoundInput<'a> {
    pub settings: &'a TournamentSettings,
    /// Round being generated, 1-indexed
    pub round: u32,
    pub scores: &'a Scores,
    pub sit_out_counts: &'a SitOutCounts,
    pub partnerships: &'a PairLedger,
    pub opponents: &'a PairLedger,
}

/// Everything a round changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPlan {
    pub matches: Vec<Match>,
    pub sitting_out: Vec<UnitId>,
    pub sit_out_counts: SitOutCounts,
    pub partnerships: PairLedger,
    pub opponents: PairLedger,
}

#[enum_dispatch]
pub trait PairRound {
    /// Build the next round. Errors leave no partial output behind.
    fn pair_round(
        &self,
        input: &RoundInput<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<RoundPlan, PairingError>;
}

#[enum_dispatch(PairRound)]
#[derive(Debug, Clone)]
pub enum Engine {
    MexicanoEngine,
    AmericanoEngine,
    TeamAmericanoEngine,
}

impl Engine {
    /// Engine for a round-based format; `None` for the groups format.
    pub fn for_settings(settings: &TournamentSettings) -> Option<Self> {
        match (settings.format, settings.mode) {
            (Format::Mexicano, _) => Some(MexicanoEngine.into()),
            (Format::Americano, Mode::Individual) => Some(
                AmericanoEngine::new(settings.seed_strategy)
                    .with_lookahead(settings.partner_lookahead)
                    .into(),
            ),
            (Format::Americano, Mode::Team) => Some(TeamAmericanoEngine.into()),
            (Format::Groups, _) => None,
        }
    }
}

pub(crate) fn points_of(scores: &Scores, unit: &UnitId) -> u32 {
    scores.get(unit).map(|s| s.points).unwrap_or(0)
}

/// Stable sort, highest points first. Equal points keep input order.
pub(crate) fn rank_by_points(units: &[UnitId], scores: &Scores) -> Vec<UnitId> {
    let mut ranked = units.to_vec();
    ranked.sort_by(|a, b| points_of(scores, b).cmp(&points_of(scores, a)));
    ranked
}

/// Number matches from 1 and put them on courts in order.
pub(crate) fn build_matches(
    teams: Vec<(Vec<UnitId>, Vec<UnitId>)>,
    round: u32,
    courts: &[String],
) -> Vec<Match> {
    teams
        .into_iter()
        .enumerate()
        .map(|(i, (team1, team2))| {
            Match::new(team1, team2)
                .with_round(round)
                .with_number(i as u32 + 1)
                .with_court(courts.get(i))
        })
        .collect()
}
