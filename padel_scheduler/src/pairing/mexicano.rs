//! Mexicano: rank-based pairing.
//!
//! Round 1 is a random draw. Later rounds rank units by total points and cut
//! the ranking into groups of four (two in team mode), so every court hosts
//! similarly-scored units. Within a group the split rotates through
//! [`PairingPattern::ROTATION`], and the last round uses the configured final
//! pattern.
//!
//! Ranking uses points only. Equal points keep roster order and wins are not
//! consulted, unlike [`crate::scoring::leaderboard`].

use log::debug;
use rand::RngCore;

use super::{PairRound, RoundInput, RoundPlan, build_matches, rank_by_points, select_sit_outs};
use crate::entities::UnitId;
use crate::errors::PairingError;
use crate::randomizer::shuffled;
use crate::settings::{Mode, PairingPattern};

#[derive(Debug, Clone, Copy, Default)]
pub struct MexicanoEngine;

impl PairRound for MexicanoEngine {
    fn pair_round(
        &self,
        input: &RoundInput<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<RoundPlan, PairingError> {
        let settings = input.settings;
        let upm = settings.units_per_match();

        let ranked = if input.round <= 1 {
            shuffled(&settings.roster, rng)
        } else {
            rank_by_points(&settings.roster, input.scores)
        };

        let num_matches = (ranked.len() / upm).min(settings.courts.len());
        let selection = select_sit_outs(&ranked, input.sit_out_counts, settings.courts.len(), upm);

        let pattern = if settings.is_final_round(input.round) {
            settings.final_pairing_pattern
        } else {
            PairingPattern::for_round(input.round)
        };
        debug!("Mexicano round {} using pattern {:?}", input.round, pattern.0);

        let teams: Vec<(Vec<UnitId>, Vec<UnitId>)> = selection
            .active
            .chunks_exact(upm)
            .take(num_matches)
            .map(|group| match settings.mode {
                Mode::Individual => pattern.apply(group),
                Mode::Team => (vec![group[0].clone()], vec![group[1].clone()]),
            })
            .collect();

        Ok(RoundPlan {
            matches: build_matches(teams, input.round, &settings.courts),
            sitting_out: selection.sitting_out,
            sit_out_counts: selection.updated_counts,
            partnerships: input.partnerships.clone(),
            opponents: input.opponents.clone(),
        })
    }
}
