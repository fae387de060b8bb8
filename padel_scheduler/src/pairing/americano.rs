//! Americano: rotate partners and opponents to minimize repeats.
//!
//! The individual engine builds each match greedily: a seed unit, its
//! least-played-with partner, the opposing unit the pair has faced least, and
//! that unit's least-played-with partner. Ties are drawn at random. The final
//! round (when `max_rounds` is set) switches to skill seeding with the final
//! pairing pattern.
//!
//! The team engine does the same between fixed teams, where only opponents
//! rotate.

use log::debug;
use rand::{Rng, RngCore};

use super::{
    PairLedger, PairRound, RoundInput, RoundPlan, build_matches, rank_by_points, select_sit_outs,
};
use crate::entities::{Match, UnitId};
use crate::errors::PairingError;
use crate::randomizer::{pick_min_by_key, shuffled};
use crate::settings::SeedStrategy;

type Teams = Vec<(Vec<UnitId>, Vec<UnitId>)>;

#[derive(Debug, Clone, Copy, Default)]
pub struct AmericanoEngine {
    pub seed_strategy: SeedStrategy,
    /// Penalize partners that leave a repeat-heavy pool behind
    pub lookahead: bool,
}

impl AmericanoEngine {
    pub fn new(seed_strategy: SeedStrategy) -> Self {
        Self {
            seed_strategy,
            lookahead: false,
        }
    }

    pub fn with_lookahead(mut self, lookahead: bool) -> Self {
        self.lookahead = lookahead;
        self
    }

    fn pick_seed(&self, pool: &[UnitId], partnerships: &PairLedger, rng: &mut dyn RngCore) -> usize {
        match self.seed_strategy {
            SeedStrategy::Random => rng.random_range(0..pool.len()),
            SeedStrategy::LeastPartnered => pool
                .iter()
                .enumerate()
                .min_by_key(|(i, u)| (partnerships.total(u), *i))
                .map(|(i, _)| i)
                .unwrap_or(0),
        }
    }

    /// Candidate in `pool` with the fewest partnerships with `unit`.
    fn pick_partner(
        &self,
        unit: &UnitId,
        pool: &[UnitId],
        partnerships: &PairLedger,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        if !self.lookahead {
            return pick_min_by_key(pool, |c| partnerships.count(unit, c), rng);
        }

        pick_min_by_key(
            pool,
            |c| {
                let rest: Vec<&UnitId> = pool.iter().filter(|u| *u != c).collect();
                f64::from(partnerships.count(unit, c)) + partnerships.average_pair_count(&rest)
            },
            rng,
        )
    }

    fn greedy_round(
        &self,
        mut pool: Vec<UnitId>,
        courts: usize,
        partnerships: &mut PairLedger,
        opponents: &mut PairLedger,
        rng: &mut dyn RngCore,
    ) -> Result<Teams, PairingError> {
        // Least-partnered units first
        pool.sort_by_key(|u| partnerships.total(u));

        let mut teams = Vec::new();
        while pool.len() >= 4 && teams.len() < courts {
            let idx = self.pick_seed(&pool, partnerships, rng);
            let seed = pool.remove(idx);

            let idx = self
                .pick_partner(&seed, &pool, partnerships, rng)
                .ok_or_else(|| PairingError::NoPartnerAvailable(seed.clone()))?;
            let partner = pool.remove(idx);
            let team1 = vec![seed, partner];

            let idx = pick_min_by_key(&pool, |c| opponents.opponent_score(&team1, c), rng)
                .ok_or_else(|| PairingError::NoOpponentAvailable(team1[0].clone()))?;
            let rival = pool.remove(idx);

            let idx = pick_min_by_key(
                &pool,
                |c| (partnerships.count(&rival, c), opponents.opponent_score(&team1, c)),
                rng,
            )
            .ok_or_else(|| PairingError::NoPartnerAvailable(rival.clone()))?;
            let rival_partner = pool.remove(idx);
            let team2 = vec![rival, rival_partner];

            debug!("Americano pairing {:?} vs {:?}", team1, team2);
            record(partnerships, opponents, &team1, &team2);
            teams.push((team1, team2));
        }

        if !pool.is_empty() {
            debug!("Americano leaving {} unpaired: {:?}", pool.len(), pool);
        }

        Ok(teams)
    }
}

fn record(partnerships: &mut PairLedger, opponents: &mut PairLedger, team1: &[UnitId], team2: &[UnitId]) {
    let m = Match::new(team1.to_vec(), team2.to_vec());
    partnerships.record_match(&m);
    opponents.record_opponents(&m);
}

/// Round 1 draws the tie-break order at random; later rounds keep roster order.
fn tie_break_order(input: &RoundInput<'_>, rng: &mut dyn RngCore) -> Vec<UnitId> {
    if input.round <= 1 {
        shuffled(&input.settings.roster, rng)
    } else {
        input.settings.roster.clone()
    }
}

impl PairRound for AmericanoEngine {
    fn pair_round(
        &self,
        input: &RoundInput<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<RoundPlan, PairingError> {
        let settings = input.settings;
        let courts = settings.courts.len();
        let order = tie_break_order(input, rng);
        let selection = select_sit_outs(&order, input.sit_out_counts, courts, 4);

        let mut partnerships = input.partnerships.clone();
        let mut opponents = input.opponents.clone();

        let teams = if settings.is_final_round(input.round) {
            debug!("Americano final round {}, seeding by points", input.round);
            let ranked = rank_by_points(&selection.active, input.scores);
            let teams: Teams = ranked
                .chunks_exact(4)
                .take(courts)
                .map(|group| settings.final_pairing_pattern.apply(group))
                .collect();
            for (team1, team2) in &teams {
                record(&mut partnerships, &mut opponents, team1, team2);
            }
            teams
        } else {
            self.greedy_round(
                selection.active,
                courts,
                &mut partnerships,
                &mut opponents,
                rng,
            )?
        };

        Ok(RoundPlan {
            matches: build_matches(teams, input.round, &settings.courts),
            sitting_out: selection.sitting_out,
            sit_out_counts: selection.updated_counts,
            partnerships,
            opponents,
        })
    }
}

/// Americano between fixed teams.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamAmericanoEngine;

impl PairRound for TeamAmericanoEngine {
    fn pair_round(
        &self,
        input: &RoundInput<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<RoundPlan, PairingError> {
        let settings = input.settings;
        let courts = settings.courts.len();
        let order = shuffled(&settings.roster, rng);
        let selection = select_sit_outs(&order, input.sit_out_counts, courts, 2);

        let mut opponents = input.opponents.clone();
        let mut teams: Teams = Vec::new();

        if settings.is_final_round(input.round) {
            let ranked = rank_by_points(&selection.active, input.scores);
            for pair in ranked.chunks_exact(2).take(courts) {
                teams.push((vec![pair[0].clone()], vec![pair[1].clone()]));
            }
        } else {
            let mut pool = selection.active;
            while pool.len() >= 2 && teams.len() < courts {
                let seed = pool.remove(0);
                let idx = pick_min_by_key(&pool, |c| opponents.count(&seed, c), rng)
                    .ok_or_else(|| PairingError::NoOpponentAvailable(seed.clone()))?;
                let rival = pool.remove(idx);
                debug!("Team Americano pairing {} vs {}", seed, rival);
                teams.push((vec![seed], vec![rival]));
            }
        }

        for (team1, team2) in &teams {
            opponents.record_opponents(&Match::new(team1.clone(), team2.clone()));
        }

        Ok(RoundPlan {
            matches: build_matches(teams, input.round, &settings.courts),
            sitting_out: selection.sitting_out,
            sit_out_counts: selection.updated_counts,
            partnerships: input.partnerships.clone(),
            opponents,
        })
    }
}
