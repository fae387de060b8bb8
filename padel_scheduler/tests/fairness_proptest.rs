/// Property-based fairness tests using proptest
///
/// These drive whole tournaments with random rosters, court counts and seeds
/// and check the scheduling guarantees after every round.
use std::collections::HashSet;

use padel_scheduler::{
    Format, Match, Mode, PairLedger, ScoreEntry, TournamentSettings, TournamentState, UnitId,
    generate_next_round, pairing::select_sit_outs, session_rng, submit_scores, units,
};
use proptest::prelude::*;

fn roster(n: usize) -> Vec<UnitId> {
    let names: Vec<String> = (0..n).map(|i| format!("U{i}")).collect();
    units(&names)
}

// Strategy for a round-based format
fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Mexicano), Just(Format::Americano)]
}

// Run `rounds` rounds, checking each one with `check`
fn drive<F>(settings: &TournamentSettings, rounds: u32, seed: u64, mut check: F)
where
    F: FnMut(&TournamentState, &[Match]),
{
    let mut rng = session_rng(Some(seed));
    let mut state = TournamentState::new(settings).unwrap();
    for _ in 0..rounds {
        let outcome = generate_next_round(settings, &state, &mut rng).unwrap();
        check(&outcome.state, &outcome.matches);
        let entries = vec![ScoreEntry::new(13, 11); outcome.matches.len()];
        state = submit_scores(settings, &outcome.state, &entries).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_every_unit_plays_or_sits(
        players in 4usize..=21,
        courts in 1usize..=5,
        format in format_strategy(),
        rounds in 1u32..=8,
        seed in any::<u64>(),
    ) {
        let settings = TournamentSettings::new(roster(players), courts, Mode::Individual, format);
        drive(&settings, rounds, seed, |state, matches| {
            let active: Vec<&UnitId> = matches.iter().flat_map(|m| m.participants()).collect();
            let unique: HashSet<&UnitId> = active.iter().copied().collect();
            assert_eq!(unique.len(), active.len(), "nobody plays twice in a round");
            assert_eq!(active.len() % 4, 0);
            assert!(matches.len() <= courts);

            let benched: HashSet<&UnitId> = state.sitting_out_players.iter().collect();
            assert!(benched.is_disjoint(&unique));
            assert_eq!(benched.len() + unique.len(), players);
            assert_eq!(matches.len(), (players / 4).min(courts));
        });
    }

    #[test]
    fn test_sit_out_counts_stay_within_one(
        players in 4usize..=21,
        courts in 1usize..=5,
        format in format_strategy(),
        rounds in 1u32..=12,
        seed in any::<u64>(),
    ) {
        let settings = TournamentSettings::new(roster(players), courts, Mode::Individual, format);
        let mut total_sat = 0usize;
        drive(&settings, rounds, seed, |state, _| {
            total_sat += state.sitting_out_players.len();
            let counts = &state.sitting_out_counts;
            let max = counts.values().max().copied().unwrap_or(0);
            let min = counts.values().min().copied().unwrap_or(0);
            assert!(max - min <= 1, "counts {counts:?}");
            assert_eq!(counts.values().sum::<u32>() as usize, total_sat);
        });
    }

    #[test]
    fn test_team_rounds_use_two_units_per_match(
        pairs in 1usize..=8,
        courts in 1usize..=4,
        rounds in 1u32..=6,
        seed in any::<u64>(),
    ) {
        let settings = TournamentSettings::new(roster(pairs * 2), courts, Mode::Team, Format::Americano);
        drive(&settings, rounds, seed, |state, matches| {
            assert!(matches.iter().all(|m| m.team1.len() == 1 && m.team2.len() == 1));
            assert_eq!(matches.len(), pairs.min(courts));
            assert!(state.opponents.is_symmetric());
        });
    }

    #[test]
    fn test_selection_conserves_roster(
        players in 0usize..=30,
        courts in 1usize..=6,
        upm in prop_oneof![Just(2usize), Just(4usize)],
        prior in prop::collection::vec(0u32..=3, 30),
    ) {
        let roster = roster(players);
        let counts = roster.iter().cloned().zip(prior.iter().copied()).collect();
        let selection = select_sit_outs(&roster, &counts, courts, upm);

        prop_assert_eq!(selection.sitting_out.len() + selection.active.len(), players);
        prop_assert_eq!(selection.active.len() % upm, 0);
        prop_assert!(selection.active.len() <= courts * upm);

        // Nobody benched has sat out more often than anybody playing
        let count = |u: &UnitId| counts.get(u).copied().unwrap_or(0);
        if let Some(max_benched) = selection.sitting_out.iter().map(count).max() {
            prop_assert!(selection.active.iter().all(|u| count(u) >= max_benched));
        }
    }

    #[test]
    fn test_ledger_stays_symmetric(
        matches in prop::collection::vec((0usize..8, 0usize..8, 0usize..8, 0usize..8), 0..40),
    ) {
        let people = roster(8);
        let mut partners = PairLedger::with_roster(&people);
        let mut opponents = PairLedger::new();
        for (a, b, c, d) in matches {
            let m = Match::new(
                vec![people[a].clone(), people[b].clone()],
                vec![people[c].clone(), people[d].clone()],
            );
            partners.record_match(&m);
            opponents.record_opponents(&m);
            prop_assert!(partners.is_symmetric());
            prop_assert!(opponents.is_symmetric());
        }
        for a in &people {
            prop_assert_eq!(partners.count(a, a), 0);
        }
    }
}
