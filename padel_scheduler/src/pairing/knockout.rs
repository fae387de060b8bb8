//! Single-elimination bracket seeded from group standings.

use log::info;
use rand::RngCore;

use crate::entities::{GroupStanding, KnockoutStage, Match, UnitId};
use crate::errors::{ConfigError, ScoreError};
use crate::randomizer::shuffled;

fn bracket_round(field: Vec<UnitId>, round: u32, courts: &[String]) -> Vec<Match> {
    let stage = KnockoutStage::for_field(field.len());
    field
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let court = if courts.is_empty() {
                None
            } else {
                courts.get(i % courts.len())
            };
            let mut m = Match::new(vec![pair[0].clone()], vec![pair[1].clone()])
                .with_round(round)
                .with_number(i as u32 + 1)
                .with_court(court);
            m.knockout_round = Some(stage);
            m.is_knockout = true;
            m
        })
        .collect()
}

/// First knockout round from the top `teams_advancing` of every group.
///
/// Advancing units are drawn at random into the bracket. The field must be a
/// power of two so every later round halves cleanly.
pub fn generate_knockout_matches(
    standings: &[GroupStanding],
    teams_advancing: usize,
    courts: &[String],
    rng: &mut dyn RngCore,
) -> Result<Vec<Match>, ConfigError> {
    let advancing: Vec<UnitId> = standings
        .iter()
        .flat_map(|s| s.rows.iter().take(teams_advancing).map(|r| r.unit.clone()))
        .collect();

    if advancing.len() < 2 || !advancing.len().is_power_of_two() {
        return Err(ConfigError::UnevenKnockoutField(advancing.len()));
    }

    let field = shuffled(&advancing, rng);
    info!(
        "Knockout starts with {} units ({})",
        field.len(),
        KnockoutStage::for_field(field.len())
    );
    Ok(bracket_round(field, 1, courts))
}

/// Next bracket round from a completed one.
///
/// # Errors
///
/// * `RoundIncomplete` - a match has no score yet
/// * `Drawn` - a match has no winner
/// * `TournamentFinished` - the round was the final
pub fn advance_to_next_round(
    round_matches: &[Match],
    courts: &[String],
) -> Result<Vec<Match>, ScoreError> {
    let round = round_matches.first().and_then(|m| m.round).unwrap_or(0);

    if round_matches.is_empty() || round_matches.iter().any(|m| !m.is_score_submitted) {
        return Err(ScoreError::RoundIncomplete(round));
    }

    if round_matches.len() == 1 {
        return Err(ScoreError::TournamentFinished);
    }

    let mut winners = Vec::with_capacity(round_matches.len());
    for (index, m) in round_matches.iter().enumerate() {
        let side = m.winner().ok_or(ScoreError::Drawn { index })?;
        winners.extend(m.team(side).iter().cloned());
    }

    info!(
        "Knockout round {} complete, {} advance to the {}",
        round,
        winners.len(),
        KnockoutStage::for_field(winners.len())
    );
    Ok(bracket_round(winners, round + 1, courts))
}

/// Winner of a submitted final, if any.
pub fn champion(knockout_matches: &[Match]) -> Option<&UnitId> {
    knockout_matches
        .iter()
        .filter(|m| m.knockout_round == Some(KnockoutStage::Final))
        .find_map(|m| m.winner().map(|side| &m.team(side)[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{StandingRow, units};
    use crate::randomizer::session_rng;
    use std::collections::HashSet;

    fn standing(group: usize, names: &[&str]) -> GroupStanding {
        GroupStanding {
            group,
            rows: units(names)
                .into_iter()
                .map(|unit| StandingRow {
                    unit,
                    points: 0,
                    matches_played: 0,
                    wins: 0,
                })
                .collect(),
        }
    }

    fn courts() -> Vec<String> {
        vec!["Court 1".to_string(), "Court 2".to_string()]
    }

    fn decide(matches: &mut [Match]) {
        // Team1 always wins
        for m in matches {
            m.team1_score = 11;
            m.team2_score = 5;
            m.is_score_submitted = true;
        }
    }

    #[test]
    fn test_two_groups_two_advancing_gives_semis() {
        let standings = vec![
            standing(0, &["A", "B", "C", "D"]),
            standing(1, &["E", "F", "G", "H"]),
        ];
        let matches =
            generate_knockout_matches(&standings, 2, &courts(), &mut session_rng(Some(1))).unwrap();

        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.knockout_round == Some(KnockoutStage::Semi)));
        assert!(matches.iter().all(|m| m.is_knockout && m.round == Some(1)));
        let field: HashSet<_> = matches.iter().flat_map(|m| m.participants()).collect();
        let expected = units(&["A", "B", "E", "F"]);
        let expected: HashSet<_> = expected.iter().collect();
        assert_eq!(field, expected);
    }

    #[test]
    fn test_eight_advancing_starts_at_quarters() {
        let standings = vec![
            standing(0, &["A", "B", "C"]),
            standing(1, &["D", "E", "F"]),
            standing(2, &["G", "H", "I"]),
            standing(3, &["J", "K", "L"]),
        ];
        let matches =
            generate_knockout_matches(&standings, 2, &courts(), &mut session_rng(Some(2))).unwrap();
        assert_eq!(matches.len(), 4);
        assert!(matches.iter().all(|m| m.knockout_round == Some(KnockoutStage::Quarter)));
    }

    #[test]
    fn test_uneven_field_rejected() {
        let standings = vec![
            standing(0, &["A", "B"]),
            standing(1, &["C", "D"]),
            standing(2, &["E", "F"]),
        ];
        let err = generate_knockout_matches(&standings, 2, &courts(), &mut session_rng(Some(1)));
        assert_eq!(err, Err(ConfigError::UnevenKnockoutField(6)));

        let err = generate_knockout_matches(&standings[..1], 1, &courts(), &mut session_rng(Some(1)));
        assert_eq!(err, Err(ConfigError::UnevenKnockoutField(1)));
    }

    #[test]
    fn test_bracket_runs_to_final() {
        let standings = vec![
            standing(0, &["A", "B"]),
            standing(1, &["C", "D"]),
            standing(2, &["E", "F"]),
            standing(3, &["G", "H"]),
        ];
        let mut quarters =
            generate_knockout_matches(&standings, 2, &courts(), &mut session_rng(Some(3))).unwrap();
        decide(&mut quarters);

        let mut semis = advance_to_next_round(&quarters, &courts()).unwrap();
        assert_eq!(semis.len(), 2);
        assert!(semis.iter().all(|m| m.knockout_round == Some(KnockoutStage::Semi)));
        assert!(semis.iter().all(|m| m.round == Some(2)));
        assert_eq!(semis[0].team1[0], quarters[0].team1[0]);
        assert_eq!(semis[0].team2[0], quarters[1].team1[0]);
        decide(&mut semis);

        let mut finals = advance_to_next_round(&semis, &courts()).unwrap();
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].knockout_round, Some(KnockoutStage::Final));
        assert_eq!(champion(&finals), None);
        decide(&mut finals);

        assert_eq!(champion(&finals), Some(&semis[0].team1[0]));
        assert_eq!(
            advance_to_next_round(&finals, &courts()),
            Err(ScoreError::TournamentFinished)
        );
    }

    #[test]
    fn test_sixteen_field_second_round_is_quarter() {
        let standings = vec![
            standing(0, &["A", "B", "C", "D"]),
            standing(1, &["E", "F", "G", "H"]),
            standing(2, &["I", "J", "K", "L"]),
            standing(3, &["M", "N", "O", "P"]),
        ];
        let mut first =
            generate_knockout_matches(&standings, 4, &courts(), &mut session_rng(Some(5))).unwrap();
        assert_eq!(first.len(), 8);
        assert!(first.iter().all(|m| m.knockout_round == Some(KnockoutStage::Quarter)));
        decide(&mut first);

        let mut second = advance_to_next_round(&first, &courts()).unwrap();
        assert_eq!(second.len(), 4);
        assert!(second.iter().all(|m| m.knockout_round == Some(KnockoutStage::Quarter)));
        decide(&mut second);

        let third = advance_to_next_round(&second, &courts()).unwrap();
        assert!(third.iter().all(|m| m.knockout_round == Some(KnockoutStage::Semi)));
    }

    #[test]
    fn test_advance_requires_all_scores() {
        let standings = vec![standing(0, &["A", "B"]), standing(1, &["C", "D"])];
        let mut semis =
            generate_knockout_matches(&standings, 2, &courts(), &mut session_rng(Some(4))).unwrap();
        semis[0].team1_score = 11;
        semis[0].is_score_submitted = true;
        assert_eq!(
            advance_to_next_round(&semis, &courts()),
            Err(ScoreError::RoundIncomplete(1))
        );

        semis[1].is_score_submitted = true;
        assert_eq!(
            advance_to_next_round(&semis, &courts()),
            Err(ScoreError::Drawn { index: 1 })
        );
    }
}
