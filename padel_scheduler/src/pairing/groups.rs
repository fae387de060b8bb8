//! Group stage: contiguous groups, full round robin inside each group.

use std::collections::BTreeMap;

use crate::entities::{GroupStanding, Match, StandingRow, UnitId};

/// Split the roster into contiguous groups of `teams_per_group`. The last
/// group holds the remainder.
pub fn assign_groups(roster: &[UnitId], teams_per_group: usize) -> Vec<Vec<UnitId>> {
    if teams_per_group == 0 {
        return vec![roster.to_vec()];
    }
    roster.chunks(teams_per_group).map(<[UnitId]>::to_vec).collect()
}

/// Circle-method rounds for `n` entrants, as index pairs.
///
/// Every pair appears exactly once and nobody plays twice within a round.
/// With an odd count each round gives one entrant a rest.
pub fn round_robin_rounds(n: usize) -> Vec<Vec<(usize, usize)>> {
    if n < 2 {
        return Vec::new();
    }
    // usize::MAX marks the resting slot
    let mut slots: Vec<usize> = (0..n).collect();
    if n % 2 == 1 {
        slots.push(usize::MAX);
    }
    let m = slots.len();

    let mut rounds = Vec::with_capacity(m - 1);
    for _ in 0..m - 1 {
        let mut round = Vec::with_capacity(m / 2);
        for i in 0..m / 2 {
            let (a, b) = (slots[i], slots[m - 1 - i]);
            if a != usize::MAX && b != usize::MAX {
                round.push((a.min(b), a.max(b)));
            }
        }
        rounds.push(round);
        // Fix the first slot, rotate the rest
        slots[1..].rotate_right(1);
    }
    rounds
}

/// Schedule every group match up front.
///
/// Group rounds are interleaved across groups and courts are handed out in
/// turn.
pub fn generate_group_stage(groups: &[Vec<UnitId>], courts: &[String]) -> Vec<Match> {
    let schedules: Vec<Vec<Vec<(usize, usize)>>> =
        groups.iter().map(|g| round_robin_rounds(g.len())).collect();
    let max_rounds = schedules.iter().map(Vec::len).max().unwrap_or(0);

    let mut matches = Vec::new();
    for round in 0..max_rounds {
        for (g, schedule) in schedules.iter().enumerate() {
            let Some(pairs) = schedule.get(round) else {
                continue;
            };
            for &(a, b) in pairs {
                let number = matches.len() as u32 + 1;
                let court = if courts.is_empty() {
                    None
                } else {
                    courts.get((number as usize - 1) % courts.len())
                };
                let mut m = Match::new(vec![groups[g][a].clone()], vec![groups[g][b].clone()])
                    .with_round(round as u32 + 1)
                    .with_number(number)
                    .with_court(court);
                m.group = Some(g);
                matches.push(m);
            }
        }
    }
    matches
}

/// Tables for every group from the submitted group matches.
///
/// Rows rank by points, then wins. Remaining ties keep group order.
pub fn compute_group_standings(groups: &[Vec<UnitId>], matches: &[Match]) -> Vec<GroupStanding> {
    groups
        .iter()
        .enumerate()
        .map(|(g, members)| {
            let mut rows: BTreeMap<&UnitId, StandingRow> = members
                .iter()
                .map(|u| {
                    (
                        u,
                        StandingRow {
                            unit: u.clone(),
                            points: 0,
                            matches_played: 0,
                            wins: 0,
                        },
                    )
                })
                .collect();

            for m in matches
                .iter()
                .filter(|m| m.group == Some(g) && m.is_score_submitted && !m.is_knockout)
            {
                for (team, own, other) in [
                    (&m.team1, m.team1_score, m.team2_score),
                    (&m.team2, m.team2_score, m.team1_score),
                ] {
                    for unit in team {
                        if let Some(row) = rows.get_mut(unit) {
                            row.points = row.points.saturating_add(own);
                            row.matches_played += 1;
                            if own > other {
                                row.wins += 1;
                            }
                        }
                    }
                }
            }

            let mut rows: Vec<StandingRow> =
                members.iter().filter_map(|u| rows.remove(u)).collect();
            rows.sort_by(|a, b| b.points.cmp(&a.points).then(b.wins.cmp(&a.wins)));
            GroupStanding { group: g, rows }
        })
        .collect()
}

/// True once every group match carries a score.
pub fn is_group_stage_complete(matches: &[Match]) -> bool {
    matches
        .iter()
        .filter(|m| m.group.is_some())
        .all(|m| m.is_score_submitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::units;
    use std::collections::HashSet;

    fn courts(n: usize) -> Vec<String> {
        (1..=n).map(|c| format!("Court {c}")).collect()
    }

    #[test]
    fn test_assign_groups_contiguous() {
        let roster = units(&["A", "B", "C", "D", "E", "F", "G"]);
        let groups = assign_groups(&roster, 3);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], units(&["A", "B", "C"]));
        assert_eq!(groups[2], units(&["G"]));
    }

    #[test]
    fn test_round_robin_covers_each_pair_once() {
        for n in 2..=9 {
            let rounds = round_robin_rounds(n);
            let mut seen = HashSet::new();
            for round in &rounds {
                let mut busy = HashSet::new();
                for &(a, b) in round {
                    assert!(a < b && b < n);
                    assert!(busy.insert(a) && busy.insert(b), "nobody plays twice in a round");
                    assert!(seen.insert((a, b)), "pair repeated");
                }
            }
            assert_eq!(seen.len(), n * (n - 1) / 2);
        }
        assert!(round_robin_rounds(1).is_empty());
    }

    #[test]
    fn test_eight_teams_in_groups_of_four() {
        let roster = units(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let groups = assign_groups(&roster, 4);
        let matches = generate_group_stage(&groups, &courts(2));

        assert_eq!(groups.len(), 2);
        assert_eq!(matches.len(), 12);
        for g in 0..2 {
            assert_eq!(matches.iter().filter(|m| m.group == Some(g)).count(), 6);
        }
        for m in &matches {
            let g = m.group.unwrap();
            assert!(groups[g].contains(&m.team1[0]));
            assert!(groups[g].contains(&m.team2[0]));
        }
        assert_eq!(matches[0].court.as_deref(), Some("Court 1"));
        assert_eq!(matches[1].court.as_deref(), Some("Court 2"));
        assert_eq!(matches[11].match_number, Some(12));
    }

    #[test]
    fn test_single_team_group_has_no_matches() {
        let roster = units(&["A", "B", "C"]);
        let groups = assign_groups(&roster, 2);
        let matches = generate_group_stage(&groups, &courts(1));
        assert_eq!(matches.len(), 1);

        let standings = compute_group_standings(&groups, &matches);
        assert_eq!(standings[1].rows.len(), 1);
        assert_eq!(standings[1].rows[0].unit, UnitId::new("C"));
    }

    #[test]
    fn test_standings_rank_points_then_wins() {
        let groups = vec![units(&["A", "B", "C"])];
        let mut matches = generate_group_stage(&groups, &courts(1));
        let scores = |m: &Match| match (m.team1[0].as_str(), m.team2[0].as_str()) {
            ("A", "B") => (10, 11),
            ("A", "C") => (20, 2),
            ("B", "C") => (10, 11),
            other => panic!("unexpected pairing {other:?}"),
        };
        for m in &mut matches {
            let (s1, s2) = scores(m);
            m.team1_score = s1;
            m.team2_score = s2;
            m.is_score_submitted = true;
        }

        let table = &compute_group_standings(&groups, &matches)[0];
        let order: Vec<&str> = table.rows.iter().map(|r| r.unit.as_str()).collect();
        // A 30 pts 1 win, B 21 pts 1 win, C 13 pts 1 win
        assert_eq!(order, vec!["A", "B", "C"]);
        assert!(table.rows.iter().all(|r| r.matches_played == 2 && r.wins == 1));
    }

    #[test]
    fn test_wins_break_point_ties() {
        let groups = vec![units(&["A", "B", "C", "D"])];
        let mut matches = generate_group_stage(&groups, &courts(1));
        for m in &mut matches {
            let pair = (m.team1[0].as_str(), m.team2[0].as_str());
            let (s1, s2) = match pair {
                ("A", "B") => (12, 10),
                ("C", "D") => (10, 6),
                _ => continue,
            };
            m.team1_score = s1;
            m.team2_score = s2;
            m.is_score_submitted = true;
        }
        assert!(!is_group_stage_complete(&matches));

        let table = &compute_group_standings(&groups, &matches)[0];
        // B and C both have 10 points, only C won
        let order: Vec<&str> = table.rows.iter().map(|r| r.unit.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B", "D"]);
        assert_eq!(table.rows[3].matches_played, 1);
    }

    #[test]
    fn test_unsubmitted_matches_do_not_count() {
        let groups = vec![units(&["A", "B"])];
        let mut matches = generate_group_stage(&groups, &courts(1));
        matches[0].team1_score = 21;
        let table = &compute_group_standings(&groups, &matches)[0];
        assert!(table.rows.iter().all(|r| r.points == 0 && r.matches_played == 0));
    }
}
