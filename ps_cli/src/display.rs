//! Plain-text views of a tournament.

use chrono::Local;
use padel_scheduler::{Format, Match, Snapshot, TournamentState};

fn print_matches(matches: &[Match]) {
    for (index, m) in matches.iter().enumerate() {
        println!("  #{index:<2} {m}");
    }
}

pub fn round(state: &TournamentState) {
    if state.is_group_stage {
        println!("Group stage ({} matches):", state.matches.len());
    } else {
        println!("Round {}:", state.round);
    }
    print_matches(&state.matches);
    if !state.sitting_out_players.is_empty() {
        let names: Vec<&str> = state
            .sitting_out_players
            .iter()
            .map(|u| u.as_str())
            .collect();
        println!("  Sitting out: {}", names.join(", "));
    }
}

pub fn leaderboard(state: &TournamentState) {
    println!("Leaderboard after round {}:", state.round);
    for (rank, (unit, record)) in state.leaderboard().into_iter().enumerate() {
        println!(
            "  {:>2}. {:<16} {:>4} pts  {:>2} W  {:>2} played",
            rank + 1,
            unit.as_str(),
            record.points,
            record.wins,
            record.matches_played
        );
    }
}

pub fn groups_and_bracket(state: &TournamentState) {
    for standing in &state.group_standings {
        println!("Group {}:", standing.group + 1);
        for row in &standing.rows {
            println!(
                "  {:<16} {:>4} pts  {:>2} W  {:>2} played",
                row.unit.as_str(), row.points, row.wins, row.matches_played
            );
        }
    }
    if state.is_group_stage {
        println!("Group matches:");
        print_matches(&state.matches);
    } else {
        println!("Knockout:");
        print_matches(&state.knockout_matches);
    }
    if let Some(champion) = state.champion() {
        println!("Champion: {champion}");
    }
}

pub fn summary(snapshot: &Snapshot) {
    let settings = &snapshot.settings;
    println!(
        "{} {} with {} units on {} courts (saved {})",
        settings.mode,
        settings.format,
        settings.roster.len(),
        settings.courts.len(),
        snapshot
            .saved_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
    match settings.format {
        Format::Groups => groups_and_bracket(&snapshot.state),
        _ => {
            round(&snapshot.state);
            leaderboard(&snapshot.state);
        }
    }
}
