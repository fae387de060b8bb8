//! Command line tournament desk.
//!
//! Each invocation loads the saved tournament, applies one command, and
//! writes the result back.

mod display;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Error, bail};
use log::info;
use padel_scheduler::{
    ScoreEntry, Snapshot, TournamentSettings, TournamentState, advance_knockout,
    generate_next_round, is_finished, session_rng, start_knockout, submit_group_match,
    submit_knockout_match, submit_scores,
};
use pico_args::Arguments;

const HELP: &str = "\
Schedule padel tournament rounds from the command line

USAGE:
  ps_cli [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
  new <settings.json>      Start a tournament from a settings file
  next                     Generate the next round (or the group stage)
  score <T1-T2>...         Score every match of the current round
  match <INDEX> <T1-T2>    Score one group or knockout match
  knockout                 Close the group stage and draw the bracket
  advance                  Pair the winners of the latest knockout round
  show                     Print the current round and standings

OPTIONS:
  --state      PATH        Tournament state file  [default: env PS_STATE_FILE or tournament.json]
  --seed       N           Random seed for this command  [default: env PS_SEED or random]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  PS_STATE_FILE            Tournament state file
  PS_SEED                  Random seed
  RUST_LOG                 Log level (e.g., info, debug)
";

#[derive(Debug, PartialEq)]
enum Command {
    New(PathBuf),
    Next,
    Score(Vec<ScoreEntry>),
    Match(usize, ScoreEntry),
    Knockout,
    Advance,
    Show,
}

struct Args {
    state_file: PathBuf,
    seed: u64,
    command: Command,
}

fn parse_entry(s: &str) -> Result<ScoreEntry, Error> {
    s.parse::<ScoreEntry>().map_err(Error::msg)
}

fn parse_args(mut pargs: Arguments) -> Result<Args, Error> {
    // Options may come before or after the command.
    let state_file: PathBuf = pargs
        .opt_value_from_str("--state")?
        .or_else(|| std::env::var("PS_STATE_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("tournament.json"));
    let seed: u64 = pargs
        .opt_value_from_str("--seed")?
        .or_else(|| {
            std::env::var("PS_SEED")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .unwrap_or_else(rand::random);

    let free: Vec<String> = pargs
        .finish()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let Some((subcommand, rest)) = free.split_first() else {
        bail!("missing command\n\n{HELP}");
    };

    let command = match (subcommand.as_str(), rest) {
        ("new", [path]) => Command::New(PathBuf::from(path)),
        ("next", []) => Command::Next,
        ("score", entries) if !entries.is_empty() => Command::Score(
            entries
                .iter()
                .map(|e| parse_entry(e))
                .collect::<Result<_, _>>()?,
        ),
        ("match", [index, entry]) => Command::Match(
            index
                .parse()
                .with_context(|| format!("invalid match index {index:?}"))?,
            parse_entry(entry)?,
        ),
        ("knockout", []) => Command::Knockout,
        ("advance", []) => Command::Advance,
        ("show", []) => Command::Show,
        (other, _) => bail!("unknown command or arguments: {other}\n\n{HELP}"),
    };

    Ok(Args {
        state_file,
        seed,
        command,
    })
}

fn require_snapshot(args: &Args) -> Result<Snapshot, Error> {
    store::load(&args.state_file)?.with_context(|| {
        format!(
            "no tournament in progress at {}, start one with `ps_cli new <settings.json>`",
            args.state_file.display()
        )
    })
}

fn run(args: &Args) -> Result<(), Error> {
    if let Command::New(path) = &args.command {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings: TournamentSettings = serde_json::from_str(&raw)
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        let state = TournamentState::new(&settings)?;
        let snapshot = Snapshot::new(settings, state);
        store::save(&args.state_file, &snapshot)?;
        display::summary(&snapshot);
        return Ok(());
    }

    let snapshot = require_snapshot(args)?;
    let settings = &snapshot.settings;
    let state = &snapshot.state;
    let mut rng = session_rng(Some(args.seed));

    let next_state = match &args.command {
        Command::New(_) | Command::Show => {
            display::summary(&snapshot);
            return Ok(());
        }
        Command::Next => {
            let outcome = generate_next_round(settings, state, &mut rng)?;
            display::round(&outcome.state);
            outcome.state
        }
        Command::Score(entries) => {
            let next = submit_scores(settings, state, entries)?;
            display::leaderboard(&next);
            next
        }
        Command::Match(index, entry) => {
            let next = if state.is_group_stage {
                submit_group_match(settings, state, *index, *entry)?
            } else {
                submit_knockout_match(settings, state, *index, *entry)?
            };
            display::groups_and_bracket(&next);
            next
        }
        Command::Knockout => {
            let next = start_knockout(settings, state, &mut rng)?;
            display::groups_and_bracket(&next);
            next
        }
        Command::Advance => {
            let next = advance_knockout(settings, state)?;
            display::groups_and_bracket(&next);
            next
        }
    };

    if is_finished(settings, &next_state) {
        info!("Tournament finished");
    }
    store::save(
        &args.state_file,
        &Snapshot::new(snapshot.settings.clone(), next_state),
    )
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    env_logger::builder().format_target(false).init();

    let args = parse_args(pargs)?;
    info!(
        "Using state file {} with seed {}",
        args.state_file.display(),
        args.seed
    );
    run(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn parse(args: &[&str]) -> Result<Args, Error> {
        parse_args(Arguments::from_vec(
            args.iter().map(|a| OsString::from(*a)).collect(),
        ))
    }

    fn parse_with_state(extra: &[&str]) -> Result<Args, Error> {
        let mut args = vec!["--state", "t.json", "--seed", "1"];
        args.extend_from_slice(extra);
        parse(&args)
    }

    #[test]
    fn test_options_before_command() {
        let args = parse(&["--state", "t.json", "--seed", "7", "next"]).unwrap();
        assert_eq!(args.state_file, PathBuf::from("t.json"));
        assert_eq!(args.seed, 7);
        assert_eq!(args.command, Command::Next);
    }

    #[test]
    fn test_options_after_command() {
        let args = parse(&["show", "--seed", "3", "--state", "cup.json"]).unwrap();
        assert_eq!(args.state_file, PathBuf::from("cup.json"));
        assert_eq!(args.seed, 3);
        assert_eq!(args.command, Command::Show);
    }

    #[test]
    fn test_score_and_match_arguments() {
        let args = parse_with_state(&["score", "15-9", "13:11"]).unwrap();
        assert_eq!(
            args.command,
            Command::Score(vec![ScoreEntry::new(15, 9), ScoreEntry::new(13, 11)])
        );

        let args = parse_with_state(&["match", "0", "11-6"]).unwrap();
        assert_eq!(args.command, Command::Match(0, ScoreEntry::new(11, 6)));

        let args = parse_with_state(&["new", "cup.json"]).unwrap();
        assert_eq!(args.command, Command::New(PathBuf::from("cup.json")));
    }

    #[test]
    fn test_bad_commands_are_errors() {
        let err = parse_with_state(&[]).err().unwrap();
        assert!(err.to_string().starts_with("missing command"));

        let err = parse_with_state(&["serve"]).err().unwrap();
        assert!(err.to_string().starts_with("unknown command or arguments: serve"));

        assert!(parse_with_state(&["next", "extra"]).is_err());
        assert!(parse_with_state(&["score"]).is_err());
        assert!(parse_with_state(&["score", "15"]).is_err());
        assert!(parse_with_state(&["match", "x", "11-6"]).is_err());
        assert!(parse(&["--seed", "abc", "next"]).is_err());
    }
}
