//! # Padel Scheduler
//!
//! Round generation for social padel and racquet tournaments.
//!
//! The crate turns a roster and a handful of settings into matches, one round
//! at a time, while keeping everybody's playing time and partner mix fair.
//! All state is a plain serializable value, so a tournament can be saved after
//! every step and resumed later.
//!
//! ## Formats
//!
//! - **Mexicano**: players are regrouped every round by their points so far
//! - **Americano**: partners and opponents rotate to avoid repeats
//! - **Team Americano**: fixed teams rotate opponents
//! - **Groups + Knockout**: round robin inside groups, then a bracket
//!
//! ## Core Modules
//!
//! - [`pairing`]: Engines, sit-out allocation, and partnership ledgers
//! - [`scoring`]: Score validation, submission, and the leaderboard
//! - [`tournament`]: Round controller over [`TournamentState`]
//! - [`persistence`]: Versioned JSON snapshots
//!
//! ## Example
//!
//! ```
//! use padel_scheduler::{
//!     Format, Mode, TournamentSettings, TournamentState, generate_next_round, session_rng, units,
//! };
//!
//! let settings = TournamentSettings::new(
//!     units(&["Ana", "Ben", "Cleo", "Dev", "Eli"]),
//!     1,
//!     Mode::Individual,
//!     Format::Americano,
//! );
//! let state = TournamentState::new(&settings).unwrap();
//! let outcome = generate_next_round(&settings, &state, &mut session_rng(Some(1))).unwrap();
//! assert_eq!(outcome.matches.len(), 1);
//! assert_eq!(outcome.state.sitting_out_players.len(), 1);
//! ```

pub mod entities;
pub mod errors;
pub mod pairing;
pub mod persistence;
pub mod randomizer;
pub mod scoring;
pub mod settings;
pub mod tournament;

pub use entities::{
    GroupStanding, KnockoutStage, Match, RoundScore, ScoreRecord, Scores, Side, SitOutCounts,
    StandingRow, UnitId, units,
};
pub use errors::{
    ConfigError, PairingError, PersistenceError, SchedulerError, SchedulerResult, ScoreError,
};
pub use pairing::{Engine, PairLedger, PairRound, RoundInput, RoundPlan};
pub use persistence::{
    SNAPSHOT_VERSION, Snapshot, load_or_fresh, load_tournament_state, save_tournament_state,
};
pub use randomizer::session_rng;
pub use scoring::{ScoreEntry, leaderboard};
pub use settings::{Format, Mode, PairingPattern, PointSystem, SeedStrategy, TournamentSettings};
pub use tournament::{
    RoundOutcome, TournamentState, advance_knockout, generate_next_round, is_finished,
    start_knockout, submit_group_match, submit_knockout_match, submit_scores,
};
