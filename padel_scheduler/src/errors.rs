//! Error types for the scheduler.

use thiserror::Error;

use crate::entities::UnitId;

/// Settings or roster that can never produce a valid round.
#[derive(Debug, Clone, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("need at least {needed} units for this mode, have {current}")]
    NotEnoughUnits { needed: usize, current: usize },

    #[error("team mode needs an even number of teams, have {0}")]
    OddTeamCount(usize),

    #[error("unit names must be unique: {0} appears more than once")]
    DuplicateUnit(UnitId),

    #[error("unit names must not be blank")]
    BlankName,

    #[error("at least one court is required")]
    NoCourts,

    #[error("pairing pattern {0:?} is not a permutation of 0..4")]
    InvalidPattern([usize; 4]),

    #[error("points per match must be positive")]
    ZeroPointsPerMatch,

    #[error("max rounds must be positive when set")]
    ZeroMaxRounds,

    #[error("teams per group must be at least 2, got {0}")]
    GroupTooSmall(usize),

    #[error("teams advancing must be between 1 and {teams_per_group}, got {teams_advancing}")]
    InvalidAdvancing {
        teams_advancing: usize,
        teams_per_group: usize,
    },

    #[error("knockout field must be a power of two and at least 2, got {0}")]
    UnevenKnockoutField(usize),
}

/// Engine invariant violations while building a round.
#[derive(Debug, Clone, Eq, Error, PartialEq)]
pub enum PairingError {
    #[error("no partner available for {0}")]
    NoPartnerAvailable(UnitId),

    #[error("no opponent available for {0}")]
    NoOpponentAvailable(UnitId),
}

/// Rejected score submissions. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, Eq, Error, PartialEq)]
pub enum ScoreError {
    #[error("match {index}: scores {team1}-{team2} must add up to {expected}")]
    PointsToPlayMismatch {
        index: usize,
        team1: u32,
        team2: u32,
        expected: u32,
    },

    #[error("match {index}: one side must reach {target} points")]
    TargetNotReached { index: usize, target: u32 },

    #[error("match {index}: a winner is required")]
    Drawn { index: usize },

    #[error("match {0} already has a submitted score")]
    AlreadySubmitted(usize),

    #[error("expected {expected} scores, got {got}")]
    CountMismatch { expected: usize, got: usize },

    #[error("round {0} still has matches without a score")]
    RoundIncomplete(u32),

    #[error("tournament is finished")]
    TournamentFinished,

    #[error("no match at index {0}")]
    UnknownMatch(usize),
}

/// Persisted state that cannot be restored.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("saved settings are invalid: {0}")]
    InvalidSettings(#[from] ConfigError),
}

/// Any failure surfaced by the round controller.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("pairing error: {0}")]
    Pairing(#[from] PairingError),

    #[error("score error: {0}")]
    Score(#[from] ScoreError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("not available in this phase: {0}")]
    WrongPhase(&'static str),
}

impl SchedulerError {
    /// Whether the user can fix this by editing input and retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SchedulerError::Score(_) | SchedulerError::Persistence(_)
        )
    }
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
