//! Tournament settings produced by the setup screen.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entities::UnitId;
use crate::errors::ConfigError;

/// Whether units are single players or fixed teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Individual,
    Team,
}

impl Mode {
    /// Units consumed by one match.
    pub fn units_per_match(self) -> usize {
        match self {
            Mode::Individual => 4,
            Mode::Team => 2,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Individual => write!(f, "individual"),
            Mode::Team => write!(f, "team"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Mexicano,
    Americano,
    Groups,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Mexicano => write!(f, "mexicano"),
            Format::Americano => write!(f, "americano"),
            Format::Groups => write!(f, "groups"),
        }
    }
}

/// How a match score is judged complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointSystem {
    /// Both sides' points add up to the match total (e.g. 24 played: 15-9).
    PointsToPlay,
    /// First side to reach the target wins.
    PointsToWin,
}

/// How the Americano engine picks the first unit of each match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeedStrategy {
    /// Unit with the fewest partnerships so far, pool order on ties.
    #[default]
    LeastPartnered,
    /// Uniform draw from the pool.
    Random,
}

/// Positions within a rank group of four mapped to
/// `team1[0], team1[1], team2[0], team2[1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingPattern(pub [usize; 4]);

impl PairingPattern {
    /// 1st & 3rd vs 2nd & 4th.
    pub const SPLIT: Self = Self([0, 2, 1, 3]);
    /// 1st & 4th vs 2nd & 3rd.
    pub const BALANCED: Self = Self([0, 3, 1, 2]);
    /// 1st & 2nd vs 3rd & 4th.
    pub const STACKED: Self = Self([0, 1, 2, 3]);

    /// Mexicano cycle for non-final rounds.
    pub const ROTATION: [Self; 3] = [Self::SPLIT, Self::BALANCED, Self::STACKED];

    pub fn for_round(round: u32) -> Self {
        Self::ROTATION[(round.saturating_sub(1) % 3) as usize]
    }

    pub fn is_valid(&self) -> bool {
        let mut seen = [false; 4];
        for &slot in &self.0 {
            if slot > 3 || seen[slot] {
                return false;
            }
            seen[slot] = true;
        }
        true
    }

    /// Splits a rank group of four into two teams.
    pub fn apply<T: Clone>(&self, group: &[T]) -> (Vec<T>, Vec<T>) {
        let [a, b, c, d] = self.0;
        (
            vec![group[a].clone(), group[b].clone()],
            vec![group[c].clone(), group[d].clone()],
        )
    }
}

impl Default for PairingPattern {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Everything the scheduler needs from tournament setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TournamentSettings {
    /// Player names, or team names in team mode
    pub roster: Vec<UnitId>,

    /// Court names; the count caps matches per round
    pub courts: Vec<String>,

    pub mode: Mode,

    pub format: Format,

    pub point_system: PointSystem,

    /// Total points (to play) or target points (to win)
    pub points_per_match: u32,

    /// Last round number; `None` plays on indefinitely
    pub max_rounds: Option<u32>,

    /// Team split used for the last round
    pub final_pairing_pattern: PairingPattern,

    /// Groups format only
    pub teams_per_group: usize,

    /// Groups format only: top N per group enter the knockout
    pub teams_advancing: usize,

    /// Americano seed selection
    pub seed_strategy: SeedStrategy,

    /// Americano partner lookahead over the remaining pool
    pub partner_lookahead: bool,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            roster: Vec::new(),
            courts: vec!["Court 1".to_string(), "Court 2".to_string()],
            mode: Mode::Individual,
            format: Format::Americano,
            point_system: PointSystem::PointsToPlay,
            points_per_match: 24,
            max_rounds: None,
            final_pairing_pattern: PairingPattern::BALANCED,
            teams_per_group: 4,
            teams_advancing: 2,
            seed_strategy: SeedStrategy::LeastPartnered,
            partner_lookahead: false,
        }
    }
}

impl TournamentSettings {
    pub fn new(roster: Vec<UnitId>, courts: usize, mode: Mode, format: Format) -> Self {
        Self {
            roster,
            courts: (1..=courts).map(|c| format!("Court {c}")).collect(),
            mode,
            format,
            ..Self::default()
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    pub fn units_per_match(&self) -> usize {
        self.mode.units_per_match()
    }

    pub fn is_final_round(&self, round: u32) -> bool {
        self.max_rounds == Some(round)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for unit in &self.roster {
            if unit.as_str().is_empty() {
                return Err(ConfigError::BlankName);
            }
            if !seen.insert(unit) {
                return Err(ConfigError::DuplicateUnit(unit.clone()));
            }
        }

        if self.courts.is_empty() {
            return Err(ConfigError::NoCourts);
        }

        if !self.final_pairing_pattern.is_valid() {
            return Err(ConfigError::InvalidPattern(self.final_pairing_pattern.0));
        }

        if self.points_per_match == 0 {
            return Err(ConfigError::ZeroPointsPerMatch);
        }

        if self.max_rounds == Some(0) {
            return Err(ConfigError::ZeroMaxRounds);
        }

        let count = self.roster.len();
        match (self.format, self.mode) {
            (Format::Groups, _) => {
                if count < 2 {
                    return Err(ConfigError::NotEnoughUnits {
                        needed: 2,
                        current: count,
                    });
                }
                if self.teams_per_group < 2 {
                    return Err(ConfigError::GroupTooSmall(self.teams_per_group));
                }
                if self.teams_advancing == 0 || self.teams_advancing > self.teams_per_group {
                    return Err(ConfigError::InvalidAdvancing {
                        teams_advancing: self.teams_advancing,
                        teams_per_group: self.teams_per_group,
                    });
                }
            }
            (_, Mode::Individual) => {
                if count < 4 {
                    return Err(ConfigError::NotEnoughUnits {
                        needed: 4,
                        current: count,
                    });
                }
            }
            (_, Mode::Team) => {
                if count < 2 {
                    return Err(ConfigError::NotEnoughUnits {
                        needed: 2,
                        current: count,
                    });
                }
                if count % 2 != 0 {
                    return Err(ConfigError::OddTeamCount(count));
                }
            }
        }

        Ok(())
    }
}
