use serde::{Deserialize, Serialize};
use std::{
    borrow::Borrow,
    collections::BTreeMap,
    fmt::{self},
};

/// A schedulable participant: a single player in individual mode, or a
/// fixed pair sharing one name in team mode.
///
/// The name is the identity. Two units with the same name are the same unit.
/// Names are trimmed however they arrive, including from JSON.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(from = "String", into = "String")]
pub struct UnitId(String);

impl UnitId {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UnitId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UnitId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<UnitId> for String {
    fn from(value: UnitId) -> Self {
        value.0
    }
}

impl Borrow<str> for UnitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Builds unit ids from plain names, keeping order.
pub fn units<S: AsRef<str>>(names: &[S]) -> Vec<UnitId> {
    names.iter().map(|n| UnitId::new(n.as_ref())).collect()
}

/// Knockout bracket rounds.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KnockoutStage {
    Quarter,
    Semi,
    Final,
}

impl KnockoutStage {
    /// Label for a bracket round entered by `field` units.
    pub fn for_field(field: usize) -> Self {
        match field {
            2 => Self::Final,
            n if n >= 8 => Self::Quarter,
            _ => Self::Semi,
        }
    }
}

impl fmt::Display for KnockoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnockoutStage::Quarter => write!(f, "quarter"),
            KnockoutStage::Semi => write!(f, "semi"),
            KnockoutStage::Final => write!(f, "final"),
        }
    }
}

/// One side of a match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Team1,
    Team2,
}

/// A single contest between two teams on one court.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub team1: Vec<UnitId>,
    pub team2: Vec<UnitId>,
    pub team1_score: u32,
    pub team2_score: u32,
    pub is_score_submitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knockout_round: Option<KnockoutStage>,
    #[serde(default)]
    pub is_knockout: bool,
}

impl Match {
    pub fn new(team1: Vec<UnitId>, team2: Vec<UnitId>) -> Self {
        Self {
            team1,
            team2,
            team1_score: 0,
            team2_score: 0,
            is_score_submitted: false,
            court: None,
            group: None,
            round: None,
            match_number: None,
            knockout_round: None,
            is_knockout: false,
        }
    }

    pub fn with_round(mut self, round: u32) -> Self {
        self.round = Some(round);
        self
    }

    pub fn with_number(mut self, match_number: u32) -> Self {
        self.match_number = Some(match_number);
        self
    }

    pub fn with_court(mut self, court: Option<&String>) -> Self {
        self.court = court.cloned();
        self
    }

    /// All units taking part, team1 first.
    pub fn participants(&self) -> impl Iterator<Item = &UnitId> {
        self.team1.iter().chain(self.team2.iter())
    }

    pub fn involves(&self, unit: &UnitId) -> bool {
        self.participants().any(|u| u == unit)
    }

    /// Winning side of a submitted, decided match.
    pub fn winner(&self) -> Option<Side> {
        if !self.is_score_submitted || self.team1_score == self.team2_score {
            return None;
        }
        if self.team1_score > self.team2_score {
            Some(Side::Team1)
        } else {
            Some(Side::Team2)
        }
    }

    pub fn team(&self, side: Side) -> &[UnitId] {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |team: &[UnitId]| {
            team.iter()
                .map(UnitId::as_str)
                .collect::<Vec<_>>()
                .join(" & ")
        };
        if let Some(court) = &self.court {
            write!(f, "[{court}] ")?;
        }
        write!(f, "{} vs {}", join(&self.team1), join(&self.team2))?;
        if self.is_score_submitted {
            write!(f, " ({}-{})", self.team1_score, self.team2_score)?;
        }
        Ok(())
    }
}

/// A unit's result for one round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundScore {
    Points(u32),
    Sitout,
}

/// Running totals for one unit.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub points: u32,
    pub wins: u32,
    pub matches_played: u32,
    /// Index `r - 1` holds round `r`.
    pub points_per_round: Vec<RoundScore>,
}

impl ScoreRecord {
    pub fn set_round(&mut self, round: u32, score: RoundScore) {
        let idx = round.saturating_sub(1) as usize;
        if self.points_per_round.len() <= idx {
            self.points_per_round.resize(idx + 1, RoundScore::Sitout);
        }
        self.points_per_round[idx] = score;
    }

    pub fn rounds_sat_out(&self) -> usize {
        self.points_per_round
            .iter()
            .filter(|s| matches!(s, RoundScore::Sitout))
            .count()
    }
}

pub type Scores = BTreeMap<UnitId, ScoreRecord>;

/// Rounds sat out per unit.
pub type SitOutCounts = BTreeMap<UnitId, u32>;

/// One team's line in a group table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub unit: UnitId,
    pub points: u32,
    pub matches_played: u32,
    pub wins: u32,
}

/// Ranked table for one group.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStanding {
    pub group: usize,
    pub rows: Vec<StandingRow>,
}
