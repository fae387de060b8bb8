//! JSON snapshots of a tournament in progress.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::PersistenceError;
use crate::settings::TournamentSettings;
use crate::tournament::TournamentState;

/// Bumped whenever the snapshot layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Settings plus state, enough to resume a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub settings: TournamentSettings,
    pub state: TournamentState,
}

impl Snapshot {
    pub fn new(settings: TournamentSettings, state: TournamentState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            settings,
            state,
        }
    }
}

/// Serialize a snapshot as pretty-printed JSON.
pub fn save_tournament_state(snapshot: &Snapshot) -> Result<String, PersistenceError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    debug!(
        "Saved round {} snapshot ({} bytes)",
        snapshot.state.round,
        json.len()
    );
    Ok(json)
}

/// Parse a snapshot, rejecting versions this build cannot read and settings
/// that would fail a fresh start.
pub fn load_tournament_state(json: &str) -> Result<Snapshot, PersistenceError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    snapshot.settings.validate()?;
    Ok(snapshot)
}

/// Restore a saved snapshot if there is a readable one.
///
/// Missing input means a fresh start. Unreadable input is logged and also
/// treated as a fresh start, never as a fatal error.
pub fn load_or_fresh(json: Option<&str>) -> Option<Snapshot> {
    let json = json?;
    match load_tournament_state(json) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!("Discarding saved tournament: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::units;
    use crate::errors::ConfigError;
    use crate::settings::{Format, Mode};

    fn snapshot() -> Snapshot {
        let settings = TournamentSettings::new(
            units(&["A", "B", "C", "D"]),
            1,
            Mode::Individual,
            Format::Americano,
        );
        let state = TournamentState::new(&settings).unwrap();
        Snapshot::new(settings, state)
    }

    #[test]
    fn test_save_then_load() {
        let original = snapshot();
        let json = save_tournament_state(&original).unwrap();
        assert!(json.contains("\"savedAt\""));
        assert!(json.contains("\"sittingOutCounts\""));
        assert_eq!(load_tournament_state(&json).unwrap(), original);
    }

    #[test]
    fn test_rejects_future_version() {
        let mut s = snapshot();
        s.version = SNAPSHOT_VERSION + 1;
        let json = save_tournament_state(&s).unwrap();
        assert!(matches!(
            load_tournament_state(&json),
            Err(PersistenceError::UnsupportedVersion { found: 2, expected: 1 })
        ));
        assert_eq!(load_or_fresh(Some(json.as_str())), None);
    }

    #[test]
    fn test_rejects_tampered_settings() {
        let json = save_tournament_state(&snapshot()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["settings"]["finalPairingPattern"] = serde_json::json!([0, 1, 2, 9]);
        let tampered = value.to_string();

        assert!(matches!(
            load_tournament_state(&tampered),
            Err(PersistenceError::InvalidSettings(ConfigError::InvalidPattern([0, 1, 2, 9])))
        ));
        assert_eq!(load_or_fresh(Some(tampered.as_str())), None);
    }

    #[test]
    fn test_corrupt_input_starts_fresh() {
        assert!(matches!(
            load_tournament_state("{\"version\": 1"),
            Err(PersistenceError::Json(_))
        ));
        assert_eq!(load_or_fresh(Some("not json")), None);
        assert_eq!(load_or_fresh(None), None);
    }
}
