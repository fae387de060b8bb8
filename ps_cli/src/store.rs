use std::{fs, io::ErrorKind, path::Path};

use anyhow::{Context, Error};
use log::debug;
use padel_scheduler::{Snapshot, load_or_fresh, save_tournament_state};

/// Read the saved tournament. A missing or unreadable file yields `None`.
pub fn load(path: &Path) -> Result<Option<Snapshot>, Error> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No state file at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    Ok(load_or_fresh(Some(raw.as_str())))
}

pub fn save(path: &Path, snapshot: &Snapshot) -> Result<(), Error> {
    let json = save_tournament_state(snapshot)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}
