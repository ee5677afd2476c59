//! JSON-file persistence for exhibition records.
//!
//! Crawl runs fully overwrite the data file; there is no incremental
//! merge. The file only ever contains records with known coordinates.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::Exhibition;

/// Loads the exhibition array from `path`.
pub fn load(path: &Path) -> Result<Vec<Exhibition>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed data file {}", path.display()))
}

/// Overwrites `path` with the given records as a pretty-printed array,
/// creating parent directories as needed.
pub fn save(path: &Path, exhibitions: &[Exhibition]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(exhibitions).context("failed to encode exhibitions")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Drops records lacking coordinates, logs what was dropped, and persists
/// the rest. Returns how many records were written.
pub fn persist_located(path: &Path, results: Vec<Exhibition>) -> Result<usize> {
    let (located, unlocated): (Vec<_>, Vec<_>) =
        results.into_iter().partition(Exhibition::has_coordinates);

    log::info!(
        "results: {} with GPS, {} without GPS",
        located.len(),
        unlocated.len()
    );
    for record in &unlocated {
        log::warn!("no GPS: {} @ {}", record.title, record.place);
    }

    save(path, &located)?;
    Ok(located.len())
}
