//! Bounded, most-recent-first palette history and its JSON file store.
//!
//! The store never fails a load: a missing, unreadable or malformed file is an
//! empty history, and individually malformed entries are skipped.

use crate::error::SwatchError;
use crate::palette::Palette;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Maximum number of palettes kept.
pub const HISTORY_LIMIT: usize = 9;

/// File name of the history record inside the data directory.
pub const HISTORY_FILE_NAME: &str = "palette_history.json";

/// Saved palettes, newest first, at most [`HISTORY_LIMIT`] long.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaletteHistory {
    entries: Vec<Palette>,
}

impl PaletteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps `palette` with `now`, prepends it, and drops entries past the limit.
    pub fn save(&mut self, palette: Palette, now: DateTime<Utc>) {
        self.entries.insert(0, palette.with_timestamp(now));
        if self.entries.len() > HISTORY_LIMIT {
            let evicted = self.entries.split_off(HISTORY_LIMIT);
            debug!(evicted = evicted.len(), "history full, dropped oldest");
        }
    }

    /// [`save`](Self::save) with the system clock.
    pub fn save_now(&mut self, palette: Palette) {
        self.save(palette, Utc::now());
    }

    /// Removes the entry at `index`. Out-of-range indices are a no-op.
    pub fn delete(&mut self, index: usize) -> Option<Palette> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&Palette> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Parses a serialized history, tolerating malformed input.
    ///
    /// Anything that is not a JSON array yields an empty history. Array
    /// entries that are not valid palettes are skipped, and entries beyond
    /// [`HISTORY_LIMIT`] are dropped.
    pub fn from_json(json: &str) -> Self {
        let values: Vec<serde_json::Value> = match serde_json::from_str(json) {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "palette history is malformed, starting empty");
                return Self::default();
            }
        };

        let entries: Vec<Palette> = values
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| match serde_json::from_value(v) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(index = i, error = %e, "skipping malformed history entry");
                    None
                }
            })
            .take(HISTORY_LIMIT)
            .collect();

        Self { entries }
    }

    pub fn to_json(&self) -> Result<String, SwatchError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

impl<'a> IntoIterator for &'a PaletteHistory {
    type Item = &'a Palette;
    type IntoIter = std::slice::Iter<'a, Palette>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// History persisted as one JSON file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/palette_history.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(HISTORY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the history, treating a missing or unreadable file as empty.
    pub fn load(&self) -> PaletteHistory {
        match fs::read_to_string(&self.path) {
            Ok(json) => PaletteHistory::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no palette history yet");
                PaletteHistory::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read palette history");
                PaletteHistory::default()
            }
        }
    }

    /// Writes the history, creating parent directories as needed.
    pub fn save(&self, history: &PaletteHistory) -> Result<(), SwatchError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, history.to_json()?)?;
        debug!(path = %self.path.display(), entries = history.len(), "saved palette history");
        Ok(())
    }
}
