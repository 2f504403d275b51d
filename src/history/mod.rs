//! Search history storage
//!
//! Stores and retrieves past searches from a file-based store.
//! History is stored in XDG data directory (~/.local/share/closest-city/).

use crate::config::defaults::{APP_DIR_NAME, DEFAULT_MAX_HISTORY_ENTRIES};
use crate::error::{Error, Result};
use crate::selector::SearchOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const HISTORY_FILE_NAME: &str = "history.json";

/// One completed search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Unique ID for this search
    pub id: String,
    pub anchor_city: String,
    pub closest_city: String,
    /// Driving miles from the anchor to the closest city
    pub driving_distance: f64,
    /// Straight-line radius the search was limited to
    pub radius: f64,
    /// Cities that were submitted
    pub searched_cities: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SearchRecord {
    /// Create a record from a finished search and the submitted city list
    pub fn new(outcome: &SearchOutcome, searched_cities: &[String]) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            anchor_city: outcome.anchor_city.clone(),
            closest_city: outcome.closest_city.clone(),
            driving_distance: outcome.driving_distance,
            radius: outcome.radius,
            searched_cities: searched_cities.to_vec(),
            created_at: Utc::now(),
        }
    }
}

/// History storage manager
#[derive(Debug)]
pub struct History {
    entries: Vec<SearchRecord>,
    path: PathBuf,
    max_entries: usize,
}

impl History {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::History("Could not determine data directory".to_string()))
    }

    /// Get the history file path
    pub fn history_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(HISTORY_FILE_NAME))
    }

    /// Load history from disk
    pub fn load() -> Result<Self> {
        Self::load_from(Self::history_path()?)
    }

    /// Load history from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::History(format!("Failed to read history file: {}", e))
            })?;

            serde_json::from_str(&content).map_err(|e| {
                Error::History(format!("Failed to parse history file: {}", e))
            })?
        } else {
            Vec::new()
        };

        Ok(Self {
            entries,
            path,
            max_entries: DEFAULT_MAX_HISTORY_ENTRIES,
        })
    }

    /// Cap the number of stored entries
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self.trim();
        self
    }

    /// Save history to disk
    ///
    /// The file is replaced atomically, so concurrent readers see either the
    /// old or the new list, never a partial write.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::History(format!("Failed to create history directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            Error::History(format!("Failed to serialize history: {}", e))
        })?;

        let tmp_path = self.path.with_file_name(format!(
            ".{}.{}.tmp",
            HISTORY_FILE_NAME,
            uuid::Uuid::new_v4().simple()
        ));

        fs::write(&tmp_path, content).map_err(|e| {
            Error::History(format!("Failed to write history file: {}", e))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::History(format!("Failed to replace history file: {}", e))
        })?;

        Ok(())
    }

    /// Add a new entry to history, most recent first
    pub fn add(&mut self, entry: SearchRecord) {
        self.entries.insert(0, entry);
        self.trim();
    }

    fn trim(&mut self) {
        self.entries.truncate(self.max_entries);
    }

    /// Get all entries, newest first
    pub fn entries(&self) -> &[SearchRecord] {
        &self.entries
    }

    /// Get entry by ID
    pub fn get(&self, id: &str) -> Option<&SearchRecord> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Resolve an entry from its full ID or a unique ID prefix
    ///
    /// Fails if the prefix is empty, matches nothing, or matches more than
    /// one entry.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<&SearchRecord> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(Error::History("Entry ID must not be empty".to_string()));
        }

        if let Some(entry) = self.get(prefix) {
            return Ok(entry);
        }

        let matches: Vec<&SearchRecord> = self
            .entries
            .iter()
            .filter(|e| e.id.starts_with(prefix))
            .collect();

        match matches.as_slice() {
            [entry] => Ok(*entry),
            [] => Err(Error::History(format!("Entry not found: {}", prefix))),
            _ => Err(Error::History(format!(
                "Ambiguous ID prefix '{}' matches {} entries",
                prefix,
                matches.len()
            ))),
        }
    }

    /// Remove entry by ID
    pub fn remove(&mut self, id: &str) -> Option<SearchRecord> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get most recent entries
    pub fn recent(&self, count: usize) -> &[SearchRecord] {
        &self.entries[..count.min(self.entries.len())]
    }
}
