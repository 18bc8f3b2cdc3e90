//! The persistent high-score table.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::constants::high_scores::NAME_LENGTH;
use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: f64,
    pub level: u32,
    /// Unix timestamp, in seconds.
    pub timestamp: i64,
}

/// A bounded list of entries, highest score first.
///
/// Persisted as a flat JSON array of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
    capacity: usize,
}

impl HighScoreTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Loads a table, returning an empty one if the file does not exist yet.
    ///
    /// Entries are re-sorted and cut down to `capacity`.
    pub fn load(path: &Path, capacity: usize) -> Result<Self, StorageError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No high score file yet");
                return Ok(Self::new(capacity));
            }
            Err(error) => return Err(error.into()),
        };

        let mut entries: Vec<HighScoreEntry> = serde_json::from_str(&raw)?;
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries.truncate(capacity);
        debug!(path = %path.display(), entries = entries.len(), "High scores loaded");
        Ok(Self { entries, capacity })
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.entries)?)?;
        debug!(path = %path.display(), entries = self.entries.len(), "High scores saved");
        Ok(())
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Trims, uppercases and cuts a name down to the allowed length.
    pub fn normalize_name(name: &str) -> Result<String, StorageError> {
        let normalized: String = name.trim().chars().take(NAME_LENGTH).collect::<String>().to_uppercase();
        if normalized.is_empty() {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(normalized)
    }

    /// Whether `score` would earn a place in the table.
    pub fn qualifies(&self, score: f64) -> bool {
        if self.capacity == 0 {
            return false;
        }
        self.entries.len() < self.capacity || self.entries.last().is_some_and(|lowest| score > lowest.score)
    }

    /// Inserts a score, returning its zero-based rank, or `None` if it did not qualify.
    ///
    /// A new score ranks below existing entries with the same score.
    pub fn add(&mut self, name: &str, score: f64, level: u32) -> Result<Option<usize>, StorageError> {
        let name = Self::normalize_name(name)?;
        if !self.qualifies(score) {
            return Ok(None);
        }

        let rank = self.entries.partition_point(|entry| entry.score >= score);
        self.entries.insert(
            rank,
            HighScoreEntry {
                name,
                score,
                level,
                timestamp: OffsetDateTime::now_utc().unix_timestamp(),
            },
        );
        self.entries.truncate(self.capacity);

        info!(rank, score, level, "High score added");
        Ok(Some(rank))
    }
}
