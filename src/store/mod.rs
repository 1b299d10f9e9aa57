//! Flat-file JSON persistence
//!
//! Every collection is one pretty-printed UTF-8 JSON file holding a top-level
//! array, rewritten whole on each append (read-modify-write, single writer,
//! no locking). Loading never fails: a missing file is an empty collection,
//! and a corrupt file is reported as such so callers can warn the user before
//! the next write resets it.

pub mod chatlog;
pub mod code;

pub use chatlog::{ChatLog, Message, Role, Session};
pub use code::{BugRecord, BugStore, CodeStore, SavedCode, bugs_from_analysis};

use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Result of loading a collection
#[derive(Debug)]
pub enum LoadOutcome<T> {
    Loaded(Vec<T>),
    Missing,
    /// The file exists but is not valid JSON for this collection
    Corrupt,
}

impl<T> LoadOutcome<T> {
    /// The usable records; Missing and Corrupt both resolve to empty
    pub fn records(self) -> Vec<T> {
        match self {
            LoadOutcome::Loaded(records) => records,
            LoadOutcome::Missing | LoadOutcome::Corrupt => Vec::new(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadOutcome::Corrupt)
    }
}

/// Load a JSON array collection from disk
pub fn load_collection<T: DeserializeOwned>(path: &Path) -> LoadOutcome<T> {
    if !path.exists() {
        return LoadOutcome::Missing;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            return LoadOutcome::Corrupt;
        }
    };

    match serde_json::from_str::<Vec<T>>(&content) {
        Ok(records) => LoadOutcome::Loaded(records),
        Err(e) => {
            log::warn!("Malformed collection {}: {}", path.display(), e);
            LoadOutcome::Corrupt
        }
    }
}

/// Write the whole collection back to disk, creating parent directories
pub fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create data directory")?;
    }

    let json = serde_json::to_string_pretty(records).context("Failed to serialize collection")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    log::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_missing() {
        let temp = TempDir::new().unwrap();
        let outcome: LoadOutcome<String> = load_collection(&temp.path().join("absent.json"));
        assert!(matches!(outcome, LoadOutcome::Missing));
        assert!(outcome.records().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_tagged_not_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let outcome: LoadOutcome<String> = load_collection(&path);
        assert!(outcome.is_corrupt());
        assert!(outcome.records().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("object.json");
        std::fs::write(&path, r#"{"a": 1}"#).unwrap();

        let outcome: LoadOutcome<String> = load_collection(&path);
        assert!(outcome.is_corrupt());
    }

    #[test]
    fn test_write_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("list.json");

        write_collection(&path, &["a".to_string(), "b".to_string()]).unwrap();
        let outcome: LoadOutcome<String> = load_collection(&path);
        assert_eq!(outcome.records(), vec!["a", "b"]);
    }
}
