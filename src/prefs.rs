//! Preference-style persistence: one JSON document per string key.
//!
//! Mirrors the flat key-to-document layout the store has always used.
//! Reads are forgiving (a missing or malformed document is treated as
//! absent, never as an error); writes replace the whole document
//! atomically via a temporary file.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, warn};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::{PinError, Result};

/// A flat mapping from string keys to JSON documents on disk.
#[derive(Debug, Clone)]
pub struct PrefStore {
    root: PathBuf,
}

impl PrefStore {
    /// Opens a preference store rooted at the given directory, creating
    /// the directory if needed.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.exists() {
            debug!("Data directory does not exist, creating: {}", root.display());
            fs::create_dir_all(root).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                PinError::DirectoryError {
                    path: root.to_path_buf(),
                }
            })?;
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Reads the document stored under `key`.
    ///
    /// Returns `None` when the document is missing or cannot be decoded;
    /// both cases are logged and otherwise treated as "no data".
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.document_path(key);
        if !path.exists() {
            debug!("No document for key: {}", key);
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read document {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Malformed document for key {}, treating as empty: {}", key, e);
                None
            }
        }
    }

    /// Writes the whole document for `key`, replacing any previous
    /// content atomically.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.document_path(key);

        let json = serde_json::to_string_pretty(value).map_err(|e| {
            error!("Failed to serialize document for key {}: {}", key, e);
            PinError::Serialization(e)
        })?;

        // Write to a temporary file in the same directory, then move it
        // into place so readers never observe a half-written document.
        let mut temp_file = NamedTempFile::new_in(&self.root).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            PinError::Io(e)
        })?;

        temp_file.write_all(json.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            PinError::Io(e)
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            PinError::Io(e)
        })?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist document {}: {}", path.display(), e.error);
            PinError::Io(e.error)
        })?;

        debug!("Wrote document for key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_missing_key_returns_none() {
        let dir = tempdir().unwrap();
        let prefs = PrefStore::open(dir.path()).unwrap();

        let value: Option<Vec<String>> = prefs.read("nothingHere");
        assert!(value.is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let prefs = PrefStore::open(dir.path()).unwrap();

        let entries = vec!["a".to_string(), "b".to_string()];
        prefs.write("entries", &entries).unwrap();

        let loaded: Vec<String> = prefs.read("entries").unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn malformed_document_reads_as_none() {
        let dir = tempdir().unwrap();
        let prefs = PrefStore::open(dir.path()).unwrap();

        fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let value: Option<Vec<String>> = prefs.read("broken");
        assert!(value.is_none());
    }

    #[test]
    fn open_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data").join("pinit");

        let prefs = PrefStore::open(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(prefs.root(), nested.as_path());
    }
}
