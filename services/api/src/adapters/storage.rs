//! services/api/src/adapters/storage.rs
//!
//! This module contains the file-backed storage adapter, the concrete
//! implementation of the `StorageMedium` port from the `core` crate. Each
//! key maps to one JSON file inside the configured data directory, mirroring
//! the string-keyed get/set/remove contract of a browser local-storage area.

use legitmind_core::ports::{MediumError, StorageMedium};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A `StorageMedium` that keeps one file per key under a root directory.
#[derive(Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    /// Creates the adapter, creating the root directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Maps a key to its backing file. Any character outside the expected
    /// key alphabet is flattened so a key cannot address a path outside the
    /// root directory.
    fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl StorageMedium for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MediumError(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        std::fs::write(self.key_path(key), value).map_err(|e| MediumError(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), MediumError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediumError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();

        storage.set("documents", r#"[{"id":"d1"}]"#).unwrap();
        assert_eq!(
            storage.get("documents").unwrap().as_deref(),
            Some(r#"[{"id":"d1"}]"#)
        );
    }

    #[test]
    fn missing_key_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();
        assert!(storage.get("never-written").unwrap().is_none());
    }

    #[test]
    fn removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();

        storage.set("doc-content-d1", "Hello World").unwrap();
        storage.remove("doc-content-d1").unwrap();
        storage.remove("doc-content-d1").unwrap();
        assert!(storage.get("doc-content-d1").unwrap().is_none());
    }

    #[test]
    fn hostile_keys_stay_inside_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();

        storage.set("../escape", "nope").unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
