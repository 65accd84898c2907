use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use super::KeyValueStore;
use crate::error::StorageError;

/// File-backed key-value store.
///
/// All entries live in one JSON object file; every mutation rewrites the full
/// snapshot, so no partial-write state is ever observable on disk.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or create) the store at the default location ("./data/wallets.json").
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(PathBuf::from("./data/wallets.json"))
    }

    /// Open (or create) the store at a custom path (for testing).
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallets.json");

        let mut store = FileStore::open(path.clone()).unwrap();
        store.set("wallets", "[]").unwrap();
        store.set("active_address", "rTest").unwrap();
        store.remove("active_address").unwrap();

        let reopened = FileStore::open(path).unwrap();
        assert_eq!(reopened.get("wallets").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("active_address").unwrap(), None);
    }
}
