//! Local persistent key-value store.
//!
//! [`FileStore`] persists a `StorageFile` JSON document at
//! `<home>/.binder/storage.json`. Every operation re-reads the file and
//! writes back with the atomic `.tmp` + rename pattern, so independent
//! handles onto the same file never clobber each other's keys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, StoreError};
use crate::paths;

/// String keys to string values, like a browser's `localStorage`.
pub trait LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// On-disk storage payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageFile {
    pub updated_at: DateTime<Utc>,
    pub entries: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StorageCompat {
    Structured(StorageStructuredCompat),
    Legacy(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize)]
struct StorageStructuredCompat {
    pub updated_at: Option<DateTime<Utc>>,
    pub entries: BTreeMap<String, String>,
}

/// JSON-file backed [`LocalStore`].
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store rooted at `home` (`<home>/.binder/storage.json`).
    pub fn open_at(home: &Path) -> Self {
        Self {
            path: paths::storage_path(home),
        }
    }

    /// Store rooted at the user's home directory.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self::open_at(&paths::home()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole document. Missing file → empty store; a flat legacy
    /// map is accepted and upgraded on the next save.
    pub fn load(&self) -> Result<StorageFile, StoreError> {
        if !self.path.exists() {
            return Ok(StorageFile {
                updated_at: Utc::now(),
                entries: BTreeMap::new(),
            });
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| io_err(&self.path, e))?;
        let parsed = serde_json::from_str::<StorageCompat>(&contents).map_err(|e| {
            StoreError::Unavailable(format!("{} is not a storage file: {e}", self.path.display()))
        })?;
        Ok(match parsed {
            StorageCompat::Structured(file) => StorageFile {
                updated_at: file.updated_at.unwrap_or_else(Utc::now),
                entries: file.entries,
            },
            StorageCompat::Legacy(entries) => StorageFile {
                updated_at: Utc::now(),
                entries,
            },
        })
    }

    fn save(&self, file: &StorageFile) -> Result<(), StoreError> {
        let Some(dir) = self.path.parent() else {
            return Err(io_err(
                &self.path,
                std::io::Error::other("invalid storage path"),
            ));
        };
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let json = serde_json::to_string_pretty(file)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<(), StoreError> {
        let mut file = self.load()?;
        if apply(&mut file.entries) {
            file.updated_at = Utc::now();
            self.save(&file)?;
        }
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process [`LocalStore`]. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with [`StoreError::Unavailable`],
    /// like `localStorage` in a locked-down browser profile.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_entries<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            for (k, v) in pairs {
                entries.insert(k.to_string(), v.to_string());
            }
        }
        store
    }

    /// Snapshot of every key, for assertions.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> Result<T, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("storage disabled".to_string()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("storage lock poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.with(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open_at(tmp.path());
        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn set_get_remove_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open_at(tmp.path());
        store.set("pantry_id", "abc").unwrap();
        assert_eq!(store.get("pantry_id").unwrap().as_deref(), Some("abc"));
        store.remove("pantry_id").unwrap();
        assert_eq!(store.get("pantry_id").unwrap(), None);
        store.remove("pantry_id").unwrap();
    }

    #[test]
    fn handles_share_the_file() {
        let tmp = TempDir::new().unwrap();
        let a = FileStore::open_at(tmp.path());
        let b = FileStore::open_at(tmp.path());
        a.set("one", "1").unwrap();
        b.set("two", "2").unwrap();
        assert_eq!(a.get("two").unwrap().as_deref(), Some("2"));
        assert_eq!(b.get("one").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open_at(tmp.path());
        store.set("k", "v").unwrap();
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn load_legacy_flat_map() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open_at(tmp.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"jsonstorage_api_key":"k-1"}"#).unwrap();

        assert_eq!(store.get("jsonstorage_api_key").unwrap().as_deref(), Some("k-1"));
        store.set("other", "x").unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"entries\""));
        assert!(raw.contains("\"updated_at\""));
    }

    #[test]
    fn corrupt_file_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open_at(tmp.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "[1, 2").unwrap();
        assert!(matches!(store.get("k"), Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn memory_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("a", "1").unwrap();
        assert_eq!(other.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(other.keys(), ["a"]);
    }

    #[test]
    fn unavailable_memory_store_fails_every_call() {
        let store = MemoryStore::unavailable();
        assert!(matches!(store.get("a"), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.set("a", "1"), Err(StoreError::Unavailable(_))));
    }
}
