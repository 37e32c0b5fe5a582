use crate::errors::StorageError;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::error;

/// Narrow key-value interface behind both storage scopes.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-lifetime store; everything in it is gone on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if change(&mut entries) {
            persist_entries(&self.path, &entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse store file {}: {err}", path.display());
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read store file {}: {err}", path.display());
            BTreeMap::new()
        }
    }
}

fn persist_entries(path: &Path, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(entries)?;
    fs::write(path, payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "recycling_portal_{name}_{}_{nanos}.json",
            std::process::id()
        ))
    }

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::default();
        assert_eq!(store.get("userId"), None);
        store.set("userId", "7").unwrap();
        assert_eq!(store.get("userId").as_deref(), Some("7"));
        store.remove("userId").unwrap();
        assert_eq!(store.get("userId"), None);
        store.remove("userId").unwrap();
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = unique_path("reopen");
        {
            let store = FileStore::open(&path);
            store.set("userEmail", "a@example.com").unwrap();
            store.set("isAdmin", "false").unwrap();
            store.remove("isAdmin").unwrap();
        }

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("userEmail").as_deref(), Some("a@example.com"));
        assert_eq!(reopened.get("isAdmin"), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_store_starts_empty_on_garbage() {
        let path = unique_path("garbage");
        fs::write(&path, b"not json").unwrap();
        let store = FileStore::open(&path);
        assert_eq!(store.get("userEmail"), None);
        store.set("userEmail", "b@example.com").unwrap();
        assert_eq!(FileStore::open(&path).get("userEmail").as_deref(), Some("b@example.com"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_store_reports_write_failures() {
        let dir = unique_path("missing_dir");
        let store = FileStore::open(dir.join("nested").join("store.json"));
        assert!(store.set("userId", "1").is_err());
    }
}
