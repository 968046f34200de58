use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, warn};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Small string key-value cache the calculator persists through.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

fn lock(map: &Mutex<HashMap<String, String>>) -> MutexGuard<'_, HashMap<String, String>> {
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A flat JSON object on disk, rewritten in full on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens `path`. A missing file starts empty; an unreadable or malformed
    /// one starts empty too and is overwritten by the next write.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries: HashMap<String, String> = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(error = %e, path = %path.display(), "store file is not a JSON object; starting empty");
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "store file unreadable; starting empty");
                HashMap::new()
            }
        };
        debug!(path = %path.display(), keys = entries.len(), "json store opened");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    /// Blocking write. The calculator lock is held by the caller, so writes
    /// reach the file one at a time and in order.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        let body = serde_json::to_string_pretty(&*entries)?;
        std::fs::write(&self.path, body).map_err(|source| {
            error!(error = %source, path = %self.path.display(), "store write failed");
            StorageError::Write {
                path: self.path.display().to_string(),
                source,
            }
        })
    }
}
