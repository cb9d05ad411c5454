use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::errors::CoreError;

/// Raw string key-value storage, the equivalent of a browser's local storage.
///
/// Implementations only move strings around; JSON decoding and the
/// fallback-to-default policy live in [`PersistentStore`](super::store::PersistentStore).
pub trait StorageBackend: Send {
    /// Human-readable name (for logs).
    fn name(&self) -> &str;

    /// Return the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}

// ── In-memory backend ───────────────────────────────────────────────

/// Process-local backend.
///
/// Clones share the same map, so two stores built from clones of one
/// `MemoryBackend` behave like two tabs of the same browser profile:
/// each sees the other's writes on its next read, and the last write wins.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory backend lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory backend lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory backend lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}

// ── File backend (native only) ──────────────────────────────────────

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::StorageBackend;
    use crate::errors::CoreError;

    /// One `<key>.json` file per key inside a data directory.
    ///
    /// Writes go to a temporary sibling file that is then renamed over the
    /// target, so a reader never observes a half-written document.
    #[derive(Debug, Clone)]
    pub struct FileBackend {
        dir: PathBuf,
    }

    impl FileBackend {
        /// Open (and create if needed) the data directory.
        pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
            let dir = dir.into();
            fs::create_dir_all(&dir).map_err(|e| {
                CoreError::FileIO(format!("Failed to create data dir {}: {e}", dir.display()))
            })?;
            Ok(Self { dir })
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
            let valid = !key.is_empty()
                && !key.starts_with('.')
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
            if !valid {
                return Err(CoreError::Storage(format!("Invalid storage key '{key}'")));
            }
            Ok(self.dir.join(format!("{key}.json")))
        }
    }

    impl StorageBackend for FileBackend {
        fn name(&self) -> &str {
            "file"
        }

        fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
            let path = self.path_for(key)?;
            match fs::read_to_string(&path) {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(CoreError::FileIO(format!("Failed to read {}: {e}", path.display()))),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
            let path = self.path_for(key)?;
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value)
                .map_err(|e| CoreError::FileIO(format!("Failed to write {}: {e}", tmp.display())))?;
            fs::rename(&tmp, &path).map_err(|e| {
                CoreError::FileIO(format!("Failed to replace {}: {e}", path.display()))
            })?;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), CoreError> {
            let path = self.path_for(key)?;
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(CoreError::FileIO(format!("Failed to remove {}: {e}", path.display()))),
            }
        }
    }
}
