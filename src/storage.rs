//! Key/value persistence boundary.
//!
//! The engine treats storage as a best-effort mirror of in-memory state:
//! reads fall back to defaults, writes are logged and swallowed. The original
//! application kept everything in browser localStorage; [`JsonFileStore`]
//! keeps the same one-JSON-document-per-key contract on disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Well-known storage keys.
pub mod keys {
    pub const USER_PREFERENCES: &str = "quiz-app-preferences";
    pub const SAVED_QUIZZES: &str = "quiz-app-saved-quizzes";
    pub const QUIZ_HISTORY: &str = "quiz-app-history";
    pub const LAST_GENERATOR_CONFIG: &str = "quiz-app-last-generator-config";
    pub const CURRENT_QUIZ: &str = "quiz-app-current-quiz";
    pub const CURRENT_RESULTS: &str = "quiz-app-current-results";
    pub const CURRENT_SUMMARY: &str = "quiz-app-current-summary";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lock error: {0}")]
    Lock(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Object-safe key/value store over JSON values.
pub trait KeyValueStore: Send + Sync {
    fn save_value(&self, key: &str, value: &serde_json::Value) -> StorageResult<()>;
    fn load_value(&self, key: &str) -> StorageResult<Option<serde_json::Value>>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Typed helpers over any [`KeyValueStore`].
pub trait StoreExt {
    fn save<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()>;
    fn load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>>;

    /// Load a value, falling back to `default` on a missing key or any
    /// read/decode failure. Failures are logged, never propagated.
    fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T;
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {
    fn save<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let value = serde_json::to_value(value)?;
        self.save_value(key, &value)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.load_value(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                warn!(key, error = %err, "failed to read stored value, using default");
                default
            }
        }
    }
}

// ========== File-backed store ==========

/// One JSON file per key under a base directory.
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> StorageResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed constants, but guard against separators anyway.
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.base_dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn save_value(&self, key: &str, value: &serde_json::Value) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(self.path_for(key), bytes)?;
        Ok(())
    }

    fn load_value(&self, key: &str) -> StorageResult<Option<serde_json::Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ========== In-memory store ==========

/// In-memory store for tests and in-memory-only degraded operation.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn save_value(&self, key: &str, value: &serde_json::Value) -> StorageResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        values.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn load_value(&self, key: &str) -> StorageResult<Option<serde_json::Value>> {
        let values = self
            .values
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        values.remove(key);
        Ok(())
    }
}
