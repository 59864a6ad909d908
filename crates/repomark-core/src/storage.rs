//! Durable key-value persistence.
//!
//! [`Storage`] stores one string value per key. [`load_json`] and
//! [`save_json`] layer tolerant JSON handling on top: reads fall back to a
//! caller-supplied default and writes are best-effort. Callers keep their
//! in-memory state authoritative for the session when persistence fails.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Durable string-per-key storage.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `contents` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be written.
    fn write(&self, key: &str, contents: &str) -> Result<()>;
}

/// File-backed storage keeping one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir`.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), contents)?;
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

/// Read and deserialize the value under `key`.
///
/// Falls back to `default` when the key is absent, the backend fails to
/// read, or the stored value is malformed. Never errors.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str, default: T) -> T {
    match storage.read(key) {
        Ok(Some(contents)) => match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is malformed, using default");
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value, using default");
            default
        }
    }
}

/// Serialize and write `value` under `key`.
///
/// Failures are logged and swallowed; the caller's in-memory state stays
/// authoritative for the session.
pub fn save_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) {
    let contents = match serde_json::to_string(value) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to serialize value");
            return;
        }
    };

    if let Err(e) = storage.write(key, &contents) {
        tracing::warn!(key, error = %e, "failed to persist value");
    }
}
