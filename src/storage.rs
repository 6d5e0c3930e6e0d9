use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Raw per-key string storage. The file backend mirrors a browser's
/// per-origin local storage; the memory backend exists for tests and for
/// running without a writable home directory.
pub trait StorageBackend: Send {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One JSON file per key under a data directory (default `~/.wanderlog`).
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn default_dir() -> Result<Self, StorageError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StorageError::Unavailable("no home directory".to_string()))?;
        Ok(Self::new(home.join(".wanderlog")))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Atomic write via temp file + rename, so a crash never leaves a
    /// half-written value behind.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp = path.with_extension("tmp");
        let mut f = fs::File::create(&temp)?;
        f.write_all(value.as_bytes())?;
        f.sync_all()?;
        fs::rename(temp, path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

type Listener = Box<dyn Fn(&str) + Send>;

/// Typed wrapper over a [`StorageBackend`]. Reads fall back to a default
/// on any failure and writes swallow errors with a log line: local storage
/// is an optimization, never a correctness requirement, so no error from
/// here reaches the central error state.
pub struct LocalStore {
    backend: Box<dyn StorageBackend>,
    listeners: Mutex<HashMap<String, Vec<Listener>>>,
}

impl LocalStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            listeners: Mutex::new(HashMap::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::default()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.backend.read(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, error = %e, "stored value failed to parse, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed, using default");
                default
            }
        }
    }

    /// Write failures leave the previously stored value untouched.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to serialize value for storage");
                return;
            }
        };
        if let Err(e) = self.backend.write(key, &raw) {
            tracing::error!(key, error = %e, "storage write failed, keeping prior value");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            tracing::error!(key, error = %e, "storage remove failed");
        }
    }

    /// Subscribe to external changes for one key. The callback fires only
    /// when the incoming raw payload parses as `T`; garbage written by
    /// another context is ignored.
    pub fn subscribe<T, F>(&self, key: &str, callback: F)
    where
        T: DeserializeOwned,
        F: Fn(T) + Send + 'static,
    {
        let listener: Listener = Box::new(move |raw| {
            if let Ok(value) = serde_json::from_str::<T>(raw) {
                callback(value);
            }
        });
        self.listeners
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push(listener);
    }

    /// Entry point for the host's change notification (the analogue of a
    /// cross-tab storage event): another context changed `key` to `raw`.
    pub fn notify_external_change(&self, key: &str, raw: &str) {
        let listeners = self.listeners.lock().unwrap();
        if let Some(for_key) = listeners.get(key) {
            for listener in for_key {
                listener(raw);
            }
        }
    }
}
