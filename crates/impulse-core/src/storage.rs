use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, RwLock},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::CoreError;

/// Prefix shared by every key this system writes.
pub const NAMESPACE: &str = "impulse_stopper_";

/// Raw string-keyed persistence medium.
///
/// Backends only move opaque JSON text; typing and fallback-to-default live
/// in [`Store`].
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
    fn keys(&self) -> Result<Vec<String>, CoreError>;
}

/// The three independently persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Expenses,
    Timers,
    Settings,
}

impl StoreKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::Expenses => "impulse_stopper_expenses",
            StoreKey::Timers => "impulse_stopper_timers",
            StoreKey::Settings => "impulse_stopper_settings",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed handle over a [`KeyValueStore`], shared by every repository.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
}

impl Store {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Reads and decodes `key`, falling back to `T::default()` when the key
    /// is absent, unreadable or malformed.
    pub fn get<T>(&self, key: StoreKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.backend.read(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(%key, "key absent, using default");
                return T::default();
            }
            Err(err) => {
                warn!(%key, error = %err, "failed to read key, using default");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(%key, error = %err, "malformed persisted value, using default");
                T::default()
            }
        }
    }

    /// Serializes `value` and replaces whatever `key` held before.
    pub fn set<T>(&self, key: StoreKey, value: &T) -> Result<(), CoreError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value).map_err(|err| CoreError::Serde(err.to_string()))?;
        self.backend.write(key.as_str(), &json)
    }

    /// Erases every key in [`NAMESPACE`], returning how many were removed.
    pub fn clear(&self) -> Result<usize, CoreError> {
        let mut removed = 0;
        for key in self.backend.keys()? {
            if key.starts_with(NAMESPACE) {
                self.backend.remove(&key)?;
                removed += 1;
            }
        }
        debug!(removed, "cleared store namespace");
        Ok(removed)
    }
}

/// Volatile backend used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> CoreError {
    CoreError::Storage("memory store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}
