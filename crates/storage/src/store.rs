//! Storage backends and the lenient access wrapper.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::StorageError;

/// A string key/value backend.
///
/// Implementations must be safe to share across tasks; the client only ever
/// mutates storage from its main flow, but polling ticks may re-enter.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// In-process backend used for the tab store and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Backend("store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Backend("store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Backend("store lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Backend("store lock poisoned".into()))?;
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Cloneable handle over a backend with the client's lenient semantics:
/// reads fall back to defaults, writes are best-effort.
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn KeyValueStore>,
}

impl Store {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read a value; backend failures read as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.inner.get(key) {
            Ok(value) => value,
            Err(e) => {
                debug!("storage read failed for {key}: {e}");
                None
            }
        }
    }

    /// Write a value, logging (not propagating) backend failures.
    pub fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.set(key, value) {
            debug!("storage write failed for {key}: {e}");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.inner.remove(key) {
            debug!("storage remove failed for {key}: {e}");
        }
    }

    /// Read an integer; absent or unparseable values yield `fallback`.
    pub fn get_number(&self, key: &str, fallback: i64) -> i64 {
        self.get(key)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(fallback)
    }

    pub fn set_number(&self, key: &str, value: i64) {
        self.set(key, &value.to_string());
    }

    /// Read a JSON value; absent or malformed entries yield `None`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("storage entry {key} holds malformed JSON: {e}");
                None
            }
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, &raw),
            Err(e) => debug!("could not serialize storage entry {key}: {e}"),
        }
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        match self.inner.keys_with_prefix(prefix) {
            Ok(keys) => keys,
            Err(e) => {
                debug!("storage prefix scan failed for {prefix}: {e}");
                Vec::new()
            }
        }
    }

    /// Remove every key under `prefix`.
    pub fn remove_prefix(&self, prefix: &str) {
        for key in self.keys_with_prefix(prefix) {
            self.remove(&key);
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

/// The client's two storage scopes.
///
/// `tab` lives and dies with the browser tab; `shared` persists across tabs.
#[derive(Clone, Debug)]
pub struct Storage {
    tab: Store,
    shared: Store,
}

impl Storage {
    pub fn new(tab: Store, shared: Store) -> Self {
        Self { tab, shared }
    }

    /// Both scopes backed by in-process memory. Used in tests and headless
    /// runs where no host storage exists.
    pub fn in_memory() -> Self {
        Self::new(Store::memory(), Store::memory())
    }

    pub fn tab(&self) -> &Store {
        &self.tab
    }

    pub fn shared(&self) -> &Store {
        &self.shared
    }
}
