//! In-memory key/value storage

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{KeyValueStore, StorageError, StorageKey, StorageResult};

/// Map-backed store
///
/// Can be switched into a failing mode where every write is refused, which
/// behaves like a browser storage quota being exhausted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StorageKey, String>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes all fail
    pub fn failing() -> Self {
        let store = Self::new();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Pre-populate a raw value, bypassing the failing mode
    pub fn with_value(self, key: StorageKey, value: impl Into<String>) -> Self {
        self.values().insert(key, value.into());
        self
    }

    /// Raw value currently stored under `key`
    pub fn get(&self, key: StorageKey) -> Option<String> {
        self.values().get(&key).cloned()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<StorageKey, String>> {
        // A panic while holding the lock cannot leave the map half-updated
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: StorageKey) -> StorageResult<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded(key));
        }
        self.values().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        self.values().remove(&key);
        Ok(())
    }
}
