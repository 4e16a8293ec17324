//! Storage layer
//!
//! Each piece of reader state lives under its own key:
//!
//! - **Bookmarks**: JSON list of bookmarked IDs
//! - **Highlights**: JSON list of `{id, text, date}` records
//! - **Journal**: the raw reflection text
//!
//! Keys are independent. A missing or corrupt value under one key never
//! affects the others.
//!
//! ## Backends
//!
//! - [`FileStore`]: one file per key under the data directory, written atomically
//! - [`MemoryStore`]: in-process map, used by tests and throwaway sessions

pub mod error;
pub mod file;
pub mod memory;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// The independently persisted entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Bookmarks,
    Highlights,
    Journal,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [
        StorageKey::Bookmarks,
        StorageKey::Highlights,
        StorageKey::Journal,
    ];

    /// File name used by [`FileStore`]
    pub fn file_name(&self) -> &'static str {
        match self {
            StorageKey::Bookmarks => "bookmarks.json",
            StorageKey::Highlights => "highlights.json",
            StorageKey::Journal => "journal.md",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageKey::Bookmarks => "bookmarks",
            StorageKey::Highlights => "highlights",
            StorageKey::Journal => "journal",
        };
        f.write_str(name)
    }
}

/// A key-per-entity persistent store
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value under `key`; `Ok(None)` when nothing was stored
    fn read(&self, key: StorageKey) -> StorageResult<Option<String>>;

    /// Replace the value under `key`
    fn write(&self, key: StorageKey, value: &str) -> StorageResult<()>;

    /// Drop the value under `key` (absent keys are not an error)
    fn remove(&self, key: StorageKey) -> StorageResult<()>;
}

/// Store handle shared by the bookmark set and the annotation store
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Read and decode a JSON value, falling back to `T::default()`
///
/// Absence is silent. Unreadable or malformed data is logged and treated
/// as absence so a corrupt entry can never block startup.
pub fn load_json_or_default<T>(store: &dyn KeyValueStore, key: StorageKey) -> T
where
    T: DeserializeOwned + Default,
{
    match store.read(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(%key, error = %e, "Stored value is malformed, starting empty");
            T::default()
        }),
        Ok(None) => {
            debug!(%key, "Nothing stored yet");
            T::default()
        }
        Err(e) => {
            warn!(%key, error = %e, "Failed to read stored value, starting empty");
            T::default()
        }
    }
}

/// Read a raw text value, falling back to an empty string
pub fn load_text_or_default(store: &dyn KeyValueStore, key: StorageKey) -> String {
    match store.read(key) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            warn!(%key, error = %e, "Failed to read stored value, starting empty");
            String::new()
        }
    }
}

/// Encode `value` as JSON and write it under `key`
pub fn save_json<T>(store: &dyn KeyValueStore, key: StorageKey, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
{
    let encoded =
        serde_json::to_string(value).map_err(|source| StorageError::Encode { key, source })?;
    store.write(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_missing_is_default() {
        let store = MemoryStore::new();
        let ids: Vec<String> = load_json_or_default(&store, StorageKey::Bookmarks);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_load_json_malformed_is_default() {
        let store = MemoryStore::new().with_value(StorageKey::Bookmarks, "{not json");
        let ids: Vec<String> = load_json_or_default(&store, StorageKey::Bookmarks);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_load_json_wrong_shape_is_default() {
        let store = MemoryStore::new().with_value(StorageKey::Bookmarks, r#"{"a": 1}"#);
        let ids: Vec<String> = load_json_or_default(&store, StorageKey::Bookmarks);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_save_then_load_json() {
        let store = MemoryStore::new();
        save_json(&store, StorageKey::Bookmarks, &["x", "y"]).unwrap();
        let ids: Vec<String> = load_json_or_default(&store, StorageKey::Bookmarks);
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn test_load_text() {
        let store = MemoryStore::new();
        assert_eq!(load_text_or_default(&store, StorageKey::Journal), "");

        store.write(StorageKey::Journal, "> \"quote\"").unwrap();
        assert_eq!(load_text_or_default(&store, StorageKey::Journal), "> \"quote\"");
    }
}
