//! Bookmark set
//!
//! A persisted set of content IDs with toggle semantics. Insertion order is
//! kept so saved items list in the order they were bookmarked.
//!
//! IDs are not checked against the content tree: a bookmark may point at a
//! node that no longer exists, and the resolver reports it as missing.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::storage::{self, SharedStore, StorageKey};

pub struct BookmarkSet {
    ids: Vec<String>,
    store: SharedStore,
    degraded: bool,
}

impl BookmarkSet {
    /// Load the set from storage, starting empty on absence or corruption
    pub fn load(store: SharedStore) -> Self {
        let stored: Vec<String> = storage::load_json_or_default(&*store, StorageKey::Bookmarks);

        let mut seen = HashSet::new();
        let ids: Vec<String> = stored
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        debug!(count = ids.len(), "Loaded bookmarks");
        Self {
            ids,
            store,
            degraded: false,
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids.iter().any(|saved| saved == id)
    }

    /// Flip the bookmark state of `id`, returning whether it is now bookmarked
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_saved = match self.ids.iter().position(|saved| saved == id) {
            Some(pos) => {
                self.ids.remove(pos);
                false
            }
            None => {
                self.ids.push(id.to_string());
                true
            }
        };
        debug!(id, now_saved, "Toggled bookmark");
        self.persist();
        now_saved
    }

    /// Bookmarked IDs in insertion order
    pub fn list(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether the last persist failed and state is held in memory only
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    fn persist(&mut self) {
        match storage::save_json(&*self.store, StorageKey::Bookmarks, &self.ids) {
            Ok(()) => self.degraded = false,
            Err(e) => {
                warn!(
                    error = %e,
                    recoverable = e.is_recoverable(),
                    "Failed to persist bookmarks, keeping them in memory"
                );
                self.degraded = true;
            }
        }
    }
}

impl std::fmt::Debug for BookmarkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmarkSet")
            .field("ids", &self.ids)
            .field("degraded", &self.degraded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn memory() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_toggle_flips_state() {
        let mut bookmarks = BookmarkSet::load(memory());
        assert!(!bookmarks.has("day1-k-1"));

        assert!(bookmarks.toggle("day1-k-1"));
        assert!(bookmarks.has("day1-k-1"));

        assert!(!bookmarks.toggle("day1-k-1"));
        assert!(!bookmarks.has("day1-k-1"));
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let mut bookmarks = BookmarkSet::load(memory());
        bookmarks.toggle("a");

        for id in ["a", "b"] {
            let before = bookmarks.has(id);
            bookmarks.toggle(id);
            bookmarks.toggle(id);
            assert_eq!(bookmarks.has(id), before);
        }
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut bookmarks = BookmarkSet::load(memory());
        bookmarks.toggle("c");
        bookmarks.toggle("a");
        bookmarks.toggle("b");
        bookmarks.toggle("a");
        bookmarks.toggle("a");
        assert_eq!(bookmarks.list(), ["c", "b", "a"]);
    }

    #[test]
    fn test_toggle_persists_full_set() {
        let store = memory();
        let mut bookmarks = BookmarkSet::load(store.clone());
        bookmarks.toggle("x");
        bookmarks.toggle("y");

        assert_eq!(
            store.get(StorageKey::Bookmarks).as_deref(),
            Some(r#"["x","y"]"#)
        );

        let reloaded = BookmarkSet::load(store);
        assert_eq!(reloaded.list(), ["x", "y"]);
    }

    #[test]
    fn test_unknown_ids_are_accepted() {
        let mut bookmarks = BookmarkSet::load(memory());
        assert!(bookmarks.toggle("not-in-any-tree"));
        assert!(bookmarks.has("not-in-any-tree"));
    }

    #[test]
    fn test_malformed_storage_starts_empty() {
        let store = Arc::new(MemoryStore::new().with_value(StorageKey::Bookmarks, "[1, 2"));
        let bookmarks = BookmarkSet::load(store);
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_duplicates_in_storage_are_collapsed() {
        let store =
            Arc::new(MemoryStore::new().with_value(StorageKey::Bookmarks, r#"["a","b","a"]"#));
        let bookmarks = BookmarkSet::load(store);
        assert_eq!(bookmarks.list(), ["a", "b"]);
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let store = Arc::new(MemoryStore::failing());
        let mut bookmarks = BookmarkSet::load(store.clone());

        assert!(bookmarks.toggle("a"));
        assert!(bookmarks.has("a"));
        assert!(bookmarks.is_degraded());
        assert!(store.get(StorageKey::Bookmarks).is_none());

        store.set_failing(false);
        bookmarks.toggle("b");
        assert!(!bookmarks.is_degraded());
        assert_eq!(
            store.get(StorageKey::Bookmarks).as_deref(),
            Some(r#"["a","b"]"#)
        );
    }
}
