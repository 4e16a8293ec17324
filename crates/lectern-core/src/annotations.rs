//! Highlights and the reflection journal
//!
//! Highlights are detached text snapshots: they keep the captured words and
//! when they were captured, not where in the document they came from. The
//! journal is a single free-text field, last write wins.
//!
//! Every mutation is written straight through to storage. A failed write is
//! logged and the in-memory state stays authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::storage::{self, SharedStore, StorageKey, StorageResult};

/// A captured piece of selected text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    /// Unique identifier (time-ordered)
    pub id: String,
    /// The selected text, trimmed
    pub text: String,
    /// When this highlight was captured
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

impl Highlight {
    /// Create a highlight for `text` with a fresh ID and the current time
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            text: text.as_ref().trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Format `text` as a journal quote
fn journal_quote(text: &str) -> String {
    format!("> \"{}\"", text)
}

pub struct AnnotationStore {
    highlights: Vec<Highlight>,
    journal: String,
    store: SharedStore,
    /// Last write of the highlight list failed
    highlights_unsaved: bool,
    /// Last write of the journal failed
    journal_unsaved: bool,
}

impl AnnotationStore {
    /// Load highlights and journal, each falling back to empty independently
    pub fn load(store: SharedStore) -> Self {
        let highlights: Vec<Highlight> =
            storage::load_json_or_default(&*store, StorageKey::Highlights);
        let journal = storage::load_text_or_default(&*store, StorageKey::Journal);

        debug!(
            highlights = highlights.len(),
            journal_len = journal.len(),
            "Loaded annotations"
        );
        Self {
            highlights,
            journal,
            store,
            highlights_unsaved: false,
            journal_unsaved: false,
        }
    }

    // ==================== Highlights ====================

    /// Append a new highlight, most recent last
    pub fn add_highlight(&mut self, text: &str) -> Highlight {
        let highlight = Highlight::new(text);
        info!(id = %highlight.id, "Captured highlight");
        self.highlights.push(highlight.clone());
        self.persist_highlights();
        highlight
    }

    /// Delete a highlight by ID, returning whether one was removed
    pub fn delete_highlight(&mut self, id: &str) -> bool {
        let before = self.highlights.len();
        self.highlights.retain(|h| h.id != id);
        let removed = self.highlights.len() != before;
        if removed {
            self.persist_highlights();
        }
        removed
    }

    pub fn highlight(&self, id: &str) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.id == id)
    }

    /// Highlights in capture order
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    // ==================== Journal ====================

    pub fn journal(&self) -> &str {
        &self.journal
    }

    /// Replace the journal text verbatim
    pub fn set_journal(&mut self, text: impl Into<String>) {
        self.journal = text.into();
        self.persist_journal();
    }

    /// Append `text` as a quoted block
    ///
    /// The quote is separated from existing content by a blank line, or
    /// becomes the whole journal when it is empty.
    pub fn append_to_journal(&mut self, text: &str) {
        let quote = journal_quote(text);
        if self.journal.is_empty() {
            self.journal = quote;
        } else {
            self.journal.push_str("\n\n");
            self.journal.push_str(&quote);
        }
        self.persist_journal();
    }

    /// Copy a highlight's text into the journal
    pub fn copy_highlight_to_journal(&mut self, id: &str) -> bool {
        let Some(text) = self.highlight(id).map(|h| h.text.clone()) else {
            return false;
        };
        self.append_to_journal(&text);
        true
    }

    /// Whether the highlights or the journal are held in memory only
    pub fn is_degraded(&self) -> bool {
        self.highlights_unsaved || self.journal_unsaved
    }

    // ==================== Persistence ====================

    fn persist_highlights(&mut self) {
        let result = storage::save_json(&*self.store, StorageKey::Highlights, &self.highlights);
        self.highlights_unsaved = failed(StorageKey::Highlights, result);
    }

    fn persist_journal(&mut self) {
        let result = self.store.write(StorageKey::Journal, &self.journal);
        self.journal_unsaved = failed(StorageKey::Journal, result);
    }
}

/// Log a failed write; true when `result` is an error
fn failed(key: StorageKey, result: StorageResult<()>) -> bool {
    match result {
        Ok(()) => false,
        Err(e) => {
            warn!(
                %key,
                error = %e,
                recoverable = e.is_recoverable(),
                "Failed to persist, keeping changes in memory"
            );
            true
        }
    }
}

impl std::fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("highlights", &self.highlights)
            .field("journal", &self.journal)
            .field("highlights_unsaved", &self.highlights_unsaved)
            .field("journal_unsaved", &self.journal_unsaved)
            .finish()
    }
}
