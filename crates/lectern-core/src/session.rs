//! Reader session
//!
//! The `Session` ties the content tree to the reader's state:
//! - bookmarks
//! - highlights and journal
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = Session::open()?;
//!
//! session.toggle_bookmark("day1-k-1");
//! for item in session.saved_items() {
//!     println!("{} ({})", item.title, item.label);
//! }
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::annotations::AnnotationStore;
use crate::bookmarks::BookmarkSet;
use crate::browse::{flatten, BrowseCategory, FlatItem};
use crate::config::Config;
use crate::content::{lesson_label, ContentTree, Icon};
use crate::export::ExportFormat;
use crate::navigation::{learning_plan, PlanDay, StepCursor};
use crate::resolver::{self, SavedItemSummary};
use crate::storage::{FileStore, SharedStore};

/// Overview entry for one lesson
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonCard {
    pub index: usize,
    pub id: String,
    /// "Intro" or "Lesson N"
    pub label: String,
    pub short_title: String,
    pub description: String,
    pub icon: Icon,
    pub bookmarked: bool,
}

/// Counts describing the session's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub lessons: usize,
    pub bookmarks: usize,
    /// Bookmarks whose ID no longer resolves
    pub stale_bookmarks: usize,
    pub highlights: usize,
    pub journal_chars: usize,
}

pub struct Session {
    tree: ContentTree,
    bookmarks: BookmarkSet,
    annotations: AnnotationStore,
    config: Config,
}

impl Session {
    /// Open a session using the configuration from the default location
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open a session with a specific configuration
    ///
    /// Reader state lives under `data_dir`; content comes from
    /// `content_path` or the bundled guide.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let tree = match &config.content_path {
            Some(path) => ContentTree::load(path)
                .with_context(|| format!("Failed to load content from {:?}", path))?,
            None => ContentTree::bundled().context("Failed to load bundled guide")?,
        };

        let store: SharedStore = Arc::new(FileStore::new(config.data_dir.clone()));
        Ok(Self::with_store_and_config(tree, store, config))
    }

    /// Build a session over any storage backend with default configuration
    pub fn with_store(tree: ContentTree, store: SharedStore) -> Self {
        Self::with_store_and_config(tree, store, Config::default())
    }

    pub fn with_store_and_config(tree: ContentTree, store: SharedStore, config: Config) -> Self {
        let bookmarks = BookmarkSet::load(store.clone());
        let annotations = AnnotationStore::load(store);
        Self {
            tree,
            bookmarks,
            annotations,
            config,
        }
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Bookmarks ====================

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.bookmarks
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.bookmarks.has(id)
    }

    /// Flip a bookmark, returning whether `id` is now bookmarked
    pub fn toggle_bookmark(&mut self, id: &str) -> bool {
        self.bookmarks.toggle(id)
    }

    /// Resolve an ID against the content tree
    pub fn resolve(&self, id: &str) -> Option<SavedItemSummary> {
        resolver::resolve(&self.tree, id)
    }

    /// Every bookmark that still resolves, in bookmarking order
    pub fn saved_items(&self) -> Vec<SavedItemSummary> {
        self.bookmarks
            .list()
            .iter()
            .filter_map(|id| {
                let summary = self.resolve(id);
                if summary.is_none() {
                    debug!(id = %id, "Skipping bookmark that no longer resolves");
                }
                summary
            })
            .collect()
    }

    // ==================== Annotations ====================

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut AnnotationStore {
        &mut self.annotations
    }

    /// Render the annotations in `format` under the configured title
    pub fn export(&self, format: ExportFormat) -> String {
        format.render(&self.config.export_title, &self.annotations)
    }

    // ==================== Content ====================

    pub fn is_valid_lesson_index(&self, index: usize) -> bool {
        self.tree.is_valid_lesson_index(index)
    }

    pub fn lesson_cards(&self) -> Vec<LessonCard> {
        self.tree
            .lessons()
            .iter()
            .enumerate()
            .map(|(index, lesson)| LessonCard {
                index,
                id: lesson.id.clone(),
                label: lesson_label(index),
                short_title: lesson.short_title.clone(),
                description: lesson.description.clone(),
                icon: lesson.icon,
                bookmarked: self.bookmarks.has(&lesson.id),
            })
            .collect()
    }

    pub fn browse(&self, category: BrowseCategory) -> Vec<FlatItem> {
        flatten(&self.tree, category)
    }

    pub fn cursor(&self, step: usize) -> StepCursor {
        StepCursor::for_tree(&self.tree, step)
    }

    pub fn plan(&self, current_step: usize) -> Vec<PlanDay> {
        learning_plan(&self.tree, &self.bookmarks, current_step)
    }

    // ==================== Status ====================

    /// Whether a write made by this session failed and is held in memory only
    pub fn is_degraded(&self) -> bool {
        self.bookmarks.is_degraded() || self.annotations.is_degraded()
    }

    pub fn status(&self) -> SessionStatus {
        let stale = self
            .bookmarks
            .list()
            .iter()
            .filter(|id| self.resolve(id).is_none())
            .count();

        SessionStatus {
            lessons: self.tree.len(),
            bookmarks: self.bookmarks.len(),
            stale_bookmarks: stale,
            highlights: self.annotations.highlights().len(),
            journal_chars: self.annotations.journal().chars().count(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("lessons", &self.tree.len())
            .field("bookmarks", &self.bookmarks)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageKey};
    use tempfile::TempDir;

    fn memory_session() -> Session {
        let tree = ContentTree::bundled().unwrap();
        Session::with_store(tree, Arc::new(MemoryStore::new()))
    }

    fn file_config(temp: &TempDir) -> Config {
        Config {
            data_dir: temp.path().join("data"),
            ..Config::default()
        }
    }

    #[test]
    fn test_saved_items_drop_stale_ids() {
        let store = Arc::new(
            MemoryStore::new()
                .with_value(StorageKey::Bookmarks, r#"["intro-l1-1","gone","day1"]"#),
        );
        let session = Session::with_store(ContentTree::bundled().unwrap(), store);

        let ids: Vec<_> = session.saved_items().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["intro-l1-1", "day1"]);
        assert_eq!(session.status().stale_bookmarks, 1);
        assert_eq!(session.status().bookmarks, 3);
    }

    #[test]
    fn test_lesson_cards() {
        let mut session = memory_session();
        session.toggle_bookmark("day1");

        let cards = session.lesson_cards();
        assert_eq!(cards.len(), session.tree().len());
        assert_eq!(cards[0].label, "Intro");
        assert_eq!(cards[1].label, "Lesson 1");
        assert!(cards[1].bookmarked);
        assert!(!cards[0].bookmarked);
    }

    #[test]
    fn test_export_uses_configured_title() {
        let tree = ContentTree::bundled().unwrap();
        let config = Config {
            export_title: "Week One".to_string(),
            ..Config::default()
        };
        let session = Session::with_store_and_config(tree, Arc::new(MemoryStore::new()), config);
        assert!(session
            .export(ExportFormat::Markdown)
            .starts_with("# Week One\n\n"));
    }

    #[test]
    fn test_file_backed_session_persists() {
        let temp = TempDir::new().unwrap();

        {
            let mut session = Session::open_with_config(file_config(&temp)).unwrap();
            session.toggle_bookmark("day2");
            session.annotations_mut().add_highlight("kept across runs");
            session.annotations_mut().set_journal("notes");
        }

        let session = Session::open_with_config(file_config(&temp)).unwrap();
        assert!(session.is_bookmarked("day2"));
        assert_eq!(session.annotations().highlights()[0].text, "kept across runs");
        assert_eq!(session.annotations().journal(), "notes");
        assert!(file_config(&temp).journal_path().exists());
    }

    #[test]
    fn test_custom_content_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("guide.json");
        std::fs::write(
            &path,
            r#"{"lessons":[{"id":"only","title":"Only","shortTitle":"Only","description":"","icon":"Info","sections":[],"blocks":[]}]}"#,
        )
        .unwrap();

        let config = Config {
            content_path: Some(path),
            ..file_config(&temp)
        };
        let session = Session::open_with_config(config).unwrap();
        assert_eq!(session.tree().len(), 1);
        assert!(session.is_valid_lesson_index(0));
        assert!(!session.is_valid_lesson_index(1));
    }

    #[test]
    fn test_bad_content_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            content_path: Some(temp.path().join("missing.json")),
            ..file_config(&temp)
        };
        assert!(Session::open_with_config(config).is_err());
    }

    #[test]
    fn test_degraded_status() {
        let store = Arc::new(MemoryStore::failing());
        let mut session = Session::with_store(ContentTree::bundled().unwrap(), store);
        assert!(!session.is_degraded());

        session.toggle_bookmark("day1");
        assert!(session.is_degraded());
        assert!(session.is_bookmarked("day1"));
    }
}
