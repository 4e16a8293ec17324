//! Lectern Core Library
//!
//! This crate provides the core functionality for lectern, a reader for
//! structured lesson guides with bookmarks, highlights and a reflection
//! journal.
//!
//! # Architecture
//!
//! - **Content tree**: immutable lessons, sections, blocks and list items
//! - **Reader state**: bookmarks, highlights and journal, persisted per key
//!
//! Everything derived from the tree (saved-item summaries, category views,
//! the learning plan, exports) is computed on demand and never stored.
//!
//! # Quick Start
//!
//! ```text
//! let mut session = Session::open()?;
//!
//! // Bookmark a list item and list what is saved
//! session.toggle_bookmark("day1-k-1");
//! let saved = session.saved_items();
//!
//! // Export highlights and journal
//! let markdown = session.export(ExportFormat::Markdown);
//! ```
//!
//! # Modules
//!
//! - `session`: Reader session (main entry point)
//! - `content`: Content tree model and loading
//! - `resolver`: Bookmark ID resolution
//! - `bookmarks`: Persisted bookmark set
//! - `annotations`: Highlights and journal
//! - `selection`: Selection-to-highlight state machine
//! - `browse`: Category flattening
//! - `navigation`: Step cursor and learning plan
//! - `export`: Markdown and paginated exports
//! - `storage`: Key/value persistence backends
//! - `config`: Application configuration

pub mod annotations;
pub mod bookmarks;
pub mod browse;
pub mod config;
pub mod content;
pub mod export;
pub mod navigation;
pub mod resolver;
pub mod selection;
pub mod session;
pub mod storage;

pub use annotations::{AnnotationStore, Highlight};
pub use bookmarks::BookmarkSet;
pub use browse::{flatten, BrowseCategory, FlatItem, FlatItemKind};
pub use config::Config;
pub use content::{Block, ContentError, ContentTree, ContentType, Icon, Lesson, Section};
pub use export::{ExportFormat, PageLayout, PagedDocument};
pub use navigation::{learning_plan, PlanDay, StepCursor};
pub use resolver::{lesson_link, resolve, ItemKind, SavedItemSummary, SummaryLabel};
pub use selection::{
    CommitOutcome, Marking, MarkingFailure, ScreenPoint, Selection, SelectionCapture, TextAnchor,
};
pub use session::{LessonCard, Session, SessionStatus};
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError, StorageKey,
};
