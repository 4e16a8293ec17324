//! Lesson content model
//!
//! The content tree is the pre-authored guide: lessons, their sections, the
//! blocks inside those sections and the items inside list blocks. It is
//! loaded once at startup and never mutated afterwards.
//!
//! ## Shape
//!
//! ```text
//! ContentTree
//! └── Lesson (id, title, icon, ...)
//!     ├── Block*            intro blocks attached to the lesson
//!     └── Section*          (optional id, content type)
//!         └── Block*
//!             └── ListItem* (list blocks only)
//! ```
//!
//! Only lessons, sections, paragraphs, lists and list items carry IDs.
//! Blockquotes, boxes and headings are never bookmarkable.

mod text;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use text::html_to_text;

/// Guide shipped with the crate, used when no content path is configured
const BUNDLED_GUIDE: &str = include_str!("../../content/guide.json");

/// Errors raised while loading a content tree
#[derive(Error, Debug)]
pub enum ContentError {
    /// Content file could not be read
    #[error("Failed to read content file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid JSON for the tree schema (includes unknown icons)
    #[error("Invalid content: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two nodes share an ID
    #[error("Duplicate content ID '{0}'")]
    DuplicateId(String),
}

/// Category of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Knowledge,
    Activity,
    Resource,
    #[default]
    General,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Knowledge => "knowledge",
            ContentType::Activity => "activity",
            ContentType::Resource => "resource",
            ContentType::General => "general",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon tags used by lessons, sections, headings and saved-item summaries
///
/// Content names icons by string; an unknown name fails at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    Lightbulb,
    BookOpen,
    Keyboard,
    Eye,
    Layout,
    Headphones,
    Mic,
    Glasses,
    Info,
    CheckCircle2,
    Bookmark,
    CheckSquare,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Lightbulb => "Lightbulb",
            Icon::BookOpen => "BookOpen",
            Icon::Keyboard => "Keyboard",
            Icon::Eye => "Eye",
            Icon::Layout => "Layout",
            Icon::Headphones => "Headphones",
            Icon::Mic => "Mic",
            Icon::Glasses => "Glasses",
            Icon::Info => "Info",
            Icon::CheckCircle2 => "CheckCircle2",
            Icon::Bookmark => "Bookmark",
            Icon::CheckSquare => "CheckSquare",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual style of a box block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoxStyle {
    Blue,
    #[default]
    Plain,
}

/// An item inside a list block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    /// HTML fragment
    pub content: String,
}

/// A unit of lesson content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Paragraph {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        content: String,
    },
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        ordered: bool,
        #[serde(default)]
        items: Vec<ListItem>,
    },
    Blockquote {
        #[serde(default)]
        content: String,
    },
    #[serde(rename = "box")]
    Callout {
        #[serde(default)]
        style: BoxStyle,
        #[serde(default)]
        content: String,
    },
    Heading {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<Icon>,
    },
}

impl Block {
    /// Bookmarkable ID of this block, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            Block::Paragraph { id, .. } | Block::List { id, .. } => id.as_deref(),
            _ => None,
        }
    }

    /// Items of a list block; empty for every other kind
    pub fn items(&self) -> &[ListItem] {
        match self {
            Block::List { items, .. } => items,
            _ => &[],
        }
    }

    /// Best-effort descriptive HTML for this block
    ///
    /// Lists have no content of their own, so their first item stands in.
    pub fn snippet(&self) -> &str {
        match self {
            Block::Paragraph { content, .. }
            | Block::Blockquote { content }
            | Block::Callout { content, .. }
            | Block::Heading { content, .. } => content.as_str(),
            Block::List { items, .. } => items.first().map(|i| i.content.as_str()).unwrap_or(""),
        }
    }
}

/// A titled, categorised group of blocks within a lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub icon: Icon,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A top-level lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub short_title: String,
    pub description: String,
    pub icon: Icon,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    /// Intro blocks that sit outside any section
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

/// Display label for a lesson position: "Intro" for the first lesson,
/// "Lesson N" afterwards
pub fn lesson_label(index: usize) -> String {
    match display_number(index) {
        Some(n) => format!("Lesson {}", n),
        None => "Intro".to_string(),
    }
}

/// Lesson number shown to readers; the introduction has none
pub fn display_number(index: usize) -> Option<usize> {
    if index == 0 {
        None
    } else {
        Some(index)
    }
}

/// The immutable lesson document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentTree {
    lessons: Vec<Lesson>,
}

impl ContentTree {
    /// Build a tree without validating ID uniqueness
    pub fn new(lessons: Vec<Lesson>) -> Self {
        Self { lessons }
    }

    /// Build a tree and reject duplicate IDs
    pub fn validated(lessons: Vec<Lesson>) -> Result<Self, ContentError> {
        let tree = Self::new(lessons);
        tree.validate()?;
        Ok(tree)
    }

    /// Parse and validate a tree from JSON
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let tree: ContentTree = serde_json::from_str(json)?;
        tree.validate()?;
        debug!(lessons = tree.lessons.len(), "Loaded content tree");
        Ok(tree)
    }

    /// Load a tree from a JSON file
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The guide bundled with the crate
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_json(BUNDLED_GUIDE)
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Whether `index` addresses a lesson (deep links jump by index)
    pub fn is_valid_lesson_index(&self, index: usize) -> bool {
        index < self.lessons.len()
    }

    /// Every ID in the tree, in document order
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for lesson in &self.lessons {
            ids.push(lesson.id.as_str());
            for section in &lesson.sections {
                ids.extend(section.id.as_deref());
                collect_block_ids(&section.blocks, &mut ids);
            }
            collect_block_ids(&lesson.blocks, &mut ids);
        }
        ids
    }

    /// Check that no two nodes share an ID
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for id in self.ids() {
            if !seen.insert(id) {
                return Err(ContentError::DuplicateId(id.to_string()));
            }
        }
        Ok(())
    }
}

fn collect_block_ids<'a>(blocks: &'a [Block], ids: &mut Vec<&'a str>) {
    for block in blocks {
        ids.extend(block.id());
        ids.extend(block.items().iter().map(|item| item.id.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "lessons": [
            {
                "id": "intro",
                "title": "Welcome",
                "shortTitle": "Intro",
                "description": "Start here",
                "icon": "Info",
                "blocks": [
                    { "id": "intro-p1", "type": "paragraph", "content": "Hello" },
                    { "id": "intro-box", "type": "box", "style": "blue", "content": "Note" }
                ]
            },
            {
                "id": "day1",
                "title": "Day one",
                "shortTitle": "One",
                "description": "First",
                "icon": "Eye",
                "sections": [
                    {
                        "id": "day1-know",
                        "title": "What to know",
                        "icon": "Lightbulb",
                        "colorClass": "border-amber-400",
                        "contentType": "knowledge",
                        "blocks": [
                            { "id": "day1-list", "type": "list", "ordered": true, "items": [
                                { "id": "day1-k-1", "content": "<strong>Fact</strong>" }
                            ] },
                            { "type": "heading", "content": "Tips", "icon": "CheckCircle2" }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_tree() {
        let tree = ContentTree::from_json(SMALL).unwrap();
        assert_eq!(tree.len(), 2);

        let intro = tree.lesson(0).unwrap();
        assert_eq!(intro.short_title, "Intro");
        assert!(intro.sections.is_empty());
        assert_eq!(intro.blocks.len(), 2);
        assert!(matches!(
            intro.blocks[1],
            Block::Callout {
                style: BoxStyle::Blue,
                ..
            }
        ));

        let section = &tree.lesson(1).unwrap().sections[0];
        assert_eq!(section.content_type, ContentType::Knowledge);
        assert_eq!(section.blocks[0].items().len(), 1);
        assert_eq!(section.blocks[1].id(), None);
    }

    #[test]
    fn test_box_ids_are_not_bookmarkable() {
        let tree = ContentTree::from_json(SMALL).unwrap();
        let ids = tree.ids();
        assert!(ids.contains(&"intro-p1"));
        assert!(!ids.contains(&"intro-box"));
    }

    #[test]
    fn test_ids_in_document_order() {
        let tree = ContentTree::from_json(SMALL).unwrap();
        assert_eq!(
            tree.ids(),
            vec!["intro", "intro-p1", "day1", "day1-know", "day1-list", "day1-k-1"]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = SMALL.replace("\"day1-k-1\"", "\"intro-p1\"");
        let err = ContentTree::from_json(&json).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId(ref id) if id == "intro-p1"));
    }

    #[test]
    fn test_unknown_icon_rejected() {
        let json = SMALL.replace("\"Eye\"", "\"Telescope\"");
        assert!(matches!(
            ContentTree::from_json(&json),
            Err(ContentError::Parse(_))
        ));
    }

    #[test]
    fn test_lesson_index_bounds() {
        let tree = ContentTree::from_json(SMALL).unwrap();
        assert!(tree.is_valid_lesson_index(0));
        assert!(tree.is_valid_lesson_index(1));
        assert!(!tree.is_valid_lesson_index(2));
    }

    #[test]
    fn test_lesson_labels() {
        assert_eq!(lesson_label(0), "Intro");
        assert_eq!(lesson_label(3), "Lesson 3");
        assert_eq!(display_number(0), None);
        assert_eq!(display_number(1), Some(1));
    }

    #[test]
    fn test_bundled_guide_loads() {
        let tree = ContentTree::bundled().unwrap();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.lesson(0).unwrap().id, "intro");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ContentTree::load(Path::new("/nonexistent/guide.json")).unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }
}
