//! Category browsing
//!
//! Flattens the content tree into the individual items of one category,
//! ignoring lesson boundaries. Knowledge and activity sections contribute
//! their list items; resource sections contribute their non-empty
//! paragraphs. Output follows document order exactly.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::content::{Block, ContentTree, ContentType};

/// Categories that can be browsed; general sections never are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowseCategory {
    Knowledge,
    Activity,
    Resource,
}

impl BrowseCategory {
    pub const ALL: [BrowseCategory; 3] = [
        BrowseCategory::Activity,
        BrowseCategory::Knowledge,
        BrowseCategory::Resource,
    ];

    pub fn content_type(&self) -> ContentType {
        match self {
            BrowseCategory::Knowledge => ContentType::Knowledge,
            BrowseCategory::Activity => ContentType::Activity,
            BrowseCategory::Resource => ContentType::Resource,
        }
    }

    /// Heading used when listing the category
    pub fn title(&self) -> &'static str {
        match self {
            BrowseCategory::Activity => "Activity Checklist",
            BrowseCategory::Knowledge => "Knowledge Base",
            BrowseCategory::Resource => "Reading List",
        }
    }
}

impl fmt::Display for BrowseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type().as_str())
    }
}

impl FromStr for BrowseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "knowledge" => Ok(BrowseCategory::Knowledge),
            "activity" => Ok(BrowseCategory::Activity),
            "resource" => Ok(BrowseCategory::Resource),
            other => Err(format!(
                "Unknown category '{}'. Use knowledge, activity or resource.",
                other
            )),
        }
    }
}

/// Where a flattened item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlatItemKind {
    ListItem,
    Paragraph,
}

/// A leaf of the content tree annotated with its position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatItem {
    /// Bookmarkable ID; `None` means bookmarking is unavailable for this item
    pub id: Option<String>,
    pub kind: FlatItemKind,
    /// HTML fragment
    pub content: String,
    pub lesson_title: String,
    pub lesson_index: usize,
    pub section_title: String,
    /// ID of the enclosing block, if it has one
    pub block_id: Option<String>,
}

impl FlatItem {
    pub fn is_bookmarkable(&self) -> bool {
        self.id.is_some()
    }
}

/// Project every item of `category` out of the tree, in document order
pub fn flatten(tree: &ContentTree, category: BrowseCategory) -> Vec<FlatItem> {
    let wanted = category.content_type();
    let mut out = Vec::new();

    for (lesson_index, lesson) in tree.lessons().iter().enumerate() {
        for section in lesson.sections.iter().filter(|s| s.content_type == wanted) {
            for block in &section.blocks {
                let item = |id: Option<&str>, kind: FlatItemKind, content: &str| FlatItem {
                    id: id.map(String::from),
                    kind,
                    content: content.to_string(),
                    lesson_title: lesson.title.clone(),
                    lesson_index,
                    section_title: section.title.clone(),
                    block_id: block.id().map(String::from),
                };

                match (category, block) {
                    (
                        BrowseCategory::Knowledge | BrowseCategory::Activity,
                        Block::List { items, .. },
                    ) => {
                        out.extend(items.iter().map(|li| {
                            item(Some(li.id.as_str()), FlatItemKind::ListItem, &li.content)
                        }));
                    }
                    (BrowseCategory::Resource, Block::Paragraph { id, content })
                        if !content.is_empty() =>
                    {
                        out.push(item(id.as_deref(), FlatItemKind::Paragraph, content));
                    }
                    _ => {}
                }
            }
        }
    }

    out
}
