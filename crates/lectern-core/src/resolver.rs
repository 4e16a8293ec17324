//! ID resolution
//!
//! Turns an opaque bookmark ID back into a renderable summary of the node
//! it names. Lesson IDs are checked across the whole tree first. Then,
//! lesson by lesson:
//!
//! 1. section IDs
//! 2. section content (block IDs of a section, then its list items)
//! 3. intro content (the lesson's own blocks, then their list items)
//!
//! The first hit wins. With unique IDs only one node can match, but the
//! order is kept fixed so results stay deterministic for any tree.

use serde::Serialize;

use crate::content::{Block, ContentTree, Icon, Lesson};

/// Structural level of a resolved node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lesson,
    Section,
    Block,
    Item,
}

/// Human-facing category of a saved item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryLabel {
    FullLesson,
    Section,
    SavedContent,
    SavedItem,
    IntroContent,
    IntroItem,
}

impl SummaryLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLabel::FullLesson => "Full Lesson",
            SummaryLabel::Section => "Section",
            SummaryLabel::SavedContent => "Saved Content",
            SummaryLabel::SavedItem => "Saved Item",
            SummaryLabel::IntroContent => "Intro Content",
            SummaryLabel::IntroItem => "Intro Item",
        }
    }
}

impl std::fmt::Display for SummaryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform description of any bookmarkable node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedItemSummary {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    /// Descriptive text; HTML-bearing for blocks and items
    pub snippet: String,
    pub label: SummaryLabel,
    /// Lesson to navigate to
    pub lesson_index: usize,
    pub icon: Icon,
}

/// One level of the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    LessonIds,
    SectionIds,
    SectionContent,
    IntroContent,
}

/// Order of the per-lesson levels, run after the tree-wide lesson ID pass
const LESSON_ORDER: [Level; 3] = [
    Level::SectionIds,
    Level::SectionContent,
    Level::IntroContent,
];

/// Resolve an ID to its summary; `None` when nothing in the tree carries it
pub fn resolve(tree: &ContentTree, id: &str) -> Option<SavedItemSummary> {
    let lessons = || tree.lessons().iter().enumerate();

    lessons()
        .find_map(|(index, lesson)| match_level(Level::LessonIds, lesson, index, id))
        .or_else(|| {
            lessons().find_map(|(index, lesson)| {
                LESSON_ORDER
                    .iter()
                    .find_map(|level| match_level(*level, lesson, index, id))
            })
        })
}

/// The lesson index a bookmark ID navigates to
pub fn lesson_link(tree: &ContentTree, id: &str) -> Option<usize> {
    resolve(tree, id).map(|summary| summary.lesson_index)
}

fn match_level(
    level: Level,
    lesson: &Lesson,
    lesson_index: usize,
    id: &str,
) -> Option<SavedItemSummary> {
    match level {
        Level::LessonIds => (lesson.id == id).then(|| SavedItemSummary {
            id: id.to_string(),
            kind: ItemKind::Lesson,
            title: lesson.title.clone(),
            snippet: lesson.description.clone(),
            label: SummaryLabel::FullLesson,
            lesson_index,
            icon: lesson.icon,
        }),
        Level::SectionIds => lesson
            .sections
            .iter()
            .find(|s| s.id.as_deref() == Some(id))
            .map(|section| SavedItemSummary {
                id: id.to_string(),
                kind: ItemKind::Section,
                title: section.title.clone(),
                snippet: format!("From: {}", lesson.title),
                label: SummaryLabel::Section,
                lesson_index,
                icon: section.icon,
            }),
        Level::SectionContent => lesson.sections.iter().find_map(|section| {
            find_in_blocks(&section.blocks, id).map(|hit| {
                hit.into_summary(
                    id,
                    &section.title,
                    lesson_index,
                    (SummaryLabel::SavedContent, Icon::Bookmark),
                    (SummaryLabel::SavedItem, Icon::CheckSquare),
                )
            })
        }),
        Level::IntroContent => find_in_blocks(&lesson.blocks, id).map(|hit| {
            hit.into_summary(
                id,
                &lesson.title,
                lesson_index,
                (SummaryLabel::IntroContent, Icon::Info),
                (SummaryLabel::IntroItem, Icon::Info),
            )
        }),
    }
}

enum BlockHit<'a> {
    Block(&'a Block),
    Item(&'a str),
}

impl BlockHit<'_> {
    fn into_summary(
        self,
        id: &str,
        title: &str,
        lesson_index: usize,
        block_style: (SummaryLabel, Icon),
        item_style: (SummaryLabel, Icon),
    ) -> SavedItemSummary {
        let (kind, snippet, (label, icon)) = match self {
            BlockHit::Block(block) => (ItemKind::Block, block.snippet(), block_style),
            BlockHit::Item(content) => (ItemKind::Item, content, item_style),
        };
        SavedItemSummary {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            snippet: snippet.to_string(),
            label,
            lesson_index,
            icon,
        }
    }
}

/// Block IDs first, then list items block by block
fn find_in_blocks<'a>(blocks: &'a [Block], id: &str) -> Option<BlockHit<'a>> {
    if let Some(block) = blocks.iter().find(|b| b.id() == Some(id)) {
        return Some(BlockHit::Block(block));
    }
    blocks
        .iter()
        .flat_map(|b| b.items())
        .find(|item| item.id == id)
        .map(|item| BlockHit::Item(item.content.as_str()))
}
