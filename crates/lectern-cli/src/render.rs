//! Plain-text lesson rendering
//!
//! A lesson is rendered as a sequence of text blocks, one per content block
//! (list items get one block each). The same blocks back [`BlockAnchor`],
//! which marks a selection in place when it falls inside a single block.

use lectern_core::content::{html_to_text, lesson_label, Block, BoxStyle, Lesson};
use lectern_core::{MarkingFailure, TextAnchor};

/// Opening and closing marks placed around highlighted text
const MARK_OPEN: &str = "«";
const MARK_CLOSE: &str = "»";

/// One rendered block of a lesson
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    /// Bookmarkable ID, when the block has one
    pub id: Option<String>,
    /// Text prefix such as a bullet or quote bar
    pub prefix: String,
    pub text: String,
}

impl RenderedBlock {
    fn new(id: Option<&str>, prefix: impl Into<String>, html: &str) -> Self {
        Self {
            id: id.map(String::from),
            prefix: prefix.into(),
            text: html_to_text(html),
        }
    }
}

/// Render `lesson` into blocks in reading order
pub fn render_blocks(lesson: &Lesson) -> Vec<RenderedBlock> {
    let mut out = Vec::new();
    push_blocks(&mut out, &lesson.blocks);

    for section in &lesson.sections {
        out.push(RenderedBlock {
            id: section.id.clone(),
            prefix: "## ".to_string(),
            text: section.title.clone(),
        });
        push_blocks(&mut out, &section.blocks);
    }
    out
}

fn push_blocks(out: &mut Vec<RenderedBlock>, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Paragraph { id, content } => {
                if !content.is_empty() {
                    out.push(RenderedBlock::new(id.as_deref(), "", content));
                }
            }
            Block::List { ordered, items, .. } => {
                for (n, item) in items.iter().enumerate() {
                    let bullet = if *ordered {
                        format!("{}. ", n + 1)
                    } else {
                        "- ".to_string()
                    };
                    out.push(RenderedBlock::new(Some(&item.id), bullet, &item.content));
                }
            }
            Block::Blockquote { content } => out.push(RenderedBlock::new(None, "> ", content)),
            Block::Callout { style, content } => {
                let bar = match style {
                    BoxStyle::Blue => "┃ ",
                    BoxStyle::Plain => "│ ",
                };
                out.push(RenderedBlock::new(None, bar, content));
            }
            Block::Heading { content, .. } => out.push(RenderedBlock::new(None, "### ", content)),
        }
    }
}

/// Full lesson text with bookmark markers
pub fn render_lesson(index: usize, lesson: &Lesson, is_saved: impl Fn(&str) -> bool) -> String {
    let mut out = String::new();
    let heading = format!("{}: {}", lesson_label(index), lesson.title);
    out.push_str(&heading);
    if is_saved(&lesson.id) {
        out.push_str(" ★");
    }
    out.push('\n');
    out.push_str(&"=".repeat(heading.chars().count()));
    out.push_str("\n\n");
    if !lesson.description.is_empty() {
        out.push_str(&lesson.description);
        out.push_str("\n\n");
    }

    for block in render_blocks(lesson) {
        if block.prefix == "## " {
            out.push('\n');
        }
        out.push_str(&block.prefix);
        out.push_str(&block.text);
        if let Some(ref id) = block.id {
            let marker = if is_saved(id) { "★" } else { "☆" };
            out.push_str(&format!("  {} {}", marker, id));
        }
        out.push('\n');
    }
    out
}

/// A selection over the rendered text of one lesson
#[derive(Debug, Clone)]
pub struct BlockAnchor {
    text: String,
    blocks: Vec<RenderedBlock>,
    marked: Option<usize>,
}

impl BlockAnchor {
    /// A selection of `text` within `lesson`
    pub fn in_lesson(text: &str, lesson: &Lesson) -> Self {
        Self {
            text: text.to_string(),
            blocks: render_blocks(lesson),
            marked: None,
        }
    }

    /// A selection with no rendered lesson behind it; it can never be marked
    pub fn detached(text: &str) -> Self {
        Self {
            text: text.to_string(),
            blocks: Vec::new(),
            marked: None,
        }
    }

    /// The marked block with the selection wrapped in marks
    pub fn marked_excerpt(&self) -> Option<String> {
        let block = &self.blocks[self.marked?];
        let needle = self.text.trim();
        Some(block.text.replacen(
            needle,
            &format!("{}{}{}", MARK_OPEN, needle, MARK_CLOSE),
            1,
        ))
    }
}

impl TextAnchor for BlockAnchor {
    fn selected_text(&self) -> String {
        self.text.clone()
    }

    fn try_mark(&mut self) -> Result<(), MarkingFailure> {
        if self.blocks.is_empty() {
            return Err(MarkingFailure::new("no lesson text to mark"));
        }
        let needle = self.text.trim();
        match self.blocks.iter().position(|b| b.text.contains(needle)) {
            Some(index) => {
                self.marked = Some(index);
                Ok(())
            }
            None => Err(MarkingFailure::new(
                "selection is not contained in a single block",
            )),
        }
    }
}
