//! Paginated print export
//!
//! Lays out the title, highlights and journal onto fixed-height pages. All
//! vertical measurements are in millimetres on an A4 page; widths are in
//! display columns.
//!
//! Rules:
//! - a body item that fits on a fresh page is never split
//! - an item taller than a page flows across pages line by line
//! - a section heading never sits alone at the bottom of a page

use serde::Serialize;

use crate::annotations::Highlight;

use super::wrap::wrap_text;
use super::{HIGHLIGHTS_HEADING, REFLECTIONS_HEADING};

/// Page geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLayout {
    pub page_height: u32,
    /// First line position on every page
    pub top: u32,
    /// No line may start below this position
    pub bottom: u32,
    pub line_height: u32,
    /// Extra space after each body item
    pub item_gap: u32,
    pub title_advance: u32,
    pub heading_advance: u32,
    /// Extra space after the highlights section
    pub section_gap: u32,
    /// Maximum line width in display columns
    pub columns: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_height: 297,
            top: 15,
            bottom: 280,
            line_height: 7,
            item_gap: 5,
            title_advance: 15,
            heading_advance: 10,
            section_gap: 10,
            columns: 90,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    Title,
    Heading,
    Body,
}

/// One line of text at a fixed vertical position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedLine {
    pub y: u32,
    pub style: TextStyle,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A laid-out export, ready to print or render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedDocument {
    pub layout: PageLayout,
    pub pages: Vec<Page>,
}

impl PagedDocument {
    /// Lay out `title`, `highlights` and `journal` with `layout`
    ///
    /// Highlights are quoted and the journal is split into paragraphs at
    /// blank lines. The highlights section is omitted when empty.
    pub fn build(
        title: &str,
        highlights: &[Highlight],
        journal: &str,
        layout: &PageLayout,
    ) -> Self {
        let mut paginator = Paginator::new(*layout);

        paginator.title(title);

        if !highlights.is_empty() {
            paginator.heading(HIGHLIGHTS_HEADING);
            for highlight in highlights {
                let quoted = format!("\"{}\"", highlight.text);
                let lines = wrap_lines(&quoted, layout.columns);
                paginator.item(lines);
            }
            paginator.advance(layout.section_gap);
        }

        paginator.heading(REFLECTIONS_HEADING);
        for paragraph in paragraphs(journal) {
            paginator.item(wrap_lines(&paragraph, layout.columns));
        }

        paginator.finish()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Plain-text rendering: one text line per placed line, vertical gaps
    /// larger than a line shown as blank lines, pages separated by form feeds
    pub fn to_text(&self) -> String {
        let rendered: Vec<String> = self
            .pages
            .iter()
            .map(|page| {
                let mut out = String::new();
                let mut last_y: Option<u32> = None;
                for line in &page.lines {
                    if let Some(prev) = last_y {
                        if line.y - prev > self.layout.line_height {
                            out.push('\n');
                        }
                    }
                    out.push_str(&line.text);
                    out.push('\n');
                    last_y = Some(line.y);
                }
                out
            })
            .collect();
        rendered.join("\u{000C}\n")
    }
}

/// Wrap every hard line of `text` separately
fn wrap_lines(text: &str, columns: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| wrap_text(line, columns))
        .collect()
}

/// Split the journal into paragraphs at blank lines
fn paragraphs(journal: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in journal.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

struct Paginator {
    layout: PageLayout,
    pages: Vec<Page>,
    current: Page,
    y: u32,
}

impl Paginator {
    fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            pages: Vec::new(),
            current: Page::default(),
            y: layout.top,
        }
    }

    fn at_top(&self) -> bool {
        self.y == self.layout.top
    }

    fn fits(&self, height: u32) -> bool {
        self.y + height <= self.layout.bottom
    }

    /// Usable height of a fresh page
    fn capacity(&self) -> u32 {
        self.layout.bottom.saturating_sub(self.layout.top)
    }

    fn new_page(&mut self) {
        let full = std::mem::take(&mut self.current);
        self.pages.push(full);
        self.y = self.layout.top;
    }

    fn place(&mut self, style: TextStyle, text: String) {
        self.current.lines.push(PlacedLine {
            y: self.y,
            style,
            text,
        });
    }

    fn advance(&mut self, by: u32) {
        self.y += by;
    }

    /// Title lines sit one line apart; the last one is followed by the title advance
    fn title(&mut self, title: &str) {
        let lines = wrap_text(title, self.layout.columns);
        let last = lines.len() - 1;
        for (n, line) in lines.into_iter().enumerate() {
            self.place(TextStyle::Title, line);
            if n < last {
                self.advance(self.layout.line_height);
            }
        }
        self.advance(self.layout.title_advance);
    }

    /// Place a heading, moving to a new page unless one body line fits below it
    fn heading(&mut self, text: &str) {
        let needed = self.layout.heading_advance + self.layout.line_height;
        if !self.at_top() && !self.fits(needed) {
            self.new_page();
        }
        self.place(TextStyle::Heading, text.to_string());
        self.advance(self.layout.heading_advance);
    }

    /// Place a body item, keeping it on one page whenever it can fit on one
    fn item(&mut self, lines: Vec<String>) {
        let height = lines.len() as u32 * self.layout.line_height;
        if !self.at_top() && !self.fits(height) && height <= self.capacity() {
            self.new_page();
        }
        for line in lines {
            if !self.at_top() && !self.fits(self.layout.line_height) {
                self.new_page();
            }
            self.place(TextStyle::Body, line);
            self.advance(self.layout.line_height);
        }
        self.advance(self.layout.item_gap);
    }

    fn finish(mut self) -> PagedDocument {
        if !self.current.is_empty() {
            self.pages.push(self.current);
        }
        PagedDocument {
            layout: self.layout,
            pages: self.pages,
        }
    }
}
