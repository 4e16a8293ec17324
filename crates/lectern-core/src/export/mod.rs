//! Annotation exports
//!
//! Two read-only projections of the same highlights and journal:
//!
//! - [`markdown`]: a Markdown document
//! - [`paged`]: a paginated, width-limited print layout
//!
//! Each call builds its artifact from scratch, so concurrent or repeated
//! exports never share buffers. Nothing about an export is persisted.

pub mod markdown;
pub mod paged;
mod wrap;

use std::fmt;
use std::str::FromStr;

use crate::annotations::AnnotationStore;

pub use markdown::to_markdown;
pub use paged::{Page, PageLayout, PagedDocument, PlacedLine, TextStyle};
pub use wrap::wrap_text;

/// Heading of the highlights section
pub const HIGHLIGHTS_HEADING: &str = "Highlights";
/// Heading of the journal section
pub const REFLECTIONS_HEADING: &str = "Reflections";

/// Export artifact kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Print,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Print => "txt",
        }
    }

    /// File name used when the caller does not pick one
    pub fn default_file_name(&self) -> String {
        format!("lectern-notes.{}", self.extension())
    }

    /// Render the annotations in this format
    pub fn render(&self, title: &str, annotations: &AnnotationStore) -> String {
        match self {
            ExportFormat::Markdown => {
                to_markdown(title, annotations.highlights(), annotations.journal())
            }
            ExportFormat::Print => PagedDocument::build(
                title,
                annotations.highlights(),
                annotations.journal(),
                &PageLayout::default(),
            )
            .to_text(),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Markdown => f.write_str("markdown"),
            ExportFormat::Print => f.write_str("print"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "print" | "pdf" | "txt" => Ok(ExportFormat::Print),
            other => Err(format!("Unknown export format '{}'", other)),
        }
    }
}
