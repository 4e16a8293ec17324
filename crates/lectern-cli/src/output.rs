//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use lectern_core::content::html_to_text;
use lectern_core::{FlatItem, Highlight, LessonCard, PlanDay, SavedItemSummary, StepCursor};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode output: {}", e),
        }
    }

    /// Print the lesson overview
    pub fn print_lesson_cards(&self, cards: &[LessonCard]) {
        match self.format {
            OutputFormat::Human => {
                for card in cards {
                    println!(
                        "{:>2}  {:<9} {}{}",
                        card.index,
                        card.label,
                        card.short_title,
                        bookmark_marker(card.bookmarked)
                    );
                    if !card.description.is_empty() {
                        println!("             {}", truncate(&card.description, 64));
                    }
                }
            }
            OutputFormat::Json => self.json(cards),
            OutputFormat::Quiet => {
                for card in cards {
                    println!("{}", card.id);
                }
            }
        }
    }

    /// Print bookmarked items that still resolve
    pub fn print_saved_items(&self, items: &[SavedItemSummary]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No saved items yet. Bookmark something with `lectern bookmark toggle <id>`.");
                    return;
                }
                for item in items {
                    println!("[{}] {} ({})", item.label, item.title, item.id);
                    let snippet = html_to_text(&item.snippet);
                    if !snippet.is_empty() {
                        println!("    {}", truncate(&snippet, 72));
                    }
                }
                println!("\n{} saved item(s)", items.len());
            }
            OutputFormat::Json => self.json(items),
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print a single resolved item
    pub fn print_summary(&self, item: &SavedItemSummary, bookmarked: bool) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", item.id);
                println!("Label:   {}", item.label);
                println!("Title:   {}", item.title);
                println!("Lesson:  {}", item.lesson_index);
                println!("Icon:    {}", item.icon);
                println!("Saved:   {}", if bookmarked { "yes" } else { "no" });
                let snippet = html_to_text(&item.snippet);
                if !snippet.is_empty() {
                    println!();
                    println!("{}", snippet);
                }
            }
            OutputFormat::Json => self.json(item),
            OutputFormat::Quiet => println!("{}", item.lesson_index),
        }
    }

    /// Print one browse category; `is_saved` marks bookmarked items
    pub fn print_flat_items(
        &self,
        heading: &str,
        items: &[FlatItem],
        is_saved: impl Fn(&str) -> bool,
    ) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", heading);
                println!("{}", "=".repeat(heading.chars().count()));
                if items.is_empty() {
                    println!("Nothing in this category yet.");
                    return;
                }
                let mut current_lesson = None;
                for item in items {
                    if current_lesson != Some(item.lesson_index) {
                        println!();
                        println!("{} / {}", item.lesson_title, item.section_title);
                        current_lesson = Some(item.lesson_index);
                    }
                    let marker = item
                        .id
                        .as_deref()
                        .map(|id| bookmark_marker(is_saved(id)))
                        .unwrap_or("");
                    println!("  - {}{}", html_to_text(&item.content), marker);
                    if let Some(ref id) = item.id {
                        println!("    ({})", id);
                    }
                }
                println!("\n{} item(s)", items.len());
            }
            OutputFormat::Json => self.json(items),
            OutputFormat::Quiet => {
                for item in items {
                    if let Some(ref id) = item.id {
                        println!("{}", id);
                    }
                }
            }
        }
    }

    /// Print the learning plan
    pub fn print_plan(&self, cursor: &StepCursor, days: &[PlanDay]) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "Step {} of {} ({}% complete)",
                    cursor.current + 1,
                    cursor.total,
                    cursor.progress_percent()
                );
                println!();
                for day in days {
                    let check = if day.completed { "x" } else { " " };
                    println!(
                        "[{}] Day {}: {}{}",
                        check,
                        day.day,
                        day.title,
                        bookmark_marker(day.bookmarked)
                    );
                    if !day.description.is_empty() {
                        println!("        {}", truncate(&day.description, 68));
                    }
                }
            }
            OutputFormat::Json => self.json(&serde_json::json!({
                "cursor": cursor,
                "progress_percent": cursor.progress_percent(),
                "days": days,
            })),
            OutputFormat::Quiet => println!("{}", cursor.progress_percent()),
        }
    }

    /// Print captured highlights
    pub fn print_highlights(&self, highlights: &[Highlight]) {
        match self.format {
            OutputFormat::Human => {
                if highlights.is_empty() {
                    println!("No highlights yet.");
                    return;
                }
                for highlight in highlights {
                    println!(
                        "{}  [{}]",
                        highlight.id,
                        highlight.created_at.format("%Y-%m-%d %H:%M")
                    );
                    println!("  \"{}\"", truncate_line(&highlight.text, 72));
                }
                println!("\n{} highlight(s)", highlights.len());
            }
            OutputFormat::Json => self.json(highlights),
            OutputFormat::Quiet => {
                for highlight in highlights {
                    println!("{}", highlight.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr; suppressed in quiet mode
    pub fn warning(&self, msg: &str) {
        if !self.is_quiet() {
            eprintln!("Warning: {}", msg);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn bookmark_marker(bookmarked: bool) -> &'static str {
    if bookmarked {
        " ★"
    } else {
        ""
    }
}

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
pub fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
