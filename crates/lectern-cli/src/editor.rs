//! Journal editing and confirmation prompts
//!
//! `journal edit` hands the journal to the user's editor through a draft
//! file. The draft is removed when editing finishes, except when the editor
//! fails after the draft was changed: then the draft is kept so the text is
//! not lost, and its path is reported.

use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

#[cfg(windows)]
const FALLBACK_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const FALLBACK_EDITOR: &str = "vi";

/// Result of an editing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEdit {
    Unchanged,
    Changed(String),
}

/// The editor command line: program plus leading arguments
#[derive(Debug, Clone, PartialEq, Eq)]
struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    /// Parse a `$VISUAL` / `$EDITOR` value such as `code --wait`
    fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// `$VISUAL`, then `$EDITOR`, then the platform default
    fn from_env() -> Self {
        ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find_map(|value| Self::parse(&value))
            .unwrap_or_else(|| Self {
                program: FALLBACK_EDITOR.to_string(),
                args: Vec::new(),
            })
    }
}

/// Let the user edit `journal` in their editor
pub fn edit_journal(journal: &str) -> Result<JournalEdit> {
    let editor = EditorCommand::from_env();

    let mut draft = tempfile::Builder::new()
        .prefix("lectern-journal-")
        .suffix(".md")
        .tempfile()
        .context("Failed to create journal draft")?;
    draft
        .write_all(journal.as_bytes())
        .and_then(|_| draft.flush())
        .context("Failed to write journal draft")?;

    debug!("Editing journal with {} in {:?}", editor.program, draft.path());
    let status = Command::new(&editor.program)
        .args(&editor.args)
        .arg(draft.path())
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor.program))?;

    let edited = fs::read_to_string(draft.path())
        .map(|text| trim_editor_newline(journal, text))
        .context("Failed to read journal draft")?;

    if !status.success() {
        if edited == journal {
            return Err(anyhow!(
                "Editor '{}' exited with {}. Your journal was not changed.",
                editor.program,
                status
            ));
        }
        let kept = keep_draft(draft)?;
        return Err(anyhow!(
            "Editor '{}' exited with {}. Your journal was not changed; \
             the draft was kept at {}",
            editor.program,
            status,
            kept.display()
        ));
    }

    if edited == journal {
        Ok(JournalEdit::Unchanged)
    } else {
        Ok(JournalEdit::Changed(edited))
    }
}

fn keep_draft(draft: NamedTempFile) -> Result<PathBuf> {
    let (_, path) = draft.keep().context("Failed to keep journal draft")?;
    Ok(path)
}

/// Drop the single trailing newline most editors add on save
fn trim_editor_newline(original: &str, mut edited: String) -> String {
    if !original.ends_with('\n') && edited.ends_with('\n') {
        edited.pop();
        if edited.ends_with('\r') {
            edited.pop();
        }
    }
    edited
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
