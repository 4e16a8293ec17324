//! Journal command handlers

use anyhow::{Context, Result};

use lectern_core::Session;

use crate::editor::{edit_journal, JournalEdit};
use crate::output::{Output, OutputFormat};

/// Print the journal
pub fn show(session: &Session, output: &Output) -> Result<()> {
    let journal = session.annotations().journal();
    match output.format {
        OutputFormat::Json => output.json(&serde_json::json!({ "journal": journal })),
        _ if journal.is_empty() => output.message("Your journal is empty."),
        _ => println!("{}", journal),
    }
    Ok(())
}

/// Replace the journal text
pub fn set(session: &mut Session, text: String, output: &Output) -> Result<()> {
    session.annotations_mut().set_journal(text);
    output.success("Journal saved");
    super::warn_if_unsaved(session, output);
    Ok(())
}

/// Edit the journal in $EDITOR
pub fn edit(session: &mut Session, output: &Output) -> Result<()> {
    let current = session.annotations().journal().to_string();
    match edit_journal(&current).context("Failed to edit journal")? {
        JournalEdit::Unchanged => output.message("No changes."),
        JournalEdit::Changed(edited) => {
            session.annotations_mut().set_journal(edited);
            output.success("Journal saved");
            super::warn_if_unsaved(session, output);
        }
    }
    Ok(())
}

/// Append text to the journal as a quote
pub fn append(session: &mut Session, text: String, output: &Output) -> Result<()> {
    session.annotations_mut().append_to_journal(&text);
    output.success("Added to journal");
    super::warn_if_unsaved(session, output);
    Ok(())
}
