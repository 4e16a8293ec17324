//! Bookmark command handlers

use anyhow::{bail, Result};

use lectern_core::Session;

use crate::output::Output;

/// Toggle a bookmark on any ID
pub fn toggle(session: &mut Session, id: String, output: &Output) -> Result<()> {
    let now_saved = session.toggle_bookmark(&id);

    let title = session
        .resolve(&id)
        .map(|summary| summary.title)
        .unwrap_or_else(|| id.clone());
    if now_saved {
        output.success(&format!("Bookmarked: {}", title));
    } else {
        output.success(&format!("Removed bookmark: {}", title));
    }
    super::warn_if_unsaved(session, output);
    Ok(())
}

/// List saved items, skipping bookmarks whose content is gone
pub fn list(session: &Session, output: &Output) -> Result<()> {
    output.print_saved_items(&session.saved_items());
    Ok(())
}

/// Show what a single ID refers to
pub fn show(session: &Session, id: String, output: &Output) -> Result<()> {
    let Some(summary) = session.resolve(&id) else {
        bail!("No content with ID '{}'", id);
    };
    output.print_summary(&summary, session.is_bookmarked(&id));
    Ok(())
}
