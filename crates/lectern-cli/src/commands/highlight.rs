//! Highlight command handlers

use anyhow::{anyhow, bail, Result};

use lectern_core::{Marking, ScreenPoint, Selection, SelectionCapture, Session};

use crate::editor::confirm;
use crate::output::{truncate_line, Output, OutputFormat};
use crate::render::BlockAnchor;

/// Capture `text` as a highlight, marking it in `lesson` when given
pub fn add(
    session: &mut Session,
    text: String,
    lesson: Option<usize>,
    output: &Output,
) -> Result<()> {
    let mut anchor = match lesson {
        Some(index) => {
            let lesson = session
                .tree()
                .lesson(index)
                .filter(|_| session.is_valid_lesson_index(index))
                .ok_or_else(|| anyhow!("Lesson {} not found", index))?;
            BlockAnchor::in_lesson(&text, lesson)
        }
        None => BlockAnchor::detached(&text),
    };

    let outcome = {
        let mut capture = SelectionCapture::new();
        let selection = Selection {
            anchor: &mut anchor,
            collapsed: text.trim().is_empty(),
            in_content: true,
            position: ScreenPoint::default(),
        };
        if !capture.pointer_released(Some(selection), false) {
            bail!("Nothing to highlight: the selected text is empty");
        }
        capture
            .confirm(session.annotations_mut())
            .ok_or_else(|| anyhow!("No selection was pending"))?
    };

    let reason = match &outcome.marking {
        Marking::Applied => None,
        Marking::Skipped(failure) => Some(failure.reason.clone()),
    };

    match output.format {
        OutputFormat::Json => output.json(&serde_json::json!({
            "highlight": outcome.highlight,
            "marked": outcome.is_marked(),
            "marking_skipped": reason,
        })),
        OutputFormat::Quiet => println!("{}", outcome.highlight.id),
        OutputFormat::Human => {
            output.success(&format!(
                "Saved highlight {}: \"{}\"",
                outcome.highlight.id,
                truncate_line(&outcome.highlight.text, 50)
            ));
            match (anchor.marked_excerpt(), reason) {
                (Some(excerpt), _) => println!("  {}", excerpt),
                (None, Some(reason)) if lesson.is_some() => {
                    println!("  (Not marked in the lesson: {})", reason)
                }
                _ => {}
            }
        }
    }
    super::warn_if_unsaved(session, output);
    Ok(())
}

/// List highlights, most recent last
pub fn list(session: &Session, output: &Output) -> Result<()> {
    output.print_highlights(session.annotations().highlights());
    Ok(())
}

/// Delete a highlight
pub fn delete(session: &mut Session, id: String, output: &Output) -> Result<()> {
    let highlight = session
        .annotations()
        .highlight(&id)
        .cloned()
        .ok_or_else(|| anyhow!("Highlight not found: {}", id))?;

    if output.should_prompt() {
        println!("Delete highlight: \"{}\"", truncate_line(&highlight.text, 60));
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    session.annotations_mut().delete_highlight(&id);
    output.success(&format!("Deleted highlight: {}", id));
    super::warn_if_unsaved(session, output);
    Ok(())
}

/// Append a highlight to the journal as a quote
pub fn copy(session: &mut Session, id: String, output: &Output) -> Result<()> {
    if !session.annotations_mut().copy_highlight_to_journal(&id) {
        bail!("Highlight not found: {}", id);
    }
    output.success("Copied highlight to journal");
    super::warn_if_unsaved(session, output);
    Ok(())
}
