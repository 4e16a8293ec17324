//! Lesson command handlers

use anyhow::{anyhow, bail, Result};

use lectern_core::{Session, StepCursor};

use crate::output::{Output, OutputFormat};
use crate::render::render_lesson;

/// List every lesson
pub fn list(session: &Session, output: &Output) -> Result<()> {
    output.print_lesson_cards(&session.lesson_cards());
    Ok(())
}

/// Render one lesson
pub fn read(session: &Session, index: usize, output: &Output) -> Result<()> {
    if !session.is_valid_lesson_index(index) {
        bail!(
            "Lesson {} not found. Lessons run from 0 to {}.",
            index,
            session.tree().len().saturating_sub(1)
        );
    }
    let lesson = session
        .tree()
        .lesson(index)
        .ok_or_else(|| anyhow!("Lesson {} not found", index))?;

    match output.format {
        OutputFormat::Human => {
            print!("{}", render_lesson(index, lesson, |id| session.is_bookmarked(id)));
            let cursor = session.cursor(index);
            println!();
            println!(
                "Step {} of {} ({}%)",
                cursor.current + 1,
                cursor.total,
                cursor.progress_percent()
            );
            for hint in step_hints(session, cursor) {
                println!("{}", hint);
            }
        }
        OutputFormat::Json => output.json(lesson),
        OutputFormat::Quiet => println!("{}", lesson.id),
    }
    Ok(())
}

/// "Previous" / "Next" lines pointing at the neighbouring steps
fn step_hints(session: &Session, cursor: StepCursor) -> Vec<String> {
    let mut hints = Vec::new();
    let neighbours: [(&str, fn(&mut StepCursor) -> bool); 2] =
        [("Previous", StepCursor::prev), ("Next", StepCursor::next)];

    for (label, step) in neighbours {
        let mut moved = cursor;
        if !step(&mut moved) {
            continue;
        }
        if let Some(lesson) = session.tree().lesson(moved.current) {
            hints.push(format!(
                "{}: lectern read {}  ({})",
                label, moved.current, lesson.short_title
            ));
        }
    }
    hints
}

/// Show the learning plan from `step`
pub fn plan(session: &Session, step: usize, output: &Output) -> Result<()> {
    let cursor = session.cursor(step);
    output.print_plan(&cursor, &session.plan(cursor.current));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let store = std::sync::Arc::new(lectern_core::MemoryStore::new());
        Session::with_store(lectern_core::ContentTree::bundled().unwrap(), store)
    }

    #[test]
    fn test_step_hints_at_start() {
        let session = session();
        let hints = step_hints(&session, session.cursor(0));
        assert_eq!(hints.len(), 1);
        assert!(hints[0].starts_with("Next: lectern read 1"));
    }

    #[test]
    fn test_step_hints_in_middle_and_end() {
        let session = session();
        let hints = step_hints(&session, session.cursor(1));
        assert_eq!(hints.len(), 2);
        assert!(hints[0].starts_with("Previous: lectern read 0"));
        assert!(hints[1].starts_with("Next: lectern read 2"));

        let last = session.tree().len() - 1;
        let hints = step_hints(&session, session.cursor(last));
        let previous = session.tree().lesson(last - 1).unwrap();
        let expected = format!(
            "Previous: lectern read {}  ({})",
            last - 1,
            previous.short_title
        );
        assert_eq!(hints, [expected]);
    }
}
