//! Selection capture
//!
//! Turns a reader's text selection into a highlight. Two states:
//!
//! ```text
//!            release with text in content
//!   Idle ─────────────────────────────────▶ Pending(candidate)
//!    ▲                                          │
//!    │   confirm (commit + try to mark)         │
//!    └──────────────────────────────────────────┤
//!    │   selection cleared elsewhere            │
//!    └──────────────────────────────────────────┘
//! ```
//!
//! The selected range itself is opaque: front ends supply a [`TextAnchor`]
//! that knows how to report its text and attempt an in-place visual mark.
//! Marking is cosmetic. If it fails the highlight is still committed.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::annotations::{AnnotationStore, Highlight};

/// Visual marking of a selection could not be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not mark selection: {reason}")]
pub struct MarkingFailure {
    pub reason: String,
}

impl MarkingFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Handle to a selected range of rendered text
pub trait TextAnchor {
    /// The selected text as the reader sees it
    fn selected_text(&self) -> String;

    /// Wrap the range in a visual mark, in place
    fn try_mark(&mut self) -> Result<(), MarkingFailure>;
}

impl<T: TextAnchor + ?Sized> TextAnchor for &mut T {
    fn selected_text(&self) -> String {
        (**self).selected_text()
    }

    fn try_mark(&mut self) -> Result<(), MarkingFailure> {
        (**self).try_mark()
    }
}

/// Screen position used to place the confirm control; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// What the front end observed when the pointer was released
pub struct Selection<A> {
    pub anchor: A,
    /// The selection is empty or collapsed to a caret
    pub collapsed: bool,
    /// The selection's anchor point lies inside the content region
    pub in_content: bool,
    pub position: ScreenPoint,
}

/// A selection waiting for the reader to confirm
pub struct Candidate<A> {
    pub text: String,
    pub anchor: A,
    pub position: ScreenPoint,
}

impl<A> fmt::Debug for Candidate<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("text", &self.text)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Whether the cosmetic mark made it onto the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marking {
    Applied,
    Skipped(MarkingFailure),
}

/// Result of confirming a candidate
#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub highlight: Highlight,
    pub marking: Marking,
}

impl CommitOutcome {
    pub fn is_marked(&self) -> bool {
        matches!(self.marking, Marking::Applied)
    }
}

/// Selection state machine; at most one candidate is pending
pub struct SelectionCapture<A> {
    pending: Option<Candidate<A>>,
}

impl<A: TextAnchor> SelectionCapture<A> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn pending(&self) -> Option<&Candidate<A>> {
        self.pending.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Handle the end of a pointer gesture
    ///
    /// `on_confirm_control` is true when the release landed on the confirm
    /// control itself; that click must not discard the candidate it is about
    /// to confirm. Returns whether a candidate is pending afterwards.
    pub fn pointer_released(
        &mut self,
        selection: Option<Selection<A>>,
        on_confirm_control: bool,
    ) -> bool {
        let selection = match selection {
            Some(selection) if !selection.collapsed => selection,
            _ => {
                if !on_confirm_control && self.pending.take().is_some() {
                    debug!("Selection cleared, candidate discarded");
                }
                return self.pending.is_some();
            }
        };

        if !selection.in_content {
            return self.pending.is_some();
        }

        let text = selection.anchor.selected_text().trim().to_string();
        if text.is_empty() {
            return self.pending.is_some();
        }

        debug!(len = text.len(), "Selection candidate pending");
        self.pending = Some(Candidate {
            text,
            anchor: selection.anchor,
            position: selection.position,
        });
        true
    }

    /// Discard the pending candidate without saving anything
    pub fn dismiss(&mut self) -> Option<Candidate<A>> {
        self.pending.take()
    }

    /// Commit the pending candidate as a highlight and try to mark it
    ///
    /// Returns `None` when nothing was pending.
    pub fn confirm(&mut self, annotations: &mut AnnotationStore) -> Option<CommitOutcome> {
        let Candidate {
            text, mut anchor, ..
        } = self.pending.take()?;

        let highlight = annotations.add_highlight(&text);
        let marking = match anchor.try_mark() {
            Ok(()) => Marking::Applied,
            Err(failure) => {
                warn!(%failure, "Saved highlight without marking it");
                Marking::Skipped(failure)
            }
        };

        Some(CommitOutcome { highlight, marking })
    }
}

impl<A: TextAnchor> Default for SelectionCapture<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageKey};
    use std::sync::Arc;

    #[derive(Debug)]
    struct FakeAnchor {
        text: String,
        markable: bool,
        marked: bool,
    }

    impl TextAnchor for FakeAnchor {
        fn selected_text(&self) -> String {
            self.text.clone()
        }

        fn try_mark(&mut self) -> Result<(), MarkingFailure> {
            if self.markable {
                self.marked = true;
                Ok(())
            } else {
                Err(MarkingFailure::new("selection crosses a block boundary"))
            }
        }
    }

    fn selection(text: &str, markable: bool) -> Selection<FakeAnchor> {
        Selection {
            anchor: FakeAnchor {
                text: text.to_string(),
                markable,
                marked: false,
            },
            collapsed: false,
            in_content: true,
            position: ScreenPoint { x: 10.0, y: 20.0 },
        }
    }

    fn annotations() -> AnnotationStore {
        AnnotationStore::load(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_release_with_selection_creates_candidate() {
        let mut capture = SelectionCapture::new();
        assert!(capture.pointer_released(Some(selection("  some words  ", true)), false));

        let pending = capture.pending().unwrap();
        assert_eq!(pending.text, "some words");
        assert_eq!(pending.position, ScreenPoint { x: 10.0, y: 20.0 });
    }

    #[test]
    fn test_selection_outside_content_ignored() {
        let mut capture = SelectionCapture::new();
        let mut outside = selection("header text", true);
        outside.in_content = false;

        assert!(!capture.pointer_released(Some(outside), false));
        assert!(capture.is_idle());
    }

    #[test]
    fn test_whitespace_selection_ignored() {
        let mut capture = SelectionCapture::new();
        assert!(!capture.pointer_released(Some(selection(" \n\t ", true)), false));
    }

    #[test]
    fn test_collapsed_release_discards_candidate() {
        let mut capture = SelectionCapture::new();
        capture.pointer_released(Some(selection("words", true)), false);

        let mut collapsed = selection("", true);
        collapsed.collapsed = true;
        assert!(!capture.pointer_released(Some(collapsed), false));
        assert!(capture.is_idle());
    }

    #[test]
    fn test_release_on_confirm_control_keeps_candidate() {
        let mut capture = SelectionCapture::new();
        capture.pointer_released(Some(selection("words", true)), false);

        assert!(capture.pointer_released(None, true));
        assert_eq!(capture.pending().unwrap().text, "words");
    }

    #[test]
    fn test_new_selection_replaces_pending() {
        let mut capture = SelectionCapture::new();
        capture.pointer_released(Some(selection("first", true)), false);
        capture.pointer_released(Some(selection("second", true)), false);
        assert_eq!(capture.pending().unwrap().text, "second");
    }

    #[test]
    fn test_confirm_commits_and_marks() {
        let mut capture = SelectionCapture::new();
        let mut notes = annotations();
        capture.pointer_released(Some(selection("important", true)), false);

        let outcome = capture.confirm(&mut notes).unwrap();
        assert!(outcome.is_marked());
        assert_eq!(outcome.highlight.text, "important");
        assert_eq!(notes.highlights().len(), 1);
        assert!(capture.is_idle());
    }

    #[test]
    fn test_marking_failure_still_commits() {
        let mut capture = SelectionCapture::new();
        let mut notes = annotations();
        capture.pointer_released(Some(selection("across blocks", false)), false);

        let outcome = capture.confirm(&mut notes).unwrap();
        assert!(matches!(outcome.marking, Marking::Skipped(_)));
        assert_eq!(notes.highlights().len(), 1);
        assert_eq!(notes.highlights()[0].text, "across blocks");
        assert!(notes.highlights()[0].created_at <= chrono::Utc::now());
    }

    #[test]
    fn test_confirm_without_candidate() {
        let mut capture: SelectionCapture<FakeAnchor> = SelectionCapture::new();
        let mut notes = annotations();
        assert!(capture.confirm(&mut notes).is_none());
        assert!(notes.highlights().is_empty());
    }

    #[test]
    fn test_borrowed_anchor_keeps_mark_state() {
        let mut anchor = FakeAnchor {
            text: "borrowed".to_string(),
            markable: true,
            marked: false,
        };
        let mut notes = annotations();
        {
            let mut capture = SelectionCapture::new();
            capture.pointer_released(
                Some(Selection {
                    anchor: &mut anchor,
                    collapsed: false,
                    in_content: true,
                    position: ScreenPoint::default(),
                }),
                false,
            );
            assert!(capture.confirm(&mut notes).unwrap().is_marked());
        }
        assert!(anchor.marked);
    }

    #[test]
    fn test_dismiss_persists_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mut notes = AnnotationStore::load(store.clone());
        let mut capture = SelectionCapture::new();
        capture.pointer_released(Some(selection("never saved", true)), false);

        assert!(capture.dismiss().is_some());
        assert!(capture.confirm(&mut notes).is_none());
        assert!(store.get(StorageKey::Highlights).is_none());
    }
}
