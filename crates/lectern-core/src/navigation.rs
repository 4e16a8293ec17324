//! Step navigation and the learning plan
//!
//! Lessons are read as a linear sequence of steps: step 0 is the
//! introduction, step N is lesson N.

use serde::Serialize;

use crate::bookmarks::BookmarkSet;
use crate::content::ContentTree;

/// Position within the lesson sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepCursor {
    pub current: usize,
    pub total: usize,
}

impl StepCursor {
    /// Cursor at `current`, clamped into `0..total`
    pub fn new(current: usize, total: usize) -> Self {
        Self {
            current: current.min(total.saturating_sub(1)),
            total,
        }
    }

    pub fn for_tree(tree: &ContentTree, current: usize) -> Self {
        Self::new(current, tree.len())
    }

    /// Move forward one step; no-op on the last step
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move back one step; no-op on the first step
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.total
    }

    /// Progress through the sequence as a whole percentage
    ///
    /// A single-step sequence is always complete.
    pub fn progress_percent(&self) -> u8 {
        if self.total <= 1 {
            return 100;
        }
        let ratio = self.current as f64 / (self.total - 1) as f64;
        (ratio * 100.0).round() as u8
    }
}

/// One day of the learning plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDay {
    /// 1-based day number
    pub day: usize,
    pub lesson_index: usize,
    pub title: String,
    pub description: String,
    pub bookmarked: bool,
    pub completed: bool,
}

/// Every lesson after the introduction as a plan day
///
/// A day counts as completed once the reader has stepped past it.
pub fn learning_plan(
    tree: &ContentTree,
    bookmarks: &BookmarkSet,
    current_step: usize,
) -> Vec<PlanDay> {
    tree.lessons()
        .iter()
        .enumerate()
        .skip(1)
        .map(|(lesson_index, lesson)| {
            let day = lesson_index;
            PlanDay {
                day,
                lesson_index,
                title: lesson.title.clone(),
                description: lesson.description.clone(),
                bookmarked: bookmarks.has(&lesson.id),
                completed: current_step > day - 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_cursor_clamps() {
        let mut cursor = StepCursor::new(0, 3);
        assert!(cursor.is_first());
        assert!(!cursor.prev());
        assert_eq!(cursor.current, 0);

        assert!(cursor.next());
        assert!(cursor.next());
        assert!(cursor.is_last());
        assert!(!cursor.next());
        assert_eq!(cursor.current, 2);

        assert_eq!(StepCursor::new(9, 3).current, 2);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(StepCursor::new(0, 6).progress_percent(), 0);
        assert_eq!(StepCursor::new(1, 6).progress_percent(), 20);
        assert_eq!(StepCursor::new(5, 6).progress_percent(), 100);
        assert_eq!(StepCursor::new(1, 4).progress_percent(), 33);
        assert_eq!(StepCursor::new(2, 4).progress_percent(), 67);
        assert_eq!(StepCursor::new(0, 1).progress_percent(), 100);
    }

    #[test]
    fn test_learning_plan() {
        let tree = ContentTree::bundled().unwrap();
        let mut bookmarks = BookmarkSet::load(Arc::new(MemoryStore::new()));
        bookmarks.toggle("day2");

        let plan = learning_plan(&tree, &bookmarks, 2);
        assert_eq!(plan.len(), tree.len() - 1);
        assert_eq!(plan[0].day, 1);
        assert_eq!(plan[0].lesson_index, 1);
        assert_eq!(plan[0].title, tree.lessons()[1].title);

        let completed: Vec<bool> = plan.iter().map(|d| d.completed).collect();
        assert_eq!(completed, [true, true, false, false, false]);

        let bookmarked: Vec<usize> = plan.iter().filter(|d| d.bookmarked).map(|d| d.day).collect();
        assert_eq!(bookmarked, [2]);
    }

    #[test]
    fn test_plan_on_intro_has_nothing_completed() {
        let tree = ContentTree::bundled().unwrap();
        let bookmarks = BookmarkSet::load(Arc::new(MemoryStore::new()));
        assert!(learning_plan(&tree, &bookmarks, 0)
            .iter()
            .all(|d| !d.completed));
    }
}
