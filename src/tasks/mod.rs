//! Session task list.
//!
//! Entries are kept newest first and identified by a `TaskId` handed out
//! by the list, so entries with identical text stay independent.
//! Nothing is persisted: the list lives as long as the session.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identity of a task entry within one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    /// Identity within the list
    pub id: TaskId,
    /// Trimmed, non-empty text
    pub text: String,
    /// Checkbox state
    pub completed: bool,
}

/// Owns the ordered task entries.
#[derive(Debug, Default)]
pub struct TaskListController {
    entries: Vec<TaskEntry>,
    next_id: u64,
}

impl TaskListController {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task at the front of the list.
    ///
    /// The text is trimmed; blank text is ignored and returns `None`.
    pub fn add_task(&mut self, text: &str) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.entries.insert(
            0,
            TaskEntry {
                id,
                text: text.to_string(),
                completed: false,
            },
        );
        debug!(%id, "Task added");
        Some(id)
    }

    /// Removes the entry with the given id.
    ///
    /// Returns false if no such entry exists.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Flips the completed flag of an entry.
    ///
    /// Returns the new flag, or `None` if no such entry exists.
    pub fn toggle_completed(&mut self, id: TaskId) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
        entry.completed = !entry.completed;
        Some(entry.completed)
    }

    /// Returns the entries, newest first.
    pub fn entries(&self) -> &[TaskEntry] {
        &self.entries
    }

    /// Returns the entry with the given id.
    pub fn get(&self, id: TaskId) -> Option<&TaskEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod add_tests {
        use super::*;

        #[test]
        fn test_add_inserts_at_front() {
            let mut tasks = TaskListController::new();

            let first = tasks.add_task("write report").unwrap();
            let second = tasks.add_task("buy milk").unwrap();

            let entries = tasks.entries();
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].id, second);
            assert_eq!(entries[0].text, "buy milk");
            assert!(!entries[0].completed);
            assert_eq!(entries[1].id, first);
        }

        #[test]
        fn test_add_trims_text() {
            let mut tasks = TaskListController::new();

            let id = tasks.add_task("   stretch  \n").unwrap();

            assert_eq!(tasks.get(id).unwrap().text, "stretch");
        }

        #[test]
        fn test_add_blank_is_noop() {
            let mut tasks = TaskListController::new();
            tasks.add_task("existing");

            assert_eq!(tasks.add_task("  "), None);
            assert_eq!(tasks.add_task(""), None);
            assert_eq!(tasks.add_task("\t\n"), None);

            assert_eq!(tasks.len(), 1);
            assert_eq!(tasks.entries()[0].text, "existing");
        }

        #[test]
        fn test_duplicate_texts_get_distinct_ids() {
            let mut tasks = TaskListController::new();

            let a = tasks.add_task("email").unwrap();
            let b = tasks.add_task("email").unwrap();

            assert_ne!(a, b);
            assert_eq!(tasks.len(), 2);
        }
    }

    mod delete_tests {
        use super::*;

        #[test]
        fn test_delete_by_identity() {
            let mut tasks = TaskListController::new();
            let older = tasks.add_task("email").unwrap();
            let newer = tasks.add_task("email").unwrap();

            assert!(tasks.delete_task(older));

            assert_eq!(tasks.len(), 1);
            assert_eq!(tasks.entries()[0].id, newer);
        }

        #[test]
        fn test_delete_is_idempotent() {
            let mut tasks = TaskListController::new();
            let id = tasks.add_task("email").unwrap();

            assert!(tasks.delete_task(id));
            assert!(!tasks.delete_task(id));
            assert!(!tasks.delete_task(TaskId(999)));
            assert!(tasks.is_empty());
        }

        #[test]
        fn test_ids_not_reused_after_delete() {
            let mut tasks = TaskListController::new();
            let id = tasks.add_task("a").unwrap();
            tasks.delete_task(id);

            let next = tasks.add_task("b").unwrap();

            assert_ne!(id, next);
        }
    }

    mod toggle_tests {
        use super::*;

        #[test]
        fn test_toggle_flips_flag() {
            let mut tasks = TaskListController::new();
            let id = tasks.add_task("read").unwrap();

            assert_eq!(tasks.toggle_completed(id), Some(true));
            assert!(tasks.get(id).unwrap().completed);

            assert_eq!(tasks.toggle_completed(id), Some(false));
            assert!(!tasks.get(id).unwrap().completed);
        }

        #[test]
        fn test_toggle_keeps_order_and_others() {
            let mut tasks = TaskListController::new();
            let a = tasks.add_task("a").unwrap();
            let b = tasks.add_task("b").unwrap();
            let c = tasks.add_task("c").unwrap();

            tasks.toggle_completed(b);

            let ids: Vec<_> = tasks.entries().iter().map(|e| e.id).collect();
            assert_eq!(ids, vec![c, b, a]);
            assert!(!tasks.get(a).unwrap().completed);
            assert!(!tasks.get(c).unwrap().completed);
        }

        #[test]
        fn test_toggle_unknown_is_noop() {
            let mut tasks = TaskListController::new();
            tasks.add_task("a");

            assert_eq!(tasks.toggle_completed(TaskId(42)), None);
            assert!(!tasks.entries()[0].completed);
        }
    }
}
