//! Search filter, task partition and progress helpers.
//!
//! # Invariants
//! - An empty query matches every record.
//! - Partitioning runs on the search-filtered set; progress uses the
//!   unfiltered collection.

use crate::model::note::Note;
use crate::model::task::Task;
use crate::store::collection::filter_records;

/// Lowercased search text. The query is not trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Case-insensitive substring test against `haystack`.
    pub fn matches(&self, haystack: &str) -> bool {
        self.is_empty() || haystack.to_lowercase().contains(&self.needle)
    }
}

pub fn note_matches(note: &Note, query: &SearchQuery) -> bool {
    query.matches(&note.title) || query.matches(&note.content)
}

pub fn task_matches(task: &Task, query: &SearchQuery) -> bool {
    query.matches(&task.title)
}

/// Notes whose title or content contains `query`, in collection order.
pub fn search_notes(notes: &[Note], query: &SearchQuery) -> Vec<Note> {
    filter_records(notes, |note| note_matches(note, query))
}

/// Tasks whose title contains `query`, in collection order.
pub fn search_tasks(tasks: &[Task], query: &SearchQuery) -> Vec<Task> {
    filter_records(tasks, |task| task_matches(task, query))
}

/// Tasks split by completion state, each side in collection order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPartition {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
}

pub fn partition_tasks(tasks: &[Task]) -> TaskPartition {
    TaskPartition {
        pending: filter_records(tasks, Task::is_pending),
        completed: filter_records(tasks, |task| task.completed),
    }
}

/// Rounded completion percentage; `0` for an empty collection.
///
/// Halves round up, so 1 of 8 yields 13.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

/// Counters shown next to the task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    /// Unfiltered task count.
    pub total: usize,
    /// Pending tasks matching the current search.
    pub pending: usize,
    /// Completed tasks matching the current search.
    pub completed: usize,
    /// Completed tasks matching the search over the unfiltered count.
    pub progress_percent: u8,
}

/// Search-filtered task lists plus their statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskBoard {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
    pub stats: TaskStats,
}

/// Derives the task board for `query` from the full collection.
pub fn task_board(all: &[Task], query: &SearchQuery) -> TaskBoard {
    let TaskPartition { pending, completed } = partition_tasks(&search_tasks(all, query));
    let stats = TaskStats {
        total: all.len(),
        pending: pending.len(),
        completed: completed.len(),
        progress_percent: progress_percent(completed.len(), all.len()),
    };
    TaskBoard {
        pending,
        completed,
        stats,
    }
}
