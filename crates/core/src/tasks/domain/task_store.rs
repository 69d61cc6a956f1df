use super::task::{TaskId, TaskResult, TaskStatus};

/// Registry of task progress and terminal results.
///
/// Shared between the submitting side (reads) and the worker running each
/// task (writes). Entries are never evicted.
pub trait TaskStore: Send + Sync {
    /// Creates an entry at progress 0. Returns `false` if the id is known.
    fn register(&self, id: &TaskId) -> bool;

    /// Overwrites the progress value, creating the entry if absent.
    fn set_progress(&self, id: &TaskId, value: f64);

    /// Stored progress in `[0, 100]`, or 0 for an unknown id.
    fn progress(&self, id: &TaskId) -> f64;

    /// Stores the terminal result; the first write wins and later ones are
    /// ignored (`false`). A `Success` also moves progress to 100 in the
    /// same step.
    fn set_result(&self, id: &TaskId, result: TaskResult) -> bool;

    fn result(&self, id: &TaskId) -> Option<TaskResult>;

    fn status(&self, id: &TaskId) -> TaskStatus;
}
