use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::tasks::domain::task::{TaskId, TaskResult, TaskStatus};
use crate::tasks::domain::task_store::TaskStore;

#[derive(Debug, Default)]
struct Entry {
    progress: f64,
    result: Option<TaskResult>,
}

/// Process-local task registry behind a `RwLock`.
///
/// Lost on restart. A poisoned lock is recovered rather than propagated,
/// since every write leaves an entry in a consistent state.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    entries: RwLock<HashMap<TaskId, Entry>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TaskStore for InMemoryTaskStore {
    fn register(&self, id: &TaskId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(id) {
            return false;
        }
        entries.insert(id.clone(), Entry::default());
        true
    }

    fn set_progress(&self, id: &TaskId, value: f64) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(id.clone()).or_default().progress = value.clamp(0.0, 100.0);
    }

    fn progress(&self, id: &TaskId) -> f64 {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map_or(0.0, |e| e.progress)
    }

    fn set_result(&self, id: &TaskId, result: TaskResult) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(id.clone()).or_default();
        if entry.result.is_some() {
            log::warn!("Task {id} already has a result; ignoring {result:?}");
            return false;
        }
        if result.is_success() {
            entry.progress = 100.0;
        }
        entry.result = Some(result);
        true
    }

    fn result(&self, id: &TaskId) -> Option<TaskResult> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .and_then(|e| e.result.clone())
    }

    fn status(&self, id: &TaskId) -> TaskStatus {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(id) {
            None => TaskStatus::Unknown,
            Some(Entry {
                result: Some(result),
                ..
            }) => TaskStatus::Finished(result.clone()),
            Some(entry) => TaskStatus::Running {
                progress: entry.progress,
            },
        }
    }
}
