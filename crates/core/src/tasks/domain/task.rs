use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shared::constants::SUCCESS_MESSAGE;
use crate::shared::error::{ErrorKind, TaskError};

/// Opaque caller-chosen identifier for one background-replacement run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Everything needed to run one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    pub video_path: PathBuf,
    pub background_path: PathBuf,
    pub output_path: PathBuf,
    pub task_id: TaskId,
}

impl TaskRequest {
    pub fn new(
        video_path: impl Into<PathBuf>,
        background_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        task_id: impl Into<TaskId>,
    ) -> Self {
        Self {
            video_path: video_path.into(),
            background_path: background_path.into(),
            output_path: output_path.into(),
            task_id: task_id.into(),
        }
    }

    /// Structural checks only; whether the files exist or decode is the
    /// run's business.
    pub fn validate(&self) -> Result<(), String> {
        if self.task_id.as_str().trim().is_empty() {
            return Err("task id is empty".into());
        }
        for (name, path) in [
            ("video path", &self.video_path),
            ("background path", &self.background_path),
            ("output path", &self.output_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(format!("{name} is empty"));
            }
        }
        if self.output_path == self.video_path {
            return Err("output path would overwrite the input video".into());
        }
        Ok(())
    }
}

/// Terminal outcome of a task. Written once; never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskResult {
    Success {
        output_path: PathBuf,
        message: String,
    },
    Failure {
        kind: ErrorKind,
        description: String,
    },
    Cancelled,
}

impl TaskResult {
    pub fn success(output_path: impl Into<PathBuf>) -> Self {
        TaskResult::Success {
            output_path: output_path.into(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Renders the typed error into the stored description.
    pub fn from_error(err: &TaskError) -> Self {
        TaskResult::Failure {
            kind: err.kind(),
            description: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success { .. })
    }
}

/// What the registry knows about a task id.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus {
    Unknown,
    Running { progress: f64 },
    Finished(TaskResult),
}
