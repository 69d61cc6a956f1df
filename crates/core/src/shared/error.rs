use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type returned across adapter seams (decoders, encoders, loaders).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Classification of a failed task, kept alongside its textual description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Config,
    Processing,
    Resource,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "config"),
            ErrorKind::Processing => write!(f, "processing"),
            ErrorKind::Resource => write!(f, "resource"),
        }
    }
}

/// Why a background-replacement run stopped before completing.
#[derive(Error, Debug)]
pub enum TaskError {
    /// An input could not be read before any frame was processed.
    #[error("could not load {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    /// Reading, keying, compositing or writing a specific frame failed.
    #[error("failed to process frame {frame_index}: {source}")]
    Processing {
        frame_index: usize,
        #[source]
        source: BoxError,
    },
    /// The output could not be created or finalized.
    #[error("could not write output {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl TaskError {
    pub fn config(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        TaskError::Config {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn processing(frame_index: usize, source: impl Into<BoxError>) -> Self {
        TaskError::Processing {
            frame_index,
            source: source.into(),
        }
    }

    pub fn resource(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        TaskError::Resource {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::Config { .. } => ErrorKind::Config,
            TaskError::Processing { .. } => ErrorKind::Processing,
            TaskError::Resource { .. } => ErrorKind::Resource,
        }
    }

    /// Resource failures abort a task before frames flow, like config errors.
    pub fn is_config_class(&self) -> bool {
        matches!(self.kind(), ErrorKind::Config | ErrorKind::Resource)
    }
}
