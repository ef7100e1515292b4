//! Errors raised while building the task graph

use skein_core::SkeinError;
use thiserror::Error;

use crate::task::TaskId;

/// Result type alias for task graph operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// Task graph errors
#[derive(Debug, Error)]
pub enum TaskError {
    /// No loader claimed a specifier
    #[error("No loader can resolve '{0}'")]
    Unresolved(String),

    /// A specifier referenced a task this orchestrator does not own
    #[error("Unknown task {0}")]
    UnknownTask(TaskId),

    /// The working location or base path is not a usable URL
    #[error("Invalid location: {0}")]
    Location(#[from] url::ParseError),
}

impl From<TaskError> for SkeinError {
    fn from(err: TaskError) -> Self {
        SkeinError::Other(err.to_string())
    }
}
