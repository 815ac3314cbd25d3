//! Centralized error types for TaskGrid.

use thiserror::Error;

/// Main error type for TaskGrid operations.
#[derive(Error, Debug)]
pub enum TaskGridError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task id prefix '{prefix}' is ambiguous ({matches} matches)")]
    AmbiguousTask { prefix: String, matches: usize },

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] taskgrid_storage::StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for TaskGrid operations.
pub type TaskGridResult<T> = Result<T, TaskGridError>;

impl TaskGridError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
