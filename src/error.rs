//! Error types for task validation, lifecycle transitions and storage.

use chrono::NaiveTime;
use thiserror::Error;

/// Malformed task fields rejected at creation or edit time.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The end of the window is not strictly after its start.
    #[error("end time {end} must be after start time {start}")]
    InvertedWindow { start: NaiveTime, end: NaiveTime },

    /// A stored date does not use the `YYYY-MM-DD` encoding.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    MalformedDate(String),

    /// A stored time of day does not use the `HH:MM` encoding.
    #[error("invalid time '{0}', expected HH:MM")]
    MalformedTime(String),

    /// A template duration is zero, negative or not a number.
    #[error("invalid duration {0}h, expected a positive number of hours")]
    InvalidDuration(f64),
}

/// Errors raised by the task core.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Completion was requested for a task that is already completed.
    #[error("task {id} is already completed")]
    AlreadyCompleted { id: String },

    /// Only pending tasks have a lifecycle state.
    #[error("task {id} is not pending")]
    NotPending { id: String },

    #[error("template '{0}' not found")]
    UnknownTemplate(String),
}

/// Errors surfaced by the persistence and command layers.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An import bundle lacks a `tasks` array.
    #[error("invalid import bundle: {0}")]
    InvalidBundle(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Task(TaskError::Validation(err))
    }
}

/// Result type alias for the storage and command layers.
pub type Result<T> = std::result::Result<T, Error>;
