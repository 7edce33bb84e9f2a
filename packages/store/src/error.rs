//! Errors returned by the journal service and its storage backends.

use thiserror::Error;

/// Boxed error raised by a storage backend (database driver, pool, ...).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum JournalError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The record id in the path is not a valid identifier.
    #[error("Invalid id")]
    InvalidId,

    /// A supplied `project_id` is not a valid identifier.
    #[error("Invalid project id")]
    InvalidProjectId,

    /// No record matched `(id, owner)`.
    #[error("Not found")]
    NotFound,

    /// A unique key is already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[source] BoxError),
}

impl JournalError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn storage(err: impl Into<BoxError>) -> Self {
        Self::Storage(err.into())
    }
}
