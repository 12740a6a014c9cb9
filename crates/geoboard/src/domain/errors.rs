//! Domain Errors
//!
//! Error types for repository operations.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by a `MessageRepository`.
///
/// Never retried internally; callers decide what to do with them.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Message not found: {id}")]
    NotFound { id: String },

    #[error("Repository error: {0}")]
    Backend(String),

    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl RepositoryError {
    pub fn not_found<T: AsRef<str>>(id: T) -> Self {
        Self::NotFound {
            id: id.as_ref().to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
