//! Error types for the storage backend.

use thiserror::Error;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// `NotFound` is a distinct variant so callers can treat a missing
/// exposition file as empty content instead of a hard failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("failed to create directory: {0}")]
    CreateDir(String),
}

impl StorageError {
    /// True if this error means the file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
