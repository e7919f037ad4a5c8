//! Error types for path locking.

use thiserror::Error;

/// Result type alias for lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// Errors that can occur while acquiring or releasing a path lock.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("failed to acquire lock: {0}")]
    Acquire(String),

    #[error("failed to release lock: {0}")]
    Release(String),
}
