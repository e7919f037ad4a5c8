//! Error types for metric writes.

use thiserror::Error;

use cronpulse_store::StorageError;

/// Result type alias for metric write operations.
pub type MetricResult<T> = Result<T, MetricError>;

/// Errors that abort a metric write.
///
/// Lock-acquisition failures are deliberately absent: they are logged and
/// the write proceeds without the lock. A returned error means the sample
/// was not recorded.
#[derive(Debug, Error)]
pub enum MetricError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
