use scrapflow_types::WorkflowError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for WorkflowError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => WorkflowError::NotFound(msg),
            StorageError::Conflict(msg) => WorkflowError::Conflict(msg),
            StorageError::InvalidInput(msg) => WorkflowError::Validation(msg),
            StorageError::InvariantViolation(msg) => WorkflowError::State(msg),
            StorageError::Backend(msg) => WorkflowError::Storage(msg),
        }
    }
}
