use thiserror::Error;

/// Errors raised by the workflow engine and the field configuration manager.
///
/// Progression checks do not use this type for rule violations; they
/// return a `ValidationResult` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Unknown transaction or configuration id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Protected evidence field, invalid level number, invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate active configuration or a lost versioning race
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transaction locked or in a terminal status
    #[error("Invalid state: {0}")]
    State(String),

    /// Backend failure below the store contract
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WorkflowError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<crate::InvalidLevel> for WorkflowError {
    fn from(err: crate::InvalidLevel) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
