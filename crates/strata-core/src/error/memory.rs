//! Memory store errors.

use thiserror::Error;

/// Errors a memory store backend can report.
///
/// The dispatch engine treats the store as diagnostic: these errors are
/// logged and never change the envelope returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// An operation on one record failed.
    #[error("Memory {operation} failed for '{correlation_id}': {reason}")]
    OperationFailed {
        operation: &'static str,
        correlation_id: String,
        reason: String,
    },

    /// The backend cannot serve requests at all.
    #[error("Memory backend unavailable: {0}")]
    Unavailable(String),
}

impl MemoryError {
    pub fn operation_failed(
        operation: &'static str,
        correlation_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::OperationFailed {
            operation,
            correlation_id: correlation_id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for memory store operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
