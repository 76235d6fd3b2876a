//! Registry and agent execution errors.

use thiserror::Error;

/// Caller-visible text for any execution failure.
const EXECUTION_FAILED: &str = "Agent execution failed";

/// Errors raised while resolving an agent by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No factory is registered under this name.
    #[error("Unknown agent: {name}")]
    NotFound { name: String },
}

impl RegistryError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors an agent can report from `run`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionFailure {
    /// A present input field had an unusable shape.
    #[error("Invalid input field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Any other internal failure.
    #[error("Internal agent error: {0}")]
    Internal(String),

    /// The agent panicked; the payload message is kept for the log.
    #[error("Agent panicked: {0}")]
    Panicked(String),
}

impl ExecutionFailure {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ExecutionFailure {
    fn from(err: serde_json::Error) -> Self {
        ExecutionFailure::Internal(format!("JSON error: {}", err))
    }
}

/// Every way a single dispatch can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    UnknownAgent(#[from] RegistryError),

    #[error("Agent execution failed: {0}")]
    Execution(#[from] ExecutionFailure),
}

impl DispatchError {
    /// Short, non-sensitive text safe to hand back to a caller.
    ///
    /// Unknown agents are reported verbatim with the offending name;
    /// execution failures never leak their detail.
    pub fn caller_message(&self) -> String {
        match self {
            DispatchError::UnknownAgent(err) => err.to_string(),
            DispatchError::Execution(_) => EXECUTION_FAILED.to_string(),
        }
    }

    /// Stable code for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            DispatchError::UnknownAgent(_) => "UNKNOWN_AGENT",
            DispatchError::Execution(_) => "EXECUTION_FAILED",
        }
    }
}
