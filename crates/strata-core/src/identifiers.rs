//! Correlation identifiers.
//!
//! A correlation id groups a dispatch with its diagnostic trace. The core
//! treats it as an opaque string: callers usually take it from a request
//! header or mint a fresh one per inbound call.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, caller-supplied identifier keying a memory record.
///
/// # Examples
///
/// ```rust
/// use strata_core::CorrelationId;
///
/// let id = CorrelationId::new("req-42");
/// assert_eq!(id.as_str(), "req-42");
///
/// assert!(CorrelationId::from_header(Some("  ")).is_none());
/// assert_eq!(
///     CorrelationId::from_header(Some(" abc ")),
///     Some(CorrelationId::new("abc"))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wrap an existing identifier without inspecting it.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Read an identifier from a raw header value.
    ///
    /// Absent and blank values yield `None` so they never key a record.
    pub fn from_header(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Self::new)
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CorrelationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<CorrelationId> for String {
    fn from(id: CorrelationId) -> Self {
        id.0
    }
}
