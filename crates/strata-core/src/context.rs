//! Per-request execution context.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::identifiers::CorrelationId;
use crate::tier::Tier;

/// Open-ended, cross-cutting request data.
pub type Metadata = HashMap<String, Value>;

/// Bundle of tier, correlation id and metadata for one request.
///
/// The caller builds a context once per inbound request and lends it to the
/// dispatch engine, which lends it to the agent. There are no mutable
/// accessors: once built, the tier and correlation id stay fixed for the
/// whole call.
///
/// # Example
///
/// ```rust
/// use strata_core::{CorrelationId, ExecutionContext, Tier};
///
/// let ctx = ExecutionContext::new(Tier::Business)
///     .with_correlation_id("req-1")
///     .with_metadata("locale", "en-GB");
///
/// assert_eq!(ctx.tier(), Tier::Business);
/// assert_eq!(ctx.correlation_id(), Some(&CorrelationId::new("req-1")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionContext {
    tier: Tier,
    correlation_id: Option<CorrelationId>,
    metadata: Metadata,
}

impl ExecutionContext {
    /// Create a context for the given tier with no correlation id.
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            correlation_id: None,
            metadata: Metadata::new(),
        }
    }

    /// Build a context from raw transport values.
    ///
    /// The tier goes through [`Tier::resolve`] and the correlation id through
    /// [`CorrelationId::from_header`], so this never fails.
    pub fn from_raw(raw_tier: Option<&str>, raw_correlation_id: Option<&str>) -> Self {
        Self {
            tier: Tier::resolve(raw_tier),
            correlation_id: CorrelationId::from_header(raw_correlation_id),
            metadata: Metadata::new(),
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<CorrelationId>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Look up a single metadata entry.
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_context() {
        let ctx = ExecutionContext::default();
        assert_eq!(ctx.tier(), Tier::Personal);
        assert!(ctx.correlation_id().is_none());
        assert!(ctx.metadata().is_empty());
    }

    #[test]
    fn test_from_raw_normalises_transport_values() {
        let ctx = ExecutionContext::from_raw(Some(" GOVERNMENT"), Some(" req-9 "));
        assert_eq!(ctx.tier(), Tier::Government);
        assert_eq!(ctx.correlation_id().map(CorrelationId::as_str), Some("req-9"));

        let ctx = ExecutionContext::from_raw(Some("unknown"), Some(""));
        assert_eq!(ctx.tier(), Tier::Personal);
        assert!(ctx.correlation_id().is_none());
    }

    #[test]
    fn test_metadata_last_insert_wins() {
        let ctx = ExecutionContext::new(Tier::Business)
            .with_metadata("region", "eu")
            .with_metadata("region", json!({"code": "us"}));
        assert_eq!(ctx.metadata().len(), 1);
        assert_eq!(ctx.metadata_value("region"), Some(&json!({"code": "us"})));
        assert_eq!(ctx.metadata_value("missing"), None);
    }
}
