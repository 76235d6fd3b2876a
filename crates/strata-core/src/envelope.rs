//! Result envelope returned by every dispatch.

use serde::Serialize;
use serde_json::{Value, json};

use crate::context::ExecutionContext;
use crate::identifiers::CorrelationId;
use crate::tier::Tier;

/// Fallback text when a failure is constructed with an empty message.
const UNSPECIFIED_FAILURE: &str = "Dispatch failed";

/// Normalised success/failure wrapper for one dispatch.
///
/// The two constructors are the only way to build an envelope, and they
/// keep the invariant callers rely on:
///
/// - `ok == true`: `error` is `None`, `output` is the agent's result
/// - `ok == false`: `output` is `{}` and `error` is a non-empty string
///
/// Callers must check [`is_ok`](Self::is_ok) before trusting
/// [`output`](Self::output).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    agent: String,
    correlation_id: Option<CorrelationId>,
    tier: Tier,
    output: Value,
    ok: bool,
    error: Option<String>,
}

impl ResultEnvelope {
    /// Wrap a successful agent result.
    pub fn success(agent: impl Into<String>, ctx: &ExecutionContext, output: Value) -> Self {
        Self {
            agent: agent.into(),
            correlation_id: ctx.correlation_id().cloned(),
            tier: ctx.tier(),
            output,
            ok: true,
            error: None,
        }
    }

    /// Report a failure with a short, caller-safe message.
    pub fn failure(
        agent: impl Into<String>,
        ctx: &ExecutionContext,
        error: impl Into<String>,
    ) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            UNSPECIFIED_FAILURE.to_string()
        } else {
            error
        };
        Self {
            agent: agent.into(),
            correlation_id: ctx.correlation_id().cloned(),
            tier: ctx.tier(),
            output: json!({}),
            ok: false,
            error: Some(error),
        }
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn output(&self) -> &Value {
        &self.output
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Convert into a `Result`, yielding the output or the error text.
    pub fn into_result(self) -> Result<Value, String> {
        match self.error {
            None => Ok(self.output),
            Some(error) => Err(error),
        }
    }
}
