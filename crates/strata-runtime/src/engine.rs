//! The dispatch engine.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use strata_agents::AgentRegistry;
use strata_core::{
    Agent, CorrelationId, DispatchError, ExecutionContext, ExecutionFailure, MemoryRecord,
    MemoryStore, ResultEnvelope,
};
use tracing::{error, field, info, info_span, warn};

/// Resolves agents by name, runs them and wraps the outcome.
///
/// `dispatch` never fails and never panics on behalf of an agent: every call
/// yields exactly one [`ResultEnvelope`]. When the context carries a
/// correlation id, the engine also keeps a trace of the last successful run
/// in the memory store.
///
/// The engine is cheap to clone and safe to share across threads.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use serde_json::json;
/// use strata_agents::{AgentRegistry, register_standard_agents};
/// use strata_core::{ExecutionContext, Tier};
/// use strata_memory::InMemoryStore;
/// use strata_runtime::DispatchEngine;
///
/// let mut registry = AgentRegistry::new();
/// register_standard_agents(&mut registry);
/// let engine = DispatchEngine::new(Arc::new(registry), Arc::new(InMemoryStore::new()));
///
/// let ctx = ExecutionContext::new(Tier::Business).with_correlation_id("req-1");
/// let envelope = engine.dispatch("orchestrator", &json!({"goal": "ship"}), &ctx);
/// assert!(envelope.is_ok());
///
/// let missing = engine.dispatch("nope", &json!({}), &ctx);
/// assert_eq!(missing.error(), Some("Unknown agent: nope"));
/// ```
#[derive(Clone)]
pub struct DispatchEngine {
    registry: Arc<AgentRegistry>,
    memory: Arc<dyn MemoryStore>,
    record_traces: bool,
}

impl DispatchEngine {
    /// Create an engine that records traces.
    pub fn new(registry: Arc<AgentRegistry>, memory: Arc<dyn MemoryStore>) -> Self {
        Self {
            registry,
            memory,
            record_traces: true,
        }
    }

    /// Enable or disable writing memory records.
    pub fn with_trace_recording(mut self, enabled: bool) -> Self {
        self.record_traces = enabled;
        self
    }

    pub fn records_traces(&self) -> bool {
        self.record_traces
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn memory(&self) -> &dyn MemoryStore {
        self.memory.as_ref()
    }

    /// Run `agent_name` on `input` under `ctx`.
    pub fn dispatch(
        &self,
        agent_name: &str,
        input: &Value,
        ctx: &ExecutionContext,
    ) -> ResultEnvelope {
        let span = info_span!(
            "dispatch",
            agent = agent_name,
            tier = %ctx.tier(),
            correlation_id = field::Empty
        );
        if let Some(id) = ctx.correlation_id() {
            span.record("correlation_id", id.as_str());
        }
        let _enter = span.enter();

        match self.try_dispatch(agent_name, input, ctx) {
            Ok(output) => {
                info!("Dispatch succeeded");
                ResultEnvelope::success(agent_name, ctx, output)
            }
            Err(err) => {
                match &err {
                    DispatchError::UnknownAgent(_) => {
                        warn!(error_code = err.error_code(), error = %err, "Dispatch rejected");
                    }
                    DispatchError::Execution(_) => {
                        error!(error_code = err.error_code(), error = %err, "Dispatch failed");
                    }
                }
                ResultEnvelope::failure(agent_name, ctx, err.caller_message())
            }
        }
    }

    fn try_dispatch(
        &self,
        agent_name: &str,
        input: &Value,
        ctx: &ExecutionContext,
    ) -> Result<Value, DispatchError> {
        let agent = self.registry.resolve(agent_name)?;

        let trace_id = ctx.correlation_id().filter(|_| self.record_traces);
        let opened = trace_id.and_then(|id| self.open_trace(id, ctx));

        let output = invoke(agent.as_ref(), input, ctx)?;

        if let Some(mut record) = opened {
            record.record_run(agent_name, output.clone());
            if let Err(err) = self.memory.upsert(record) {
                warn!(error = %err, "Could not record trace");
            }
        }
        Ok(output)
    }

    fn open_trace(&self, id: &CorrelationId, ctx: &ExecutionContext) -> Option<MemoryRecord> {
        match self.memory.ensure(id, ctx.tier()) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "Could not open trace");
                None
            }
        }
    }
}

impl fmt::Debug for DispatchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEngine")
            .field("registry", &self.registry)
            .field("memory_records", &self.memory.len())
            .field("record_traces", &self.record_traces)
            .finish()
    }
}

/// Call `run`, turning a panic into [`ExecutionFailure::Panicked`].
fn invoke(
    agent: &dyn Agent,
    input: &Value,
    ctx: &ExecutionContext,
) -> Result<Value, ExecutionFailure> {
    panic::catch_unwind(AssertUnwindSafe(|| agent.run(input, ctx)))
        .unwrap_or_else(|payload| Err(ExecutionFailure::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
