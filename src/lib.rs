//! # Strata
//!
//! Strata is a request-scoped agent dispatch layer. A caller names an agent,
//! hands it a JSON payload and an execution context (deployment tier plus an
//! optional correlation id), and always gets back exactly one result envelope.
//! Dispatches that carry a correlation id leave a short-lived trace in the
//! memory store.
//!
//! ## Core Components
//!
//! - **[Tier]**: deployment mode a request runs under, resolved leniently
//! - **[ExecutionContext]**: per-request tier, correlation id and metadata
//! - **[Agent]**: a named capability, built fresh for every dispatch
//! - **[AgentRegistry]**: name to factory table, populated at startup
//! - **[DispatchEngine]**: resolve, run, isolate failures, record traces
//! - **[ResultEnvelope]**: the caller-facing `{ok, output, error}` wrapper
//! - **[MemoryStore]**: correlation-id-keyed trace store
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use strata::{
//!     AgentRegistry, DispatchEngine, ExecutionContext, InMemoryStore, MemoryStore, Tier,
//!     register_standard_agents,
//! };
//!
//! let mut registry = AgentRegistry::new();
//! register_standard_agents(&mut registry);
//!
//! let store = InMemoryStore::new();
//! let engine = DispatchEngine::new(Arc::new(registry), Arc::new(store.clone()));
//!
//! let ctx = ExecutionContext::from_raw(Some("Business"), Some("req-42"));
//! let envelope = engine.dispatch(
//!     "orchestrator",
//!     &json!({"goal": "ship faster", "constraints": ["low budget"]}),
//!     &ctx,
//! );
//!
//! assert!(envelope.is_ok());
//! assert_eq!(envelope.tier(), Tier::Business);
//! assert_eq!(store.len(), 1);
//! ```

// ============================================================================
// Module aliases for namespaced access
// ============================================================================

pub use strata_agents as agents;
pub use strata_core as core;
pub use strata_memory as memory;
pub use strata_observability as observability;
pub use strata_runtime as runtime;

#[cfg(feature = "testing")]
pub use strata_testing as testing;

// ============================================================================
// Core types
// ============================================================================

pub use strata_core::{
    Agent, AgentInput, CorrelationId, ExecutionContext, Metadata, ResultEnvelope, Tier,
    TierParseError,
};

// Errors
pub use strata_core::{
    DispatchError, ExecutionFailure, MemoryError, MemoryResult, RegistryError, RegistryResult,
};

// Memory
pub use strata_core::{MemoryRecord, MemoryStore};
pub use strata_memory::InMemoryStore;

// ============================================================================
// Agents
// ============================================================================

pub use strata_agents::{
    AgentFactory, AgentRegistry, DeploymentReliabilityAgent, FnAgentFactory, OrchestratorAgent,
    register_standard_agents,
};

// ============================================================================
// Runtime
// ============================================================================

pub use strata_runtime::{
    ConfigError, ConfigResult, DispatchEngine, RuntimeConfig, RuntimeConfigBuilder, ServiceInfo,
    TierReport, build_engine, default_registry,
};

pub use strata_observability::{LogFormat, ObservabilityConfig, init_tracing};
