//! Composition root.
//!
//! Builds the registry, the memory store and the engine a process runs with,
//! and the small descriptive payloads a transport hands back to its callers.

use std::sync::Arc;

use serde::Serialize;
use strata_agents::{AgentRegistry, register_standard_agents};
use strata_core::Tier;
use strata_memory::InMemoryStore;
use tracing::info;

use crate::config::RuntimeConfig;
use crate::engine::DispatchEngine;

/// Service identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
}

impl ServiceInfo {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.service_name.clone())
    }
}

/// How a raw tier value was understood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierReport {
    /// The value as received, untouched; `None` when absent.
    pub received: Option<String>,
    pub normalized: Tier,
}

impl TierReport {
    pub fn resolve(raw: Option<&str>) -> Self {
        Self {
            received: raw.map(str::to_string),
            normalized: Tier::resolve(raw),
        }
    }
}

/// Registry holding every standard agent.
pub fn default_registry() -> AgentRegistry {
    let mut registry = AgentRegistry::new();
    register_standard_agents(&mut registry);
    registry
}

/// Engine over the standard agents and a fresh in-process store.
pub fn build_engine(config: &RuntimeConfig) -> DispatchEngine {
    let registry = default_registry();
    info!(
        service = %config.service_name,
        agents = registry.len(),
        record_traces = config.record_traces,
        "Dispatch engine ready"
    );
    DispatchEngine::new(Arc::new(registry), Arc::new(InMemoryStore::new()))
        .with_trace_recording(config.record_traces)
}
