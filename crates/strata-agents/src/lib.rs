//! # Strata Agents
//!
//! The name → factory registry the dispatch engine resolves agents through,
//! and the standard agents shipped with Strata.
//!
//! ## Standard agents
//!
//! - `orchestrator`: builds a tier-aware execution plan for a goal
//! - `deployment_reliability`: recommendations, risks and next actions for
//!   improving release reliability

/// Name → factory mapping for agents.
pub mod registry;
/// Agents shipped with Strata.
pub mod standard;

pub use registry::{AgentFactory, AgentRegistry, FnAgentFactory};
pub use standard::{DeploymentReliabilityAgent, OrchestratorAgent, register_standard_agents};
pub use strata_core::{Agent, RegistryError, RegistryResult};
