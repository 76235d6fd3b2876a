//! Standard agents shipped with Strata.

pub mod deployment_reliability;
pub mod orchestrator;

pub use deployment_reliability::DeploymentReliabilityAgent;
pub use orchestrator::OrchestratorAgent;

use crate::registry::AgentRegistry;

/// Register every standard agent under its canonical name.
pub fn register_standard_agents(registry: &mut AgentRegistry) {
    registry.register_type::<OrchestratorAgent>(OrchestratorAgent::NAME);
    registry.register_type::<DeploymentReliabilityAgent>(DeploymentReliabilityAgent::NAME);
}
