//! Tier-aware execution planner.

use serde_json::{Value, json};
use strata_core::{Agent, AgentInput, ExecutionContext, ExecutionFailure, Tier};

/// Produces an ordered plan of steps for a goal.
///
/// Every plan shares one skeleton: analyse the goal, state the tier, insert
/// the tier's own steps, evaluate constraints (listing them when there are
/// any), generate the plan, return. Only the tier block varies.
///
/// Input: `{"goal": string?, "constraints": [string]?}`.
/// Output: `{"plan": [string]}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrchestratorAgent;

impl OrchestratorAgent {
    pub const NAME: &'static str = "orchestrator";

    fn tier_steps(tier: Tier) -> &'static [&'static str] {
        match tier {
            Tier::Personal => &[
                "Keep data local when possible",
                "Minimize logging (privacy-first)",
                "Generate a simple execution plan",
            ],
            Tier::Business => &[
                "Confirm scope + stakeholders",
                "Enable audit-friendly logging",
                "Check integration touchpoints (APIs, dashboards, workflows)",
                "Generate an execution plan with measurable outcomes",
            ],
            Tier::Government => &[
                "Require human-in-the-loop approval for key decisions",
                "Capture traceability (inputs, outputs, rationale)",
                "Run policy + compliance checks (privacy, security, accountability)",
                "Generate an execution plan with governance gates",
            ],
        }
    }

    /// Build the plan for a goal under a tier.
    pub fn plan(goal: &str, constraints: &[String], tier: Tier) -> Vec<String> {
        let mut plan = vec![format!("Analyze goal: {goal}"), format!("Tier: {tier}")];
        plan.extend(Self::tier_steps(tier).iter().map(|step| step.to_string()));

        plan.push("Evaluate constraints".to_string());
        if !constraints.is_empty() {
            plan.push(format!("Constraints: {}", constraints.join(", ")));
        }

        plan.push("Generate execution plan".to_string());
        plan.push("Return structured response".to_string());
        plan
    }
}

impl Agent for OrchestratorAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, input: &Value, ctx: &ExecutionContext) -> Result<Value, ExecutionFailure> {
        let input = AgentInput::new(input)?;
        let goal = input.text("goal")?;
        let constraints = input.text_list("constraints")?;

        Ok(json!({ "plan": Self::plan(&goal, &constraints, ctx.tier()) }))
    }
}
