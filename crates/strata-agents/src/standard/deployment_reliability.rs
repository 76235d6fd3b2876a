//! Deployment reliability advisor.

use serde_json::{Value, json};
use strata_core::{Agent, AgentInput, ExecutionContext, ExecutionFailure, Tier};

const RECOMMENDATIONS: &[&str] = &[
    "Add deployment health checks and rollback strategy",
    "Use progressive delivery (canary / blue-green) for safer releases",
    "Define SLOs/SLIs and alert on error budgets",
    "Automate CI/CD checks (tests, lint, security scans) before deploy",
];

const RISKS: &[&str] = &[
    "Deployments without rollback increase outage risk",
    "No monitoring/alerts causes slow incident detection",
    "Unvalidated changes increase regression probability",
];

const NEXT_ACTIONS: &[&str] = &[
    "Implement a basic health endpoint and readiness checks",
    "Add CI pipeline gates (unit tests + linting + security scan)",
    "Create a rollback runbook and test rollback in staging",
];

/// Recommends how to make releases safer for a goal.
///
/// Output keys are fixed: `agent`, `tier`, `goal`, `constraints`,
/// `recommendations`, `tier_notes`, `risks`, `next_actions`. The tier only
/// changes `tier_notes`; constraints add one extra risk.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeploymentReliabilityAgent;

impl DeploymentReliabilityAgent {
    pub const NAME: &'static str = "deployment_reliability";

    fn tier_notes(tier: Tier) -> &'static [&'static str] {
        match tier {
            Tier::Personal => &[
                "Prioritize low-cost monitoring (basic uptime checks, lightweight logs)",
                "Keep setup simple and avoid heavy infrastructure overhead",
            ],
            Tier::Business => &[
                "Use audit-friendly logging and deployment reporting",
                "Integrate with incident workflows (ticketing, on-call, postmortems)",
            ],
            Tier::Government => &[
                "Add human-in-the-loop approvals for releases when required",
                "Enforce traceability: what changed, who approved, and why",
                "Favor explainable controls and documented governance gates",
            ],
        }
    }
}

impl Agent for DeploymentReliabilityAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, input: &Value, ctx: &ExecutionContext) -> Result<Value, ExecutionFailure> {
        let input = AgentInput::new(input)?;
        let goal = input.text("goal")?;
        let constraints = input.text_list("constraints")?;

        let mut risks: Vec<String> = RISKS.iter().map(|risk| risk.to_string()).collect();
        if !constraints.is_empty() {
            risks.push(format!(
                "Constraints may reduce options: {}",
                constraints.join(", ")
            ));
        }

        Ok(json!({
            "agent": Self::NAME,
            "tier": ctx.tier(),
            "goal": goal,
            "constraints": constraints,
            "recommendations": RECOMMENDATIONS,
            "tier_notes": Self::tier_notes(ctx.tier()),
            "risks": risks,
            "next_actions": NEXT_ACTIONS,
        }))
    }
}
