//! # Engine Test Harness
//!
//! A dispatch engine wired for tests: mock or standard agents, an
//! inspectable memory store, and scenario runs with pass/fail reporting.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use strata_agents::{AgentRegistry, register_standard_agents};
use strata_core::{
    Agent, CorrelationId, ExecutionContext, MemoryRecord, MemoryStore, ResultEnvelope, Tier,
};
use strata_memory::InMemoryStore;
use strata_runtime::DispatchEngine;

use crate::mock_agents::MockAgent;

/// One dispatch to run through the harness.
#[derive(Debug, Clone)]
pub struct DispatchScenario {
    pub name: String,
    pub agent: String,
    pub input: Value,
    pub tier: Tier,
    pub correlation_id: Option<String>,
    pub should_succeed: bool,
}

impl DispatchScenario {
    pub fn new(agent: impl Into<String>, input: Value) -> Self {
        let agent = agent.into();
        Self {
            name: format!("dispatch_{agent}"),
            agent,
            input,
            tier: Tier::DEFAULT,
            correlation_id: None,
            should_succeed: true,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Expect the dispatch to fail
    pub fn should_fail(mut self) -> Self {
        self.should_succeed = false;
        self
    }

    pub fn context(&self) -> ExecutionContext {
        let ctx = ExecutionContext::new(self.tier);
        match &self.correlation_id {
            Some(id) => ctx.with_correlation_id(id.as_str()),
            None => ctx,
        }
    }
}

/// Outcome of a scenario.
#[derive(Debug)]
pub struct ScenarioResult {
    pub scenario_name: String,
    /// Whether `ok` matched the scenario's expectation.
    pub passed: bool,
    pub envelope: ResultEnvelope,
    pub execution_time: Duration,
}

impl ScenarioResult {
    pub fn is_success(&self) -> bool {
        self.passed
    }

    pub fn summary(&self) -> String {
        let status = if self.passed { "PASS" } else { "FAIL" };
        let time = self.execution_time.as_micros();
        match self.envelope.error() {
            Some(error) => format!("[{status}] {} ({time}us) - {error}", self.scenario_name),
            None => format!("[{status}] {} ({time}us)", self.scenario_name),
        }
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Builder for [`EngineHarness`].
#[derive(Default)]
pub struct EngineHarnessBuilder {
    registry: AgentRegistry,
    memory: Option<Arc<dyn MemoryStore>>,
    record_traces: Option<bool>,
}

impl EngineHarnessBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the orchestrator and deployment reliability agents.
    pub fn with_standard_agents(mut self) -> Self {
        register_standard_agents(&mut self.registry);
        self
    }

    pub fn with_mock_agent(mut self, agent: MockAgent) -> Self {
        agent.register_into(&mut self.registry);
        self
    }

    pub fn with_agent<A, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        A: Agent + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.registry.register(name, factory);
        self
    }

    /// Use `memory` instead of a fresh [`InMemoryStore`].
    pub fn with_memory_store(mut self, memory: Arc<dyn MemoryStore>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn record_traces(mut self, enabled: bool) -> Self {
        self.record_traces = Some(enabled);
        self
    }

    pub fn build(self) -> EngineHarness {
        let memory = self
            .memory
            .unwrap_or_else(|| Arc::new(InMemoryStore::new()) as Arc<dyn MemoryStore>);
        let mut engine = DispatchEngine::new(Arc::new(self.registry), Arc::clone(&memory));
        if let Some(enabled) = self.record_traces {
            engine = engine.with_trace_recording(enabled);
        }
        EngineHarness { engine, memory }
    }
}

/// Dispatch engine plus direct access to its memory store.
pub struct EngineHarness {
    engine: DispatchEngine,
    memory: Arc<dyn MemoryStore>,
}

impl EngineHarness {
    pub fn builder() -> EngineHarnessBuilder {
        EngineHarnessBuilder::new()
    }

    /// Harness over the standard agents and an in-memory store.
    pub fn standard() -> Self {
        EngineHarnessBuilder::new().with_standard_agents().build()
    }

    pub fn engine(&self) -> &DispatchEngine {
        &self.engine
    }

    pub fn memory(&self) -> &dyn MemoryStore {
        self.memory.as_ref()
    }

    pub fn dispatch(&self, agent: &str, input: &Value, ctx: &ExecutionContext) -> ResultEnvelope {
        self.engine.dispatch(agent, input, ctx)
    }

    /// Dispatch with an empty input object.
    pub fn dispatch_empty(&self, agent: &str, ctx: &ExecutionContext) -> ResultEnvelope {
        self.dispatch(agent, &json!({}), ctx)
    }

    pub fn run_scenario(&self, scenario: &DispatchScenario) -> ScenarioResult {
        let ctx = scenario.context();
        let start = Instant::now();
        let envelope = self.engine.dispatch(&scenario.agent, &scenario.input, &ctx);
        let execution_time = start.elapsed();

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            passed: envelope.is_ok() == scenario.should_succeed,
            envelope,
            execution_time,
        }
    }

    pub fn run_scenarios(&self, scenarios: &[DispatchScenario]) -> Vec<ScenarioResult> {
        scenarios.iter().map(|s| self.run_scenario(s)).collect()
    }

    /// Memory record for `correlation_id`; `None` when absent or unreadable.
    pub fn record(&self, correlation_id: &str) -> Option<MemoryRecord> {
        self.memory
            .get(&CorrelationId::new(correlation_id))
            .ok()
            .flatten()
    }
}
