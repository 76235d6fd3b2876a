//! # Mock Agents for Testing
//!
//! Agents with scripted behaviour and call tracking, plus a memory store
//! that fails on purpose.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use strata_agents::AgentRegistry;
use strata_core::{
    Agent, CorrelationId, ExecutionContext, ExecutionFailure, MemoryError, MemoryRecord,
    MemoryResult, MemoryStore, Tier,
};

/// What a [`MockAgent`] does when run.
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Return the input unchanged.
    Echo,
    /// Return this value.
    Respond(Value),
    /// Return [`ExecutionFailure::Internal`] with this message.
    Fail(String),
    /// Panic with this message.
    Panic(String),
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub input: Value,
    pub tier: Tier,
    pub correlation_id: Option<CorrelationId>,
}

/// An agent whose behaviour is scripted by the test.
///
/// Clones share their call history, so a registry factory that hands out
/// `mock.clone()` on every dispatch still lets the test observe all calls.
#[derive(Debug, Clone)]
pub struct MockAgent {
    name: String,
    behavior: MockBehavior,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockAgent {
    /// Create an echoing mock agent with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: MockBehavior::Echo,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn responding(name: impl Into<String>, output: Value) -> Self {
        Self::new(name).with_response(output)
    }

    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name).with_failure(message)
    }

    pub fn panicking(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name).with_panic(message)
    }

    pub fn with_response(mut self, output: Value) -> Self {
        self.behavior = MockBehavior::Respond(output);
        self
    }

    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.behavior = MockBehavior::Fail(message.into());
        self
    }

    pub fn with_panic(mut self, message: impl Into<String>) -> Self {
        self.behavior = MockBehavior::Panic(message.into());
        self
    }

    pub fn behavior(&self) -> &MockBehavior {
        &self.behavior
    }

    /// Register this mock so that every dispatch gets a fresh clone.
    pub fn register_into(&self, registry: &mut AgentRegistry) {
        let template = self.clone();
        registry.register(self.name.clone(), move || template.clone());
    }

    /// Get the number of times this agent has been run
    pub fn call_count(&self) -> usize {
        self.history().len()
    }

    /// Get the history of calls, oldest first
    pub fn call_history(&self) -> Vec<MockCall> {
        self.history().clone()
    }

    /// Check if the agent was run with a specific input
    pub fn was_called_with(&self, input: &Value) -> bool {
        self.history().iter().any(|call| &call.input == input)
    }

    /// Reset call history
    pub fn reset(&self) {
        self.history().clear();
    }

    fn history(&self) -> MutexGuard<'_, Vec<MockCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Agent for MockAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, input: &Value, ctx: &ExecutionContext) -> Result<Value, ExecutionFailure> {
        self.history().push(MockCall {
            input: input.clone(),
            tier: ctx.tier(),
            correlation_id: ctx.correlation_id().cloned(),
        });

        match &self.behavior {
            MockBehavior::Echo => Ok(input.clone()),
            MockBehavior::Respond(output) => Ok(output.clone()),
            MockBehavior::Fail(message) => Err(ExecutionFailure::Internal(message.clone())),
            MockBehavior::Panic(message) => panic!("{message}"),
        }
    }
}

/// Memory store that rejects every operation.
///
/// Counts attempts so tests can check that the engine did try to write.
#[derive(Debug, Clone, Default)]
pub struct FailingMemoryStore {
    attempts: Arc<AtomicUsize>,
}

impl FailingMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail<T>(&self, operation: &'static str, id: &CorrelationId) -> MemoryResult<T> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(MemoryError::operation_failed(
            operation,
            id.as_str(),
            "mock store failure",
        ))
    }
}

impl MemoryStore for FailingMemoryStore {
    fn get(&self, correlation_id: &CorrelationId) -> MemoryResult<Option<MemoryRecord>> {
        self.fail("get", correlation_id)
    }

    fn ensure(&self, correlation_id: &CorrelationId, _tier: Tier) -> MemoryResult<MemoryRecord> {
        self.fail("ensure", correlation_id)
    }

    fn upsert(&self, record: MemoryRecord) -> MemoryResult<MemoryRecord> {
        self.fail("upsert", &record.correlation_id)
    }

    fn len(&self) -> usize {
        0
    }
}
