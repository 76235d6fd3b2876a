//! # Strata Testing
//!
//! Test doubles and a small harness for exercising the dispatch engine.
//!
//! - **Mock agents**: scripted output, failures and panics, with call
//!   tracking shared across the fresh instances the registry builds
//! - **Failing memory store**: a backend that rejects every operation
//! - **Engine harness**: an engine wired with mocks and an inspectable store
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use strata_testing::{DispatchScenario, EngineHarnessBuilder, MockAgent};
//!
//! let planner = MockAgent::responding("planner", json!({"plan": ["step"]}));
//! let harness = EngineHarnessBuilder::new()
//!     .with_mock_agent(planner.clone())
//!     .build();
//!
//! let result = harness.run_scenario(
//!     &DispatchScenario::new("planner", json!({"goal": "g"})).with_correlation_id("c-1"),
//! );
//!
//! assert!(result.is_success());
//! assert_eq!(planner.call_count(), 1);
//! assert_eq!(harness.record("c-1").unwrap().last_agent(), Some("planner"));
//! ```

pub mod harness;
pub mod mock_agents;

pub use harness::{DispatchScenario, EngineHarness, EngineHarnessBuilder, ScenarioResult};
pub use mock_agents::{FailingMemoryStore, MockAgent, MockBehavior, MockCall};
