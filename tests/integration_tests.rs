//! Integration Tests for End-to-End Dispatch
//!
//! These tests drive the public facade the way a transport would: build a
//! context from raw caller values, dispatch, and inspect the envelope and
//! the memory store.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use rstest::rstest;
use serde_json::{Value, json};
use strata::{
    CorrelationId, DispatchEngine, ExecutionContext, InMemoryStore, MemoryStore, Tier,
    default_registry,
};
use strata_testing::{EngineHarness, FailingMemoryStore, MockAgent};

fn engine_with_store() -> (DispatchEngine, InMemoryStore) {
    let store = InMemoryStore::new();
    let engine = DispatchEngine::new(Arc::new(default_registry()), Arc::new(store.clone()));
    (engine, store)
}

fn plan_of(output: &Value) -> Vec<String> {
    serde_json::from_value(output["plan"].clone()).expect("plan is a list of strings")
}

#[rstest]
#[case("nope")]
#[case("")]
#[case("Orchestrator")]
#[case("orchestrator ")]
fn test_unregistered_names_are_reported_verbatim(#[case] name: &str) {
    let (engine, store) = engine_with_store();
    let ctx = ExecutionContext::from_raw(None, Some("abc"));

    let envelope = engine.dispatch(name, &json!({"goal": "g"}), &ctx);

    assert!(!envelope.is_ok());
    assert_eq!(envelope.error(), Some(format!("Unknown agent: {name}").as_str()));
    assert_eq!(envelope.output(), &json!({}));
    assert!(store.is_empty(), "unknown agents must not write memory");
}

#[test]
fn test_failing_and_panicking_agents_never_escape() {
    let failing = MockAgent::failing("failing", "connection string leaked");
    let panicking = MockAgent::panicking("panicking", "index out of bounds");
    let harness = EngineHarness::builder()
        .with_mock_agent(failing.clone())
        .with_mock_agent(panicking.clone())
        .build();

    for name in ["failing", "panicking"] {
        let ctx = ExecutionContext::new(Tier::Government).with_correlation_id(name);
        let envelope = harness.dispatch(name, &json!({}), &ctx);

        assert!(!envelope.is_ok());
        assert_eq!(envelope.error(), Some("Agent execution failed"));
        assert_eq!(envelope.output(), &json!({}));
        let text = serde_json::to_string(&envelope).unwrap();
        assert!(!text.contains("leaked") && !text.contains("bounds"));

        let record = harness.record(name).expect("trace opened before run");
        assert_eq!(record.last_agent(), None);
    }

    assert_eq!(failing.call_count(), 1);
    assert_eq!(panicking.call_count(), 1);
}

#[test]
fn test_business_plan_end_to_end() {
    let (engine, _store) = engine_with_store();
    let ctx = ExecutionContext::from_raw(Some(" business "), None);

    let envelope = engine.dispatch(
        "orchestrator",
        &json!({"goal": "ship faster", "constraints": ["low budget"]}),
        &ctx,
    );

    assert!(envelope.is_ok());
    let plan = plan_of(envelope.output());
    let goal = plan.iter().position(|s| s.contains("ship faster")).unwrap();
    let audit = plan
        .iter()
        .position(|s| s.contains("audit-friendly logging"))
        .unwrap();
    let constraints = plan.iter().position(|s| s.contains("low budget")).unwrap();

    assert_eq!(goal, 0);
    assert!(goal < audit && audit < constraints);
}

#[test]
fn test_repeat_dispatch_updates_trace() {
    let (engine, store) = engine_with_store();
    let ctx = ExecutionContext::new(Tier::Personal).with_correlation_id("abc");
    let id = CorrelationId::new("abc");

    let first = engine.dispatch("orchestrator", &json!({"goal": "one"}), &ctx);
    let after_first = store.get(&id).unwrap().unwrap();
    let second = engine.dispatch("orchestrator", &json!({"goal": "two"}), &ctx);
    let after_second = store.get(&id).unwrap().unwrap();

    assert!(first.is_ok() && second.is_ok());
    assert_eq!(after_first.last_agent(), Some("orchestrator"));
    assert_eq!(after_second.last_agent(), Some("orchestrator"));
    assert!(after_second.updated_at > after_first.updated_at);
    assert_eq!(after_second.created_at, after_first.created_at);
    assert_eq!(after_second.last_output(), Some(second.output()));
}

#[test]
fn test_ensure_is_idempotent_through_the_trait_object() {
    let store: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
    let id = CorrelationId::new("same");

    let first = store.ensure(&id, Tier::Business).unwrap();
    let second = store.ensure(&id, Tier::Government).unwrap();

    assert_eq!(first.created_at, second.created_at);
    assert_eq!(second.tier, Tier::Business);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_last_agent_follows_the_latest_success() {
    let (engine, store) = engine_with_store();
    let ctx = ExecutionContext::new(Tier::Business).with_correlation_id("mixed");

    engine.dispatch("orchestrator", &json!({}), &ctx);
    engine.dispatch("deployment_reliability", &json!({}), &ctx);
    engine.dispatch("unknown", &json!({}), &ctx);

    let record = store.get(&CorrelationId::new("mixed")).unwrap().unwrap();
    assert_eq!(record.last_agent(), Some("deployment_reliability"));
    assert_eq!(record.last_output().unwrap()["agent"], "deployment_reliability");
}

#[test]
fn test_concurrent_dispatches_do_not_cross_contaminate() {
    let (engine, store) = engine_with_store();
    let tiers = Tier::ALL;

    thread::scope(|scope| {
        for worker in 0..12 {
            let engine = &engine;
            scope.spawn(move || {
                let tier = tiers[worker % tiers.len()];
                let ctx = ExecutionContext::new(tier).with_correlation_id(format!("req-{worker}"));
                for round in 0..20 {
                    let goal = format!("goal-{worker}-{round}");
                    let envelope = engine.dispatch("orchestrator", &json!({"goal": goal}), &ctx);
                    assert!(envelope.is_ok());
                }
            });
        }
    });

    assert_eq!(store.len(), 12);
    let ids: HashSet<_> = store.correlation_ids().into_iter().collect();
    for worker in 0..12 {
        let id = CorrelationId::new(format!("req-{worker}"));
        assert!(ids.contains(&id));

        let record = store.get(&id).unwrap().unwrap();
        assert_eq!(record.tier, tiers[worker % tiers.len()]);
        let plan = plan_of(record.last_output().unwrap());
        assert_eq!(plan[0], format!("Analyze goal: goal-{worker}-19"));
        assert_eq!(plan[1], format!("Tier: {}", record.tier));
    }
}

#[test]
fn test_memory_outage_is_invisible_to_callers() {
    let store = FailingMemoryStore::new();
    let harness = EngineHarness::builder()
        .with_standard_agents()
        .with_memory_store(Arc::new(store.clone()))
        .build();
    let ctx = ExecutionContext::new(Tier::Business).with_correlation_id("down");

    let envelope = harness.dispatch("deployment_reliability", &json!({"goal": "g"}), &ctx);

    assert!(envelope.is_ok());
    assert_eq!(envelope.output()["tier"], "business");
    assert!(store.attempts() >= 1);
}

#[test]
fn test_fresh_agent_instance_per_dispatch() {
    let mock = MockAgent::new("echo");
    let harness = EngineHarness::builder().with_mock_agent(mock.clone()).build();

    let ctx = ExecutionContext::from_raw(Some("GOVERNMENT"), Some("e"));
    for n in 0..3 {
        let envelope = harness.dispatch("echo", &json!({"n": n}), &ctx);
        assert_eq!(envelope.output(), &json!({"n": n}));
    }

    let calls = mock.call_history();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|call| call.tier == Tier::Government));
    assert!(mock.was_called_with(&json!({"n": 2})));
}

#[test]
fn test_envelope_wire_shape() {
    let (engine, _store) = engine_with_store();
    let ctx = ExecutionContext::from_raw(Some("alien"), Some("wire"));

    let ok = serde_json::to_value(engine.dispatch("orchestrator", &json!({}), &ctx)).unwrap();
    assert_eq!(ok["ok"], true);
    assert_eq!(ok["error"], Value::Null);
    assert_eq!(ok["tier"], "personal");
    assert_eq!(ok["correlation_id"], "wire");
    assert_eq!(ok["agent"], "orchestrator");

    let failed = serde_json::to_value(engine.dispatch("x", &json!({}), &ctx)).unwrap();
    assert_eq!(failed["ok"], false);
    assert_eq!(failed["error"], "Unknown agent: x");
    assert_eq!(failed["output"], json!({}));
}
