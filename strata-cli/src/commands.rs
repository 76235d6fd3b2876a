//! Subcommand implementations.

use std::process::ExitCode;

use serde::Serialize;
use serde_json::{Map, Value};
use strata_core::{CorrelationId, ExecutionContext, MemoryError, MemoryRecord, ResultEnvelope};
use strata_runtime::{ConfigError, DispatchEngine, RuntimeConfig, ServiceInfo, TierReport};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid --input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Arguments of `strata dispatch`.
#[derive(Debug, Clone, Default)]
pub struct DispatchArgs {
    pub agent: String,
    pub input: Option<String>,
    pub goal: Option<String>,
    pub constraints: Vec<String>,
    pub tier: Option<String>,
    pub correlation_id: Option<String>,
    pub show_memory: bool,
}

#[derive(Serialize)]
struct DispatchReport<'a> {
    result: &'a ResultEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory: Option<Option<MemoryRecord>>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run_agents(engine: &DispatchEngine) -> Result<ExitCode, CliError> {
    print_json(&engine.registry().list())?;
    Ok(ExitCode::SUCCESS)
}

pub fn run_tier(raw: Option<&str>) -> Result<ExitCode, CliError> {
    print_json(&TierReport::resolve(raw))?;
    Ok(ExitCode::SUCCESS)
}

pub fn run_meta(config: &RuntimeConfig) -> Result<ExitCode, CliError> {
    print_json(&ServiceInfo::from_config(config))?;
    Ok(ExitCode::SUCCESS)
}

pub fn run_dispatch(engine: &DispatchEngine, args: DispatchArgs) -> Result<ExitCode, CliError> {
    let input = build_input(args.input.as_deref(), args.goal, args.constraints)?;

    let mut ctx = ExecutionContext::from_raw(args.tier.as_deref(), args.correlation_id.as_deref());
    if args.show_memory && ctx.correlation_id().is_none() {
        ctx = ctx.with_correlation_id(CorrelationId::generate());
    }

    let envelope = engine.dispatch(&args.agent, &input, &ctx);

    let memory = match (args.show_memory, ctx.correlation_id()) {
        (true, Some(id)) => Some(engine.memory().get(id)?),
        _ => None,
    };

    print_json(&DispatchReport {
        result: &envelope,
        memory,
    })?;

    Ok(if envelope.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Merge `--input`, `--goal` and `--constraint` into one payload.
///
/// `--input` must be a JSON object when given; the flags overwrite the
/// matching keys.
pub fn build_input(
    raw: Option<&str>,
    goal: Option<String>,
    constraints: Vec<String>,
) -> Result<Value, CliError> {
    let mut payload = match raw {
        Some(raw) => match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => map,
            other => {
                return Err(CliError::InvalidInput(format!(
                    "expected a JSON object, got {other}"
                )));
            }
        },
        None => Map::new(),
    };

    if let Some(goal) = goal {
        payload.insert("goal".to_string(), Value::String(goal));
    }
    if !constraints.is_empty() {
        payload.insert(
            "constraints".to_string(),
            Value::Array(constraints.into_iter().map(Value::String).collect()),
        );
    }

    Ok(Value::Object(payload))
}
