//! # Agent
//!
//! The single capability every agent offers: turn a structured input and an
//! execution context into a structured output.

use serde_json::{Map, Value};

use crate::context::ExecutionContext;
use crate::error::ExecutionFailure;

/// A named, stateless unit of deterministic logic.
///
/// Agents are created fresh by the registry for every dispatch and dropped
/// when the call returns, so an implementation must not rely on state
/// surviving between calls. Anything worth keeping goes through the memory
/// store, which only the dispatch engine writes to.
///
/// For a fixed `(input, ctx)` an agent must return the same shape every
/// time. Contents may depend on [`ExecutionContext::tier`].
///
/// # Example
///
/// ```rust
/// use serde_json::{json, Value};
/// use strata_core::{Agent, AgentInput, ExecutionContext, ExecutionFailure, Tier};
///
/// #[derive(Default)]
/// struct GreeterAgent;
///
/// impl Agent for GreeterAgent {
///     fn name(&self) -> &str {
///         "greeter"
///     }
///
///     fn run(&self, input: &Value, ctx: &ExecutionContext) -> Result<Value, ExecutionFailure> {
///         let who = AgentInput::new(input)?.text("name")?;
///         Ok(json!({ "greeting": format!("Hello {who} ({})", ctx.tier()) }))
///     }
/// }
///
/// let out = GreeterAgent.run(&json!({"name": "Ada"}), &ExecutionContext::new(Tier::Business));
/// assert_eq!(out.unwrap()["greeting"], "Hello Ada (business)");
/// ```
pub trait Agent: Send {
    /// Name the agent is registered under.
    fn name(&self) -> &str;

    /// Execute the agent.
    fn run(&self, input: &Value, ctx: &ExecutionContext) -> Result<Value, ExecutionFailure>;
}

/// Lenient reader over an agent's JSON input.
///
/// Optional fields that are absent (or `null`) read as neutral values: an
/// empty string or an empty list. Scalars are coerced to text. Only fields
/// that are present with an unusable shape are rejected.
#[derive(Debug, Clone, Copy)]
pub struct AgentInput<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> AgentInput<'a> {
    /// Wrap an input payload. `null` is treated as an empty object.
    pub fn new(payload: &'a Value) -> Result<Self, ExecutionFailure> {
        match payload {
            Value::Object(fields) => Ok(Self {
                fields: Some(fields),
            }),
            Value::Null => Ok(Self { fields: None }),
            other => Err(ExecutionFailure::invalid_input(
                "input",
                format!("expected an object, got {}", json_type(other)),
            )),
        }
    }

    fn field(&self, name: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|fields| fields.get(name))
            .filter(|value| !value.is_null())
    }

    /// Read a trimmed text field, defaulting to `""`.
    pub fn text(&self, name: &str) -> Result<String, ExecutionFailure> {
        match self.field(name) {
            None => Ok(String::new()),
            Some(value) => scalar_text(value)
                .map(|text| text.trim().to_string())
                .ok_or_else(|| {
                    ExecutionFailure::invalid_input(
                        name,
                        format!("expected text, got {}", json_type(value)),
                    )
                }),
        }
    }

    /// Read a list of text items, defaulting to an empty list.
    pub fn text_list(&self, name: &str) -> Result<Vec<String>, ExecutionFailure> {
        let Some(value) = self.field(name) else {
            return Ok(Vec::new());
        };
        let Value::Array(items) = value else {
            return Err(ExecutionFailure::invalid_input(
                name,
                format!("expected an array, got {}", json_type(value)),
            ));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                scalar_text(item).ok_or_else(|| {
                    ExecutionFailure::invalid_input(
                        format!("{name}[{index}]"),
                        format!("expected text, got {}", json_type(item)),
                    )
                })
            })
            .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
