use std::collections::{BTreeMap, HashMap};
use std::fmt;

use strata_core::{Agent, RegistryError, RegistryResult};
use tracing::{debug, warn};

/// Trait for producing fresh agent instances.
///
/// A factory is called once per dispatch. Each call must return a new
/// instance so that no state is shared between requests.
pub trait AgentFactory: Send + Sync {
    /// Build a brand-new agent.
    fn create(&self) -> Box<dyn Agent>;

    /// Human-readable label for the kind of agent this factory builds.
    fn type_label(&self) -> &str;
}

/// [`AgentFactory`] backed by a closure.
pub struct FnAgentFactory<F> {
    label: String,
    build: F,
}

impl<F> FnAgentFactory<F>
where
    F: Fn() -> Box<dyn Agent> + Send + Sync,
{
    pub fn new(label: impl Into<String>, build: F) -> Self {
        Self {
            label: label.into(),
            build,
        }
    }
}

impl<F> AgentFactory for FnAgentFactory<F>
where
    F: Fn() -> Box<dyn Agent> + Send + Sync,
{
    fn create(&self) -> Box<dyn Agent> {
        (self.build)()
    }

    fn type_label(&self) -> &str {
        &self.label
    }
}

/// In-memory agent registry.
///
/// Populated once at process start by the composition root, then shared
/// read-only (typically as `Arc<AgentRegistry>`). Registration takes
/// `&mut self`, so nothing can register once the registry is shared.
///
/// # Example
///
/// ```rust
/// use serde_json::{json, Value};
/// use strata_agents::AgentRegistry;
/// use strata_core::{Agent, ExecutionContext, ExecutionFailure};
///
/// #[derive(Default)]
/// struct EchoAgent;
///
/// impl Agent for EchoAgent {
///     fn name(&self) -> &str { "echo" }
///     fn run(&self, input: &Value, _ctx: &ExecutionContext) -> Result<Value, ExecutionFailure> {
///         Ok(input.clone())
///     }
/// }
///
/// let registry = AgentRegistry::new().with_agent("echo", EchoAgent::default);
///
/// let agent = registry.resolve("echo").unwrap();
/// assert_eq!(agent.name(), "echo");
/// assert_eq!(registry.list()["echo"], "EchoAgent");
/// assert!(registry.resolve("missing").is_err());
/// ```
#[derive(Default)]
pub struct AgentRegistry {
    factories: HashMap<String, Box<dyn AgentFactory>>,
}

impl AgentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for a concrete agent type.
    ///
    /// The type label reported by [`list`](Self::list) is the agent's Rust
    /// type name. A later registration under the same name replaces this one.
    pub fn register<A, F>(&mut self, name: impl Into<String>, factory: F)
    where
        A: Agent + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        let label = short_type_name::<A>();
        self.register_factory(
            name,
            Box::new(FnAgentFactory::new(label, move || {
                Box::new(factory()) as Box<dyn Agent>
            })),
        );
    }

    /// Register `A::default` as the constructor for `name`.
    pub fn register_type<A>(&mut self, name: impl Into<String>)
    where
        A: Agent + Default + 'static,
    {
        self.register(name, A::default);
    }

    /// Register a type-erased factory with its own label.
    pub fn register_factory(&mut self, name: impl Into<String>, factory: Box<dyn AgentFactory>) {
        let name = name.into();
        if let Some(previous) = self.factories.get(&name) {
            debug!(
                agent = %name,
                previous = previous.type_label(),
                replacement = factory.type_label(),
                "Replacing registered agent"
            );
        }
        self.factories.insert(name, factory);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_agent<A, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        A: Agent + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Build a fresh agent instance for `name`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if nothing is registered under `name`.
    pub fn resolve(&self, name: &str) -> RegistryResult<Box<dyn Agent>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RegistryError::not_found(name))?;

        let agent = factory.create();
        if agent.name() != name {
            warn!(
                registered_as = name,
                reports_as = agent.name(),
                "Agent name does not match its registry key"
            );
        }
        Ok(agent)
    }

    /// Registered names and their type labels, sorted by name.
    pub fn list(&self) -> BTreeMap<String, String> {
        self.factories
            .iter()
            .map(|(name, factory)| (name.clone(), factory.type_label().to_string()))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.list())
            .finish()
    }
}

/// Last path segment of a type name, e.g. `OrchestratorAgent`.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
