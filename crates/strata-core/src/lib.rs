//! # Strata Core
//!
//! Core traits and types for the Strata dispatch layer. This crate holds the
//! vocabulary every other crate speaks: deployment tiers, the per-request
//! execution context, the agent capability, the result envelope handed back
//! to callers, and the contract for the request-scoped memory store.

pub mod agent;
pub mod context;
pub mod envelope;
pub mod error;
pub mod identifiers;
pub mod memory;
pub mod tier;

pub use agent::{Agent, AgentInput};
pub use context::{ExecutionContext, Metadata};
pub use envelope::ResultEnvelope;
pub use error::{
    DispatchError, ExecutionFailure, MemoryError, MemoryResult, RegistryError, RegistryResult,
};
pub use identifiers::CorrelationId;
pub use memory::{MemoryRecord, MemoryStore};
pub use tier::{Tier, TierParseError};
