//! Error Types
//!
//! Typed failures for the dispatch layer. None of these ever reach a caller
//! of the dispatch engine directly: the engine folds them into a
//! [`ResultEnvelope`](crate::ResultEnvelope) and keeps the detail for its own
//! diagnostic log.
//!
//! - `dispatch`: registry lookup, agent execution and their union
//! - `memory`: memory store failures

mod dispatch;
mod memory;

pub use dispatch::{DispatchError, ExecutionFailure, RegistryError, RegistryResult};
pub use memory::{MemoryError, MemoryResult};
