//! # Strata Memory
//!
//! Backends for the correlation-id-keyed [`MemoryStore`](strata_core::MemoryStore).
//!
//! Only an in-process backend ships today. Records vanish on restart; there
//! is no eviction, expiry or capacity bound.

pub mod in_memory;

pub use in_memory::InMemoryStore;
pub use strata_core::{MemoryError, MemoryRecord, MemoryResult, MemoryStore};
