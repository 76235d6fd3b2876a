//! # Strata Runtime
//!
//! The dispatch engine and the pieces a process needs around it:
//! configuration loading and a composition root that wires the standard
//! agents and the in-process memory store together.

pub mod config;
pub mod engine;
pub mod service;

pub use config::{ConfigError, ConfigResult, RuntimeConfig, RuntimeConfigBuilder};
pub use engine::DispatchEngine;
pub use service::{ServiceInfo, TierReport, build_engine, default_registry};
