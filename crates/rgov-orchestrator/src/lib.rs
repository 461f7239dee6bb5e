//! # rgov-orchestrator
//!
//! Ties the pure policy core (`rgov-core`) to the kernel adapters
//! (`rgov-kernel`) via a fixed-order window loop, plus configuration
//! loading and the decision log. Depends on both, per the one-way
//! dependency graph of spec §2.

pub mod config;
pub mod error;
pub mod log;
pub mod orchestrator;

pub use config::{Config, WorkloadConfig};
pub use error::{ConfigError, OrchestratorError};
pub use log::DecisionLog;
pub use orchestrator::Orchestrator;
