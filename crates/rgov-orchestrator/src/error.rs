//! Error taxonomy for configuration loading and orchestration.

use rgov_core::PolicyError;
use rgov_kernel::{EnforcementError, ObservationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read { path: String, #[source] source: std::io::Error },

    #[error("cannot parse config file {path}: {source}")]
    Parse { path: String, #[source] source: toml::de::Error },

    #[error("duplicate workload id {id:?}")]
    DuplicateWorkload { id: String },

    #[error("sum of workload budgets ({total_budget_us}us) exceeds capacity ({capacity_us}us)")]
    CapacityExceeded { total_budget_us: u128, capacity_us: u64 },
}

/// Umbrella error for a running orchestrator. Each variant maps to a
/// distinct CLI exit code (see SPEC_FULL §11).
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Enforcement(#[from] EnforcementError),

    #[error("unknown workload id {workload_id:?} referenced in decision log or registry")]
    UnknownWorkload { workload_id: String },

    #[error("invariant I4 violated for workload {workload_id:?} at window {window}: throttled with no prior overshoot")]
    ThrottleWithoutOvershoot { workload_id: String, window: u64 },

    #[error("failed to append decision log entry for workload {workload_id:?} at window {window}: {source}")]
    DecisionLogWrite {
        workload_id: String,
        window: u64,
        #[source]
        source: std::io::Error,
    },
}
