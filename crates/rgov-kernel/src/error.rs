use thiserror::Error;

/// Errors from the Observation adapter (spec §4.2, §7).
///
/// All variants are fatal for the window: the adapter never
/// substitutes a guess for an unreadable or non-monotonic counter.
#[derive(Debug, Error)]
pub enum ObservationError {
    #[error("workload {workload_id} has no registered cgroup path")]
    UnknownWorkload { workload_id: String },

    #[error("cannot read cumulative counter at {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cumulative counter at {path} did not contain a usage_usec field")]
    MissingField { path: String },

    #[error("cumulative counter at {path} could not be parsed: {detail}")]
    Parse { path: String, detail: String },

    #[error(
        "workload {workload_id}: cumulative counter went backwards ({previous} -> {current})"
    )]
    NonMonotonic {
        workload_id: String,
        previous: u64,
        current: u64,
    },

    #[error("recorded observation missing for workload {workload_id} at window {window}")]
    RecordingExhausted { workload_id: String, window: u64 },
}

/// Errors from the Enforcement adapter (spec §4.3, §7).
///
/// Logged and reported; per spec §4.3/§7 this never mutates or rolls
/// back already-committed policy state.
#[derive(Debug, Error)]
pub enum EnforcementError {
    #[error("workload {workload_id} has no registered cgroup path")]
    UnknownWorkload { workload_id: String },

    #[error("cannot write quota/period to {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
