use thiserror::Error;

/// Errors raised by the pure policy engine.
///
/// Both variants are fatal per spec §4.1/§7: the engine does not
/// recover, it reports and the caller halts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// One of I1–I3 or I5 failed for a single step. These are checkable
    /// from the step's own inputs and outputs alone.
    #[error("invariant {id} violated: {detail}")]
    InvariantViolation { id: &'static str, detail: String },

    /// A microsecond quantity could not be represented without wrapping.
    #[error("arithmetic overflow: {detail}")]
    Overflow { detail: String },
}

pub type Result<T> = std::result::Result<T, PolicyError>;
