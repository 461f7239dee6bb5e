//! # rgov-core
//!
//! The pure windowed CPU policy state machine at the heart of rgov.
//!
//! This crate has exactly one job: map `(prior state, observed
//! microseconds, declared budget, window size)` to `(next state,
//! enforced quota, decision fragment)`. It does no I/O, owns no clock,
//! and never spawns a thread — every other crate in the workspace
//! exists to feed this one real observations and carry its decisions
//! out to the kernel.

pub mod error;
pub mod policy;
pub mod types;

pub use error::{PolicyError, Result};
pub use policy::{check_fragment, step, StepOutput};
pub use types::{DecisionFragment, DecisionRecord, Mode, PolicyState, RuleId};
