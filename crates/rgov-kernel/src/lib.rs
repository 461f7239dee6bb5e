//! # rgov-kernel
//!
//! Concrete Observation and Enforcement adapters (spec §4.2, §4.3),
//! plus the recorded/null variants the replay harness and tests
//! substitute in place of a real kernel. `rgov-core` never depends on
//! this crate — dependencies run strictly one-way, orchestrator to
//! adapters to kernel.

pub mod enforcement;
pub mod error;
pub mod observation;

pub use enforcement::{EnforcementAdapter, KernelEnforcement, NullEnforcement};
pub use error::{EnforcementError, ObservationError};
pub use observation::{KernelObservation, ObservationAdapter, RecordedObservation};
