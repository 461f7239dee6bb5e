//! The replay scenario file format (spec §4.5, SPEC_FULL §11/§12).
//!
//! A scenario is a fixed sequence of per-workload observations, paired
//! at replay time with a real config file (workload ids must match).
//! Replaying the same scenario against the same config twice must
//! produce byte-identical decision logs — the entire point of keeping
//! `rgov-core` free of clocks, randomness, and I/O.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `workload_id -> [(window, observed_us), ...]`.
    pub observations: HashMap<String, Vec<(u64, u64)>>,
    /// Number of windows to replay.
    pub windows: u64,
}
