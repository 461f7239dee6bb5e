//! The Observation adapter (spec §4.2).
//!
//! `sample(workload_id, w)` is called exactly once per workload per
//! window, at the boundary of `w`, and returns the non-negative delta
//! of a monotonic cumulative counter. Variants are a closed, tagged
//! set — `Kernel`, `Recorded`, `Null` — per the Design Notes in spec
//! §9; the orchestrator is the only caller and never inspects which
//! variant it holds.

use crate::error::ObservationError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One sampled window for the `Recorded` variant: `(window, U_w)`.
pub type RecordedPoint = (u64, u64);

/// Polymorphic observation source. A closed, tagged set rather than a
/// trait object: Policy never sees any of these, only the orchestrator
/// does, so there is no need for dynamic dispatch across crate
/// boundaries.
pub enum ObservationAdapter {
    /// Reads a real cgroup v2 `cpu.stat` `usage_usec` counter.
    Kernel(KernelObservation),
    /// Replays a recorded sequence; used by the replay harness.
    Recorded(RecordedObservation),
    /// Always returns 0; used in tests that don't care about usage.
    Null,
}

impl ObservationAdapter {
    pub fn sample(&mut self, workload_id: &str, window: u64) -> Result<u64, ObservationError> {
        match self {
            Self::Kernel(k) => k.sample(workload_id, window),
            Self::Recorded(r) => r.sample(workload_id, window),
            Self::Null => Ok(0),
        }
    }
}

/// Reads `{cgroup_path}/cpu.stat`'s `usage_usec` field and converts it
/// to a per-window delta. The first sample after registration seeds
/// the baseline and returns `U_0 = 0`, per spec §4.2.
#[derive(Debug, Default)]
pub struct KernelObservation {
    cgroup_paths: HashMap<String, PathBuf>,
    baselines: HashMap<String, u64>,
}

impl KernelObservation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workload's cgroup directory. Call once per workload
    /// at startup, before the first `sample`.
    pub fn register(&mut self, workload_id: impl Into<String>, cgroup_path: impl Into<PathBuf>) {
        self.cgroup_paths.insert(workload_id.into(), cgroup_path.into());
    }

    pub fn sample(&mut self, workload_id: &str, _window: u64) -> Result<u64, ObservationError> {
        let cgroup_path = self
            .cgroup_paths
            .get(workload_id)
            .ok_or_else(|| ObservationError::UnknownWorkload {
                workload_id: workload_id.to_string(),
            })?
            .clone();

        let cumulative = read_usage_usec(&cgroup_path)?;

        let baseline = self.baselines.entry(workload_id.to_string()).or_insert(cumulative);
        if cumulative < *baseline {
            return Err(ObservationError::NonMonotonic {
                workload_id: workload_id.to_string(),
                previous: *baseline,
                current: cumulative,
            });
        }
        let delta = cumulative - *baseline;
        *baseline = cumulative;
        Ok(delta)
    }
}

fn read_usage_usec(cgroup_path: &Path) -> Result<u64, ObservationError> {
    let stat_path = cgroup_path.join("cpu.stat");
    let content = std::fs::read_to_string(&stat_path).map_err(|source| ObservationError::Unreadable {
        path: stat_path.display().to_string(),
        source,
    })?;

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("usage_usec ") {
            return rest
                .trim()
                .parse::<u64>()
                .map_err(|e| ObservationError::Parse {
                    path: stat_path.display().to_string(),
                    detail: e.to_string(),
                });
        }
    }

    Err(ObservationError::MissingField {
        path: stat_path.display().to_string(),
    })
}

/// Replays a fixed, pre-recorded sequence of `(window, U_w)` points per
/// workload. Used by `rgov-replay` to drive the orchestrator without
/// any kernel or clock involvement (spec §4.5).
#[derive(Debug, Default)]
pub struct RecordedObservation {
    points: HashMap<String, HashMap<u64, u64>>,
}

impl RecordedObservation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the recorded points for one workload.
    pub fn load(&mut self, workload_id: impl Into<String>, points: impl IntoIterator<Item = RecordedPoint>) {
        self.points
            .insert(workload_id.into(), points.into_iter().collect());
    }

    pub fn sample(&mut self, workload_id: &str, window: u64) -> Result<u64, ObservationError> {
        self.points
            .get(workload_id)
            .and_then(|m| m.get(&window))
            .copied()
            .ok_or_else(|| ObservationError::RecordingExhausted {
                workload_id: workload_id.to_string(),
                window,
            })
    }
}
