//! The Enforcement adapter (spec §4.3).
//!
//! `apply(workload_id, T_w, W)` writes the quota/period pair to the
//! kernel control sink. A write-through cache makes repeated
//! application with the same `(T_w, W)` a no-op: the core must never
//! issue more than one kernel write per decision per window, and the
//! spec's idempotence property (§8) requires zero observable
//! difference between applying once and applying twice.

use crate::error::EnforcementError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Polymorphic enforcement sink, a closed tagged set per spec §9.
pub enum EnforcementAdapter {
    /// Writes `{cgroup_path}/cpu.max` as `"<T> <W>"`.
    Kernel(KernelEnforcement),
    /// Records applied `(T, W)` pairs in memory; used by the replay
    /// harness, which performs no kernel writes at all.
    Null(NullEnforcement),
}

impl EnforcementAdapter {
    pub fn apply(&mut self, workload_id: &str, quota_us: u64, window_us: u64) -> Result<(), EnforcementError> {
        match self {
            Self::Kernel(k) => k.apply(workload_id, quota_us, window_us),
            Self::Null(n) => n.apply(workload_id, quota_us, window_us),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Applied {
    quota_us: u64,
    window_us: u64,
}

/// Writes the quota/period pair to a real cgroup v2 `cpu.max` file.
#[derive(Debug, Default)]
pub struct KernelEnforcement {
    cgroup_paths: HashMap<String, PathBuf>,
    last_applied: HashMap<String, Applied>,
}

impl KernelEnforcement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, workload_id: impl Into<String>, cgroup_path: impl Into<PathBuf>) {
        self.cgroup_paths.insert(workload_id.into(), cgroup_path.into());
    }

    pub fn apply(&mut self, workload_id: &str, quota_us: u64, window_us: u64) -> Result<(), EnforcementError> {
        let desired = Applied { quota_us, window_us };

        if self.last_applied.get(workload_id) == Some(&desired) {
            debug!(workload_id, quota_us, window_us, "enforcement: already applied, skipping write");
            return Ok(());
        }

        let cgroup_path = self
            .cgroup_paths
            .get(workload_id)
            .ok_or_else(|| EnforcementError::UnknownWorkload {
                workload_id: workload_id.to_string(),
            })?
            .clone();

        write_cpu_max(&cgroup_path, quota_us, window_us)?;
        self.last_applied.insert(workload_id.to_string(), desired);
        Ok(())
    }
}

fn write_cpu_max(cgroup_path: &Path, quota_us: u64, window_us: u64) -> Result<(), EnforcementError> {
    let max_path = cgroup_path.join("cpu.max");
    std::fs::write(&max_path, format!("{quota_us} {window_us}\n")).map_err(|source| EnforcementError::WriteFailed {
        path: max_path.display().to_string(),
        source,
    })
}

/// Records applied `(T, W)` pairs per workload in memory. Never
/// touches the filesystem. Used by the replay harness (spec §4.5),
/// whose equality law depends only on `DecisionRecord`s, never on
/// side effects.
#[derive(Debug, Default)]
pub struct NullEnforcement {
    applied: HashMap<String, Vec<(u64, u64)>>,
}

impl NullEnforcement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, workload_id: &str, quota_us: u64, window_us: u64) -> Result<(), EnforcementError> {
        self.applied
            .entry(workload_id.to_string())
            .or_default()
            .push((quota_us, window_us));
        Ok(())
    }

    /// All `(T, W)` pairs applied to a workload, in application order.
    pub fn history(&self, workload_id: &str) -> &[(u64, u64)] {
        self.applied.get(workload_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_enforcement_writes_cpu_max() {
        let dir = tempfile::tempdir().unwrap();
        let mut enf = KernelEnforcement::new();
        enf.register("w1", dir.path());

        enf.apply("w1", 50_000, 100_000).unwrap();

        let content = std::fs::read_to_string(dir.path().join("cpu.max")).unwrap();
        assert_eq!(content, "50000 100000\n");
    }

    #[test]
    fn repeated_apply_with_same_values_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut enf = KernelEnforcement::new();
        enf.register("w1", dir.path());

        enf.apply("w1", 50_000, 100_000).unwrap();
        std::fs::write(dir.path().join("cpu.max"), "tampered").unwrap();
        enf.apply("w1", 50_000, 100_000).unwrap();

        // The write-through cache skips the redundant write — the
        // tampered content is untouched, proving no second write occurred.
        let content = std::fs::read_to_string(dir.path().join("cpu.max")).unwrap();
        assert_eq!(content, "tampered");
    }

    #[test]
    fn changed_quota_triggers_a_new_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut enf = KernelEnforcement::new();
        enf.register("w1", dir.path());

        enf.apply("w1", 50_000, 100_000).unwrap();
        enf.apply("w1", 0, 100_000).unwrap();

        let content = std::fs::read_to_string(dir.path().join("cpu.max")).unwrap();
        assert_eq!(content, "0 100000\n");
    }

    #[test]
    fn null_enforcement_records_history() {
        let mut enf = NullEnforcement::new();
        enf.apply("w1", 100_000, 100_000).unwrap();
        enf.apply("w1", 50_000, 100_000).unwrap();

        assert_eq!(enf.history("w1"), &[(100_000, 100_000), (50_000, 100_000)]);
    }
}
