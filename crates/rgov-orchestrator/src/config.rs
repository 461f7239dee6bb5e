//! Workload configuration loading (spec §6, expanded in SPEC_FULL §10.3).

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Default window size, in microseconds, when `window_size_us` is
/// absent from the config file (spec §3).
pub const DEFAULT_WINDOW_SIZE_US: u64 = 100_000;

#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadConfig {
    pub id: String,
    pub budget_us: u64,
    pub cgroup_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_window_size_us")]
    pub window_size_us: u64,
    pub capacity_us: u64,
    #[serde(rename = "workload", default)]
    pub workloads: Vec<WorkloadConfig>,
}

fn default_window_size_us() -> u64 {
    DEFAULT_WINDOW_SIZE_US
}

impl Config {
    /// Load and validate a config from a TOML file. Validation failures
    /// (duplicate ids, `Σ B > C`) are `ConfigError`s and the process
    /// must refuse to start (spec §7).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate I7 and the structural constraints of spec §6/§7.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(self.workloads.len());
        for w in &self.workloads {
            if !seen.insert(w.id.as_str()) {
                return Err(ConfigError::DuplicateWorkload { id: w.id.clone() });
            }
        }

        let total_budget: u128 = self.workloads.iter().map(|w| u128::from(w.budget_us)).sum();
        if total_budget > u128::from(self.capacity_us) {
            return Err(ConfigError::CapacityExceeded {
                total_budget_us: total_budget,
                capacity_us: self.capacity_us,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgov.toml");
        std::fs::write(
            &path,
            r#"
            capacity_us = 200000

            [[workload]]
            id = "a"
            budget_us = 80000
            cgroup_path = "/sys/fs/cgroup/a"

            [[workload]]
            id = "b"
            budget_us = 50000
            cgroup_path = "/sys/fs/cgroup/b"
            "#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.window_size_us, DEFAULT_WINDOW_SIZE_US);
        assert_eq!(config.workloads.len(), 2);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgov.toml");
        std::fs::write(
            &path,
            r#"
            capacity_us = 200000

            [[workload]]
            id = "a"
            budget_us = 80000
            cgroup_path = "/sys/fs/cgroup/a"

            [[workload]]
            id = "a"
            budget_us = 10000
            cgroup_path = "/sys/fs/cgroup/a2"
            "#,
        )
        .unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::DuplicateWorkload { .. })
        ));
    }

    #[test]
    fn rejects_capacity_overcommit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgov.toml");
        std::fs::write(
            &path,
            r#"
            capacity_us = 100000

            [[workload]]
            id = "a"
            budget_us = 80000
            cgroup_path = "/sys/fs/cgroup/a"

            [[workload]]
            id = "b"
            budget_us = 50000
            cgroup_path = "/sys/fs/cgroup/b"
            "#,
        )
        .unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::CapacityExceeded { .. })
        ));
    }
}
