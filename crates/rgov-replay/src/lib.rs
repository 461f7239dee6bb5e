//! # rgov-replay
//!
//! Drives `rgov-orchestrator` with `ObservationAdapter::Recorded` and
//! `EnforcementAdapter::Null`, so a recorded scenario can be replayed
//! against a real config with zero side effects and a fully
//! deterministic decision sequence (spec §4.5).

pub mod scenario;

use rgov_core::DecisionRecord;
use rgov_kernel::{EnforcementAdapter, NullEnforcement, ObservationAdapter, RecordedObservation};
use rgov_orchestrator::{Config, DecisionLog, Orchestrator, OrchestratorError};
use scenario::Scenario;

/// Replay a scenario against a config to completion and return the
/// full `DecisionRecord` sequence, in emission order, with no
/// filesystem or kernel access.
pub fn replay(config: &Config, scenario: &Scenario) -> Result<Vec<DecisionRecord>, OrchestratorError> {
    let mut recorded = RecordedObservation::new();
    for workload in &config.workloads {
        let points = scenario.observations.get(&workload.id).cloned().unwrap_or_default();
        recorded.load(workload.id.clone(), points);
    }

    let mut orchestrator = Orchestrator::start(
        config,
        ObservationAdapter::Recorded(recorded),
        EnforcementAdapter::Null(NullEnforcement::new()),
        DecisionLog::memory(),
    )?;

    for _ in 0..scenario.windows {
        orchestrator.tick()?;
    }

    Ok(orchestrator.log().records().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgov_orchestrator::WorkloadConfig;
    use std::collections::HashMap;

    fn config() -> Config {
        Config {
            window_size_us: 100_000,
            capacity_us: 100_000,
            workloads: vec![WorkloadConfig {
                id: "w1".to_string(),
                budget_us: 100_000,
                cgroup_path: String::new(),
            }],
        }
    }

    fn two_window_scenario() -> Scenario {
        let mut observations = HashMap::new();
        observations.insert("w1".to_string(), vec![(0, 50_000), (1, 150_000)]);

        Scenario {
            name: "two-window".to_string(),
            description: String::new(),
            observations,
            windows: 2,
        }
    }

    #[test]
    fn replay_is_deterministic_across_runs() {
        let cfg = config();
        let scenario = two_window_scenario();
        let first = replay(&cfg, &scenario).unwrap();
        let second = replay(&cfg, &scenario).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn replay_produces_one_record_per_workload_per_window() {
        let cfg = config();
        let scenario = two_window_scenario();
        let records = replay(&cfg, &scenario).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].window, 0);
        assert_eq!(records[1].window, 1);
        assert_eq!(records[1].rule_id, rgov_core::RuleId::ROver);
    }
}
