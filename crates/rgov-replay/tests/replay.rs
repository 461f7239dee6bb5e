use rgov_core::{Mode, RuleId};
use rgov_orchestrator::{Config, WorkloadConfig};
use rgov_replay::scenario::Scenario;

fn load_scenario(name: &str) -> Scenario {
    let path = format!("{}/tests/fixtures/{name}.json", env!("CARGO_MANIFEST_DIR"));
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn two_workload_config() -> Config {
    Config {
        window_size_us: 100_000,
        capacity_us: 200_000,
        workloads: vec![
            WorkloadConfig {
                id: "build-worker".to_string(),
                budget_us: 100_000,
                cgroup_path: String::new(),
            },
            WorkloadConfig {
                id: "batch-job".to_string(),
                budget_us: 50_000,
                cgroup_path: String::new(),
            },
        ],
    }
}

#[test]
fn two_workloads_are_independent() {
    let config = two_workload_config();
    let scenario = load_scenario("oscillation_two_workloads");
    let records = rgov_replay::replay(&config, &scenario).unwrap();

    assert_eq!(records.len(), 8);

    let build = records.iter().filter(|r| r.workload_id == "build-worker").collect::<Vec<_>>();
    let batch = records.iter().filter(|r| r.workload_id == "batch-job").collect::<Vec<_>>();

    assert_eq!(build.len(), 4);
    assert_eq!(batch.len(), 4);

    assert_eq!(build[0].rule_id, RuleId::ROver);
    assert_eq!(build[0].mode_out, Mode::Throttled);
    assert_eq!(build[1].rule_id, RuleId::RUnder);
    assert_eq!(build[1].mode_out, Mode::Normal);

    assert!(batch.iter().all(|r| r.mode_out == Mode::Normal));
    assert!(batch.iter().all(|r| r.rule_id == RuleId::RUnder));
}

#[test]
fn replaying_twice_is_byte_identical_once_serialized() {
    let config = two_workload_config();
    let scenario = load_scenario("oscillation_two_workloads");
    let first = rgov_replay::replay(&config, &scenario).unwrap();
    let second = rgov_replay::replay(&config, &scenario).unwrap();

    let first_json: Vec<String> = first.iter().map(|r| serde_json::to_string(r).unwrap()).collect();
    let second_json: Vec<String> = second.iter().map(|r| serde_json::to_string(r).unwrap()).collect();

    assert_eq!(first_json, second_json);
}
