use clap::Parser;
use rgov_orchestrator::Config;
use rgov_replay::scenario::Scenario;
use std::path::PathBuf;
use std::process::ExitCode;

/// Replay a recorded scenario against a config through the
/// orchestrator and print the resulting decision log as JSON Lines,
/// one record per line.
#[derive(Parser)]
#[command(name = "rgov-replay", about = "Deterministic offline replay of an rgov decision sequence")]
struct Cli {
    /// Path to a scenario file (observed usage sequence per workload).
    scenario_path: PathBuf,
    /// Path to the rgov config file the scenario is replayed against.
    config_path: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cannot load config {}: {e}", cli.config_path.display());
            return ExitCode::from(2);
        }
    };

    let content = match std::fs::read_to_string(&cli.scenario_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cannot read scenario file {}: {e}", cli.scenario_path.display());
            return ExitCode::from(2);
        }
    };

    let scenario: Scenario = match serde_json::from_str(&content) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("cannot parse scenario file {}: {e}", cli.scenario_path.display());
            return ExitCode::from(2);
        }
    };

    tracing::info!(scenario = %scenario.name, windows = scenario.windows, "starting replay");

    let records = match rgov_replay::replay(&config, &scenario) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("replay failed: {e}");
            return ExitCode::from(4);
        }
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for record in &records {
        match serde_json::to_writer(&mut handle, record) {
            Ok(()) => {
                use std::io::Write;
                let _ = writeln!(handle);
            }
            Err(e) => {
                eprintln!("failed to write decision record: {e}");
                return ExitCode::from(4);
            }
        }
    }

    ExitCode::SUCCESS
}
