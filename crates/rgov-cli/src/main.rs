use anyhow::Context;
use clap::Parser;
use rgov_kernel::{EnforcementAdapter, KernelEnforcement, KernelObservation, ObservationAdapter};
use rgov_orchestrator::{Config, DecisionLog, Orchestrator, OrchestratorError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Start the rgov CPU budget governor daemon.
#[derive(Parser)]
#[command(name = "rgov", about = "Deterministic windowed CPU budget governor")]
struct Cli {
    /// Path to the rgov TOML config file.
    config_path: PathBuf,

    /// Path to the JSON Lines decision log. Defaults to
    /// `rgov-decisions.jsonl` in the current directory.
    #[arg(long, default_value = "rgov-decisions.jsonl")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Orchestrator(e)) => {
            tracing::error!(error = %e, "rgov exiting on error");
            exit_code_for(&e)
        }
        Err(RunError::Other(e)) => {
            tracing::error!(error = %e, "rgov exiting on error");
            ExitCode::from(5)
        }
    }
}

enum RunError {
    Orchestrator(OrchestratorError),
    Other(anyhow::Error),
}

impl From<OrchestratorError> for RunError {
    fn from(e: OrchestratorError) -> Self {
        Self::Orchestrator(e)
    }
}

async fn run(cli: Cli) -> Result<(), RunError> {
    let config = Config::load(&cli.config_path).map_err(OrchestratorError::from)?;

    let mut observation = KernelObservation::new();
    let mut enforcement = KernelEnforcement::new();
    for w in &config.workloads {
        observation.register(w.id.clone(), &w.cgroup_path);
        enforcement.register(w.id.clone(), &w.cgroup_path);
    }

    let log = DecisionLog::create_jsonl(&cli.log_path)
        .with_context(|| format!("failed to open decision log at {}", cli.log_path.display()))
        .map_err(RunError::Other)?;

    let mut orchestrator = Orchestrator::start(
        &config,
        ObservationAdapter::Kernel(observation),
        EnforcementAdapter::Kernel(enforcement),
        log,
    )?;

    tracing::info!(
        workload_count = config.workloads.len(),
        window_us = config.window_size_us,
        "rgov started"
    );

    let mut ticker = tokio::time::interval(Duration::from_micros(config.window_size_us));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                orchestrator.tick()?;
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    tracing::info!(window = orchestrator.window(), "rgov stopped");
    Ok(())
}

/// Waits for `SIGINT` or, on Unix, `SIGTERM`.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(s) => s,
            Err(_) => {
                ctrl_c.await.ok();
                tracing::info!("received ctrl-c, shutting down");
                return;
            }
        };
        tokio::select! {
            _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        tracing::info!("received ctrl-c, shutting down");
    }
}

fn exit_code_for(error: &OrchestratorError) -> ExitCode {
    match error {
        OrchestratorError::Config(_) => ExitCode::from(2),
        OrchestratorError::Observation(_) => ExitCode::from(3),
        OrchestratorError::Policy(_) | OrchestratorError::ThrottleWithoutOvershoot { .. } => ExitCode::from(4),
        OrchestratorError::Enforcement(_) => ExitCode::from(5),
        OrchestratorError::DecisionLogWrite { .. } => ExitCode::from(5),
        OrchestratorError::UnknownWorkload { .. } => ExitCode::from(4),
    }
}
