//! Window orchestration (spec §4.4).
//!
//! The orchestrator owns the workload registry, drives each workload
//! through Observation → Policy → Enforcement in a fixed registration
//! order, and appends one `DecisionRecord` per workload per window to
//! the decision log. It advances the window index only after every
//! workload has been processed for the current window — ticks are
//! atomic with respect to the window counter.

use crate::config::Config;
use crate::error::OrchestratorError;
use crate::log::DecisionLog;
use rgov_core::{step, DecisionRecord, PolicyState};
use rgov_kernel::{EnforcementAdapter, ObservationAdapter};
use std::collections::HashMap;
use tracing::{info, warn};

struct Workload {
    id: String,
    budget_us: u64,
    state: PolicyState,
    /// Tracks I4: a workload may only be `Throttled` if some prior
    /// window observed it over budget.
    ever_exceeded: bool,
}

pub struct Orchestrator {
    window_us: u64,
    workloads: Vec<Workload>,
    observation: ObservationAdapter,
    enforcement: EnforcementAdapter,
    log: DecisionLog,
    window: u64,
}

impl Orchestrator {
    /// Build an orchestrator from a validated config and the adapters
    /// to drive it with. Registers initial state `(Normal, 0, B)` for
    /// every workload and applies the initial quota before any window
    /// is observed, per spec §4.4 startup sequencing.
    pub fn start(
        config: &Config,
        observation: ObservationAdapter,
        mut enforcement: EnforcementAdapter,
        log: DecisionLog,
    ) -> Result<Self, OrchestratorError> {
        config.validate()?;

        let mut workloads = Vec::with_capacity(config.workloads.len());
        for w in &config.workloads {
            enforcement.apply(&w.id, w.budget_us, config.window_size_us)?;
            workloads.push(Workload {
                id: w.id.clone(),
                budget_us: w.budget_us,
                state: PolicyState::initial(w.budget_us),
                ever_exceeded: false,
            });
        }

        info!(workload_count = workloads.len(), window_us = config.window_size_us, "orchestrator started");

        Ok(Self {
            window_us: config.window_size_us,
            workloads,
            observation,
            enforcement,
            log,
            window: 0,
        })
    }

    /// Run one window: sample, step, check invariants, enforce, log —
    /// for every workload, in registration order. The window index
    /// advances only after all workloads have completed this tick.
    pub fn tick(&mut self) -> Result<(), OrchestratorError> {
        let window = self.window;

        for workload in &mut self.workloads {
            let observed_us = self.observation.sample(&workload.id, window).map_err(|e| {
                warn!(error = %e, workload_id = %workload.id, window, "observation failed");
                e
            })?;

            let out = step(workload.state, observed_us, workload.budget_us, self.window_us).map_err(|e| {
                warn!(error = %e, workload_id = %workload.id, window, "policy step failed");
                e
            })?;

            if out.fragment.mode_out == rgov_core::Mode::Throttled {
                if observed_us > workload.budget_us {
                    workload.ever_exceeded = true;
                }
                if !workload.ever_exceeded {
                    warn!(workload_id = %workload.id, window, "I4 violated: throttled with no prior overshoot");
                    return Err(OrchestratorError::ThrottleWithoutOvershoot {
                        workload_id: workload.id.clone(),
                        window,
                    });
                }
            }

            // Policy state is already decided at this point (spec §4.3):
            // a transient enforcement failure must not alter decision
            // history or halt the daemon. Log it and move on — the next
            // tick re-applies the same `T` for this workload.
            if let Err(e) = self.enforcement.apply(&workload.id, out.quota_us, self.window_us) {
                warn!(error = %e, workload_id = %workload.id, window, "enforcement failed, will retry next window");
            }
            workload.state = out.state_out;

            let record = DecisionRecord::from_fragment(window, workload.id.clone(), out.fragment);

            tracing::debug!(
                window,
                workload_id = %workload.id,
                rule_id = %record.rule_id,
                mode_out = %record.mode_out,
                "decision committed"
            );

            // The decision log is the only externalized decision history
            // (spec §9) and the byte-equal-replay law depends on it —
            // unlike enforcement, a failure here halts loudly (§7).
            self.log.append(&record).map_err(|e| {
                warn!(error = %e, workload_id = %workload.id, window, "failed to append decision log entry");
                OrchestratorError::DecisionLogWrite {
                    workload_id: workload.id.clone(),
                    window,
                    source: e,
                }
            })?;
        }

        self.window += 1;
        Ok(())
    }

    pub fn window(&self) -> u64 {
        self.window
    }

    pub fn log(&self) -> &DecisionLog {
        &self.log
    }

    /// Current per-workload states, for inspection in tests and the
    /// replay harness's termination check.
    pub fn states(&self) -> HashMap<&str, PolicyState> {
        self.workloads.iter().map(|w| (w.id.as_str(), w.state)).collect()
    }
}
