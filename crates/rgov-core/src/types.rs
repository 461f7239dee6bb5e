use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse policy state for a workload, derived from debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Normal,
    Throttled,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Throttled => f.write_str("throttled"),
        }
    }
}

/// The exact policy rule that fired for a step, named per spec §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "R-UNDER")]
    RUnder,
    #[serde(rename = "R-EXACT")]
    RExact,
    #[serde(rename = "R-OVER")]
    ROver,
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RUnder => f.write_str("R-UNDER"),
            Self::RExact => f.write_str("R-EXACT"),
            Self::ROver => f.write_str("R-OVER"),
        }
    }
}

/// Per-workload policy state: `(mode, debt, last_T)`.
///
/// Owned solely by the policy caller (the orchestrator, or the replay
/// harness in its place); `rgov-core` never stores it itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyState {
    pub mode: Mode,
    /// Unpaid overshoot, in microseconds.
    pub debt_us: u64,
    /// Last enforced quota, in microseconds. Informational only — it
    /// does not feed back into `step`.
    pub last_quota_us: u64,
}

impl PolicyState {
    /// Initial state for a newly registered workload: `(Normal, 0, B)`.
    pub fn initial(budget_us: u64) -> Self {
        Self {
            mode: Mode::Normal,
            debt_us: 0,
            last_quota_us: budget_us,
        }
    }
}

/// The pure output of one `Policy::step` call, before the orchestrator
/// attaches window index and workload identity.
///
/// This is the "record fragment" named in spec §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionFragment {
    pub mode_in: Mode,
    pub debt_in_us: u64,
    pub observed_us: u64,
    pub budget_us: u64,
    pub window_us: u64,
    pub mode_out: Mode,
    pub debt_out_us: u64,
    pub quota_us: u64,
    pub rule_id: RuleId,
}

/// Immutable per-workload, per-window decision artifact (spec §3).
///
/// Field order is declaration order, which `serde_json` preserves on
/// serialization — this is the byte-equal-replay contract of §4.5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub window: u64,
    pub workload_id: String,
    pub observed_us: u64,
    pub budget_us: u64,
    pub window_us: u64,
    pub mode_in: Mode,
    pub debt_in_us: u64,
    pub mode_out: Mode,
    pub debt_out_us: u64,
    pub quota_us: u64,
    pub rule_id: RuleId,
}

impl DecisionRecord {
    pub fn from_fragment(window: u64, workload_id: impl Into<String>, f: DecisionFragment) -> Self {
        Self {
            window,
            workload_id: workload_id.into(),
            observed_us: f.observed_us,
            budget_us: f.budget_us,
            window_us: f.window_us,
            mode_in: f.mode_in,
            debt_in_us: f.debt_in_us,
            mode_out: f.mode_out,
            debt_out_us: f.debt_out_us,
            quota_us: f.quota_us,
            rule_id: f.rule_id,
        }
    }
}
