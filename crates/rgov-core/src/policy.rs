//! The windowed CPU policy state machine (spec §4.1).
//!
//! `step` is the entire decision surface of rgov: pure, total, and
//! evaluated in the fixed rule order R-UNDER, R-EXACT, R-OVER. No
//! clock, no I/O, no randomness — the same `(state_in, observed_us,
//! budget_us, window_us)` always produces the same output.

use crate::error::{PolicyError, Result};
use crate::types::{DecisionFragment, Mode, PolicyState, RuleId};

/// Result of one policy step: the next state, the quota to enforce
/// for window `w+1`, and the fragment the caller folds into a
/// `DecisionRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutput {
    pub state_out: PolicyState,
    pub quota_us: u64,
    pub fragment: DecisionFragment,
}

/// Apply one window's observation to a workload's prior state.
///
/// `debt_out` never exceeds `budget_us` as emitted here even though
/// the raw rule text in spec §4.1 writes `T_w = B − debt_out` without
/// an explicit floor: when debt built up under `R-OVER` is larger than
/// `budget_us`, a literal subtraction would underflow and violate I2.
/// This implementation floors at 0 (`saturating_sub`) uniformly across
/// all three rules, which reproduces the literal formula exactly
/// whenever `debt_out <= budget_us` — true in every scenario spec §8
/// specifies — and only changes behavior in the otherwise-undefined
/// large-debt zone, where flooring is the only way to keep I2 an
/// invariant rather than a probabilistic property. See DESIGN.md.
pub fn step(state_in: PolicyState, observed_us: u64, budget_us: u64, window_us: u64) -> Result<StepOutput> {
    let debt_in = state_in.debt_us;

    let (debt_out, rule_id) = if observed_us < budget_us {
        // R-UNDER
        let room = budget_us - observed_us;
        let pay = debt_in.min(room);
        let debt_out = debt_in
            .checked_sub(pay)
            .ok_or_else(|| overflow("R-UNDER debt_in - pay underflowed"))?;
        (debt_out, RuleId::RUnder)
    } else if observed_us == budget_us {
        // R-EXACT: no forgiveness, no new excess.
        (debt_in, RuleId::RExact)
    } else {
        // R-OVER
        let excess = observed_us - budget_us;
        let debt_out = debt_in
            .checked_add(excess)
            .ok_or_else(|| overflow("debt_in + excess overflowed u64"))?;
        (debt_out, RuleId::ROver)
    };

    let mode_out = if debt_out == 0 { Mode::Normal } else { Mode::Throttled };
    let quota_us = budget_us.saturating_sub(debt_out);

    let fragment = DecisionFragment {
        mode_in: state_in.mode,
        debt_in_us: debt_in,
        observed_us,
        budget_us,
        window_us,
        mode_out,
        debt_out_us: debt_out,
        quota_us,
        rule_id,
    };

    check_fragment(&fragment)?;

    Ok(StepOutput {
        state_out: PolicyState {
            mode: mode_out,
            debt_us: debt_out,
            last_quota_us: quota_us,
        },
        quota_us,
        fragment,
    })
}

fn overflow(detail: &str) -> PolicyError {
    PolicyError::Overflow {
        detail: detail.to_string(),
    }
}

/// Check the invariants that are decidable from a single fragment
/// alone: I1 (debt non-negative, trivial for `u64`), I2 (`0 <= T_w <=
/// B`), I3 (`Normal` implies zero debt), and I5 (debt can only drop
/// when the window was under budget). I4 spans windows and is the
/// orchestrator's responsibility (it needs the workload's history).
pub fn check_fragment(f: &DecisionFragment) -> Result<()> {
    if f.quota_us > f.budget_us {
        return Err(PolicyError::InvariantViolation {
            id: "I2",
            detail: format!("quota_us {} exceeds budget_us {}", f.quota_us, f.budget_us),
        });
    }
    if f.mode_out == Mode::Normal && f.debt_out_us != 0 {
        return Err(PolicyError::InvariantViolation {
            id: "I3",
            detail: format!("mode_out=Normal but debt_out_us={}", f.debt_out_us),
        });
    }
    if f.debt_out_us < f.debt_in_us && !(f.observed_us < f.budget_us) {
        return Err(PolicyError::InvariantViolation {
            id: "I5",
            detail: format!(
                "debt decreased ({} -> {}) without observed_us < budget_us ({} vs {})",
                f.debt_in_us, f.debt_out_us, f.observed_us, f.budget_us
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const B: u64 = 100_000;
    const W: u64 = 100_000;

    fn initial() -> PolicyState {
        PolicyState::initial(B)
    }

    #[test]
    fn steady_under_budget_stays_normal_at_full_quota() {
        let mut state = initial();
        for _ in 0..3 {
            let out = step(state, 50_000, B, W).unwrap();
            assert_eq!(out.fragment.rule_id, RuleId::RUnder);
            assert_eq!(out.state_out.mode, Mode::Normal);
            assert_eq!(out.state_out.debt_us, 0);
            assert_eq!(out.quota_us, B);
            state = out.state_out;
        }
    }

    #[test]
    fn single_overshoot_then_recovers() {
        let mut state = initial();

        let out = step(state, 150_000, B, W).unwrap();
        assert_eq!(out.fragment.rule_id, RuleId::ROver);
        assert_eq!(out.state_out.debt_us, 50_000);
        assert_eq!(out.state_out.mode, Mode::Throttled);
        assert_eq!(out.quota_us, 50_000);
        state = out.state_out;

        let out = step(state, 0, B, W).unwrap();
        assert_eq!(out.fragment.rule_id, RuleId::RUnder);
        assert_eq!(out.state_out.debt_us, 0);
        assert_eq!(out.state_out.mode, Mode::Normal);
        assert_eq!(out.quota_us, B);
        state = out.state_out;

        let out = step(state, 0, B, W).unwrap();
        assert_eq!(out.state_out.debt_us, 0);
        assert_eq!(out.quota_us, B);
    }

    #[test]
    fn sustained_overshoot_debt_grows_quota_floors_at_zero() {
        let mut state = initial();
        let expected_debt = [100_000u64, 200_000, 300_000];
        for &d in &expected_debt {
            let out = step(state, 200_000, B, W).unwrap();
            assert_eq!(out.fragment.rule_id, RuleId::ROver);
            assert_eq!(out.state_out.debt_us, d);
            assert_eq!(out.state_out.mode, Mode::Throttled);
            assert_eq!(out.quota_us, 0);
            state = out.state_out;
        }
    }

    #[test]
    fn oscillation_matches_spec_scenario_4() {
        let mut state = initial();
        let inputs = [200_000u64, 0, 200_000, 0];
        let expected_debt = [100_000u64, 0, 100_000, 0];
        let expected_quota = [0u64, 100_000, 0, 100_000];
        let expected_mode = [Mode::Throttled, Mode::Normal, Mode::Throttled, Mode::Normal];

        for i in 0..4 {
            let out = step(state, inputs[i], B, W).unwrap();
            assert_eq!(out.state_out.debt_us, expected_debt[i], "step {i}");
            assert_eq!(out.quota_us, expected_quota[i], "step {i}");
            assert_eq!(out.state_out.mode, expected_mode[i], "step {i}");
            state = out.state_out;
        }
    }

    #[test]
    fn exact_boundary_holds_steady() {
        let mut state = initial();
        for _ in 0..2 {
            let out = step(state, 100_000, B, W).unwrap();
            assert_eq!(out.fragment.rule_id, RuleId::RExact);
            assert_eq!(out.state_out.debt_us, 0);
            assert_eq!(out.state_out.mode, Mode::Normal);
            assert_eq!(out.quota_us, 100_000);
            state = out.state_out;
        }
    }

    #[test]
    fn zero_budget_forces_zero_quota_on_any_usage() {
        let state = PolicyState::initial(0);
        let out = step(state, 1, 0, W).unwrap();
        assert_eq!(out.fragment.rule_id, RuleId::ROver);
        assert_eq!(out.quota_us, 0);
        assert_eq!(out.state_out.mode, Mode::Throttled);
    }

    #[test]
    fn zero_budget_zero_usage_keeps_normal() {
        let state = PolicyState::initial(0);
        let out = step(state, 0, 0, W).unwrap();
        assert_eq!(out.fragment.rule_id, RuleId::RExact);
        assert_eq!(out.state_out.mode, Mode::Normal);
        assert_eq!(out.quota_us, 0);
    }

    #[test]
    fn extreme_debt_under_budget_still_satisfies_i2() {
        // Debt built up far beyond budget_us; a single under-budget
        // window must still emit 0 <= T_w <= B even though the naive
        // `B - debt_out` would underflow.
        let state = PolicyState {
            mode: Mode::Throttled,
            debt_us: 10 * B,
            last_quota_us: 0,
        };
        let out = step(state, 50_000, B, W).unwrap();
        assert!(out.quota_us <= B);
        assert_eq!(out.quota_us, 0);
        assert_eq!(out.state_out.mode, Mode::Throttled);
    }
}
