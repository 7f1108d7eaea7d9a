//! Derandomized Planner (component C5) — the central algorithm.
//!
//! A qubit-by-qubit greedy choice of Pauli axis, driven at every step by
//! a pessimistic log-domain upper bound on the probability that some
//! observable will fail to reach its measurement quota. See the data
//! model's `PauliAxis`/`cur`/`rem` invariants and the per-shot procedure
//! this module implements line for line.

use qshadow_core::{Observable, ObservableRegistry, PauliAxis, Result, ShadowError, AXES};
use std::sync::atomic::{AtomicBool, Ordering};

/// `rem[i]`: qubits of `Oᵢ` still to be committed this shot, or `None`
/// for the `+∞` "this shot will not measure `Oᵢ`" state.
type Rem = Option<u32>;

/// Per-observable coverage state threaded explicitly through the greedy
/// loop, rather than kept in module-level statics (design notes, spec
/// §9).
struct PlannerContext {
    cur: Vec<u64>,
    rem: Vec<Rem>,
    /// Accumulators feeding next shot's numerical shift `σ = S/N`.
    shift_sum: f64,
    shift_count: u64,
    /// `l_table[k] = ln(1 + (e^{-η/2} − 1)·3^{-k})` for `k = 0..=k_max`.
    l_table: Vec<f64>,
}

impl PlannerContext {
    fn new(m: usize, eta: f64, k_max: usize) -> Self {
        let expm1_eta = (-eta / 2.0).exp_m1();
        let l_table = (0..=k_max)
            .map(|k| (1.0 + 3f64.powi(-(k as i32)) * expm1_eta).ln())
            .collect();

        Self {
            cur: vec![0; m],
            rem: vec![None; m],
            shift_sum: 0.0,
            shift_count: 0,
            l_table,
        }
    }

    fn l_of(&self, rem: Rem) -> f64 {
        match rem {
            Some(m) => self.l_table[m as usize],
            None => 0.0,
        }
    }

    /// The pessimistic failure-bound term ν(cur, rem, w, σ), with the
    /// accumulator side effect the shift update relies on (spec §4.5).
    /// The side effect fires on every call that takes the non-zero
    /// branch, including the redundant "current value" evaluations the
    /// greedy loop repeats per candidate axis — this is the asymmetry
    /// the spec calls out as observable and not to be "fixed".
    fn nu(&mut self, i: usize, rem: Rem, weight: f64, eta: f64, k_budget: u64, shift: f64) -> f64 {
        let quota = (weight * k_budget as f64).floor();
        if quota <= self.cur[i] as f64 {
            return 0.0;
        }
        let log_value = -(eta / 2.0) * self.cur[i] as f64 + self.l_of(rem);
        self.shift_sum += log_value / weight;
        self.shift_count += 1;
        2.0 * ((log_value / weight) - shift).exp()
    }

    fn take_shift(&mut self) -> f64 {
        let shift = if self.shift_count == 0 {
            0.0
        } else {
            self.shift_sum / self.shift_count as f64
        };
        self.shift_sum = 0.0;
        self.shift_count = 0;
        shift
    }

    fn is_satisfied(&self, obs: &Observable, k_budget: u64) -> bool {
        self.cur[obs.id] as f64 >= (obs.weight * k_budget as f64).floor()
    }
}

/// Greedy per-qubit Pauli choice minimizing a pessimistic failure bound
/// (spec §4.5). Construct once per query; `plan` drives the whole
/// per-shot procedure until every observable is satisfied (or the
/// optional safety limit is hit).
pub struct DerandomizedPlanner<'a> {
    registry: &'a ObservableRegistry,
    eta: f64,
    k_budget: u64,
    ctx: PlannerContext,
}

impl<'a> DerandomizedPlanner<'a> {
    pub fn new(registry: &'a ObservableRegistry, k_budget: u64, eta: f64) -> Self {
        let ctx = PlannerContext::new(registry.len(), eta, registry.k_max());
        Self {
            registry,
            eta,
            k_budget,
            ctx,
        }
    }

    pub fn satisfied_count(&self) -> usize {
        self.registry
            .observables()
            .iter()
            .filter(|o| self.ctx.is_satisfied(o, self.k_budget))
            .count()
    }

    pub fn all_satisfied(&self) -> bool {
        self.satisfied_count() == self.registry.len()
    }

    /// The per-observable shot counts reached so far; exposed for tests
    /// and for a CLI `--verbose` coverage report.
    pub fn coverage(&self) -> &[u64] {
        &self.ctx.cur
    }

    /// Runs the per-shot procedure until every observable is satisfied
    /// or `max_shots` is reached, invoking `on_shot(shot_index, axes,
    /// satisfied, total)` after each completed shot (spec §6.3's status
    /// line is exactly this tuple). `cancel`, if given, is polled once
    /// per shot boundary (spec §5's cooperative cancellation) and a
    /// `false` value stops the loop without error.
    pub fn plan(
        &mut self,
        max_shots: Option<u64>,
        cancel: Option<&AtomicBool>,
        mut on_shot: impl FnMut(u64, &[PauliAxis], usize, usize),
    ) -> Result<u64> {
        let n = self.registry.system_size;
        let total = self.registry.len();
        let mut shot_index: u64 = 0;

        if total == 0 {
            return Ok(0);
        }

        while !self.all_satisfied() {
            if let Some(flag) = cancel {
                if !flag.load(Ordering::Relaxed) {
                    break;
                }
            }
            if let Some(limit) = max_shots {
                if shot_index >= limit {
                    return Err(ShadowError::PlannerBudgetExhausted {
                        shots: shot_index,
                        satisfied: self.satisfied_count(),
                        total,
                    });
                }
            }

            let shift = self.ctx.take_shift();
            for obs in self.registry.observables() {
                self.ctx.rem[obs.id] = Some(obs.k_local() as u32);
            }

            let mut axes = Vec::with_capacity(n);
            for q in 0..n {
                let axis = self.choose_axis(q, shift);
                self.commit(q, axis);
                axes.push(axis);
            }

            for obs in self.registry.observables() {
                if self.ctx.rem[obs.id] == Some(0) {
                    self.ctx.cur[obs.id] += 1;
                }
            }

            shot_index += 1;
            let satisfied = self.satisfied_count();
            tracing::info!("[Status {}: {}]", shot_index, satisfied);
            on_shot(shot_index, &axes, satisfied, total);
        }

        Ok(shot_index)
    }

    /// Step 2: the axis minimizing the forecast change in the total
    /// failure bound over every observable touching qubit `q`. Ties
    /// broken by enumeration order X < Y < Z.
    fn choose_axis(&mut self, q: usize, shift: f64) -> PauliAxis {
        let mut best_axis = PauliAxis::X;
        let mut best_delta = f64::INFINITY;

        for &candidate in &AXES {
            let mut delta = 0.0;
            for &a_prime in &AXES {
                for &i_u32 in self.registry.acts().acting_on(q, a_prime) {
                    let i = i_u32 as usize;
                    let weight = self.registry.observables()[i].weight;
                    let rem = self.ctx.rem[i];

                    let m_prime = if a_prime == candidate {
                        rem.map(|m| m.saturating_sub(1))
                    } else {
                        None
                    };

                    let next = self.ctx.nu(i, m_prime, weight, self.eta, self.k_budget, shift);
                    let current = self.ctx.nu(i, rem, weight, self.eta, self.k_budget, shift);
                    delta += next - current;
                }
            }

            if delta < best_delta {
                best_delta = delta;
                best_axis = candidate;
            }
        }

        best_axis
    }

    /// Step 3: commit the chosen axis for qubit `q`.
    fn commit(&mut self, q: usize, chosen: PauliAxis) {
        for &a_prime in &AXES {
            for &i_u32 in self.registry.acts().acting_on(q, a_prime) {
                let i = i_u32 as usize;
                if a_prime == chosen {
                    if let Some(m) = self.ctx.rem[i] {
                        self.ctx.rem[i] = Some(m - 1);
                    }
                } else {
                    self.ctx.rem[i] = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qshadow_core::ObservableRegistry;

    /// P2/P3: termination and coverage for a small multi-observable
    /// instance with distinct weights.
    #[test]
    fn terminates_with_full_coverage() {
        let registry =
            ObservableRegistry::from_reader("3\n2 X 0 X 1\n2 Z 1 Z 2\n1 Y 0 1.5\n".as_bytes())
                .unwrap();
        let mut plan = DerandomizedPlanner::new(&registry, 2, 0.9);
        let shots = plan.plan(Some(10_000), None, |_, _, _, _| {}).unwrap();
        assert!(shots > 0);
        for obs in registry.observables() {
            let quota = (obs.weight * 2.0).floor() as u64;
            assert!(plan.coverage()[obs.id] >= quota);
        }
    }

    #[test]
    fn max_shots_limit_surfaces_as_budget_exhausted() {
        // A single observable needing an absurd quota relative to the
        // limit will never be satisfied within one shot.
        let registry = ObservableRegistry::from_reader("1\n1 X 0 1000.0\n".as_bytes()).unwrap();
        let mut plan = DerandomizedPlanner::new(&registry, 1, 0.9);
        let err = plan.plan(Some(1), None, |_, _, _, _| {}).unwrap_err();
        assert!(matches!(err, ShadowError::PlannerBudgetExhausted { .. }));
    }

    #[test]
    fn cancellation_flag_stops_before_completion() {
        let registry = ObservableRegistry::from_reader("1\n1 X 0 1000.0\n".as_bytes()).unwrap();
        let mut plan = DerandomizedPlanner::new(&registry, 1, 0.9);
        let flag = AtomicBool::new(false);
        let shots = plan.plan(None, Some(&flag), |_, _, _, _| {}).unwrap();
        assert_eq!(shots, 0);
    }
}
