//! Observable Estimator (component C6): a per-observable sample mean of
//! the product outcome over shots whose basis matches the observable on
//! every qubit it touches.

use qshadow_core::ObservableRegistry;
use qshadow_io::{MeasurementLog, Shot};
use rayon::prelude::*;

/// Below this many shots, run the sequential sweep — simplest to reason
/// about for correctness, and the parallel path's setup cost dominates
/// at this scale anyway (spec §5).
const PARALLEL_THRESHOLD: usize = 4096;

/// A single observable's point estimate, plus how many shots actually
/// matched it (the diagnostic the reference implementation's status
/// stream reports alongside the number itself).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservableEstimate {
    pub id: usize,
    pub value: f64,
    pub shots_matched: u64,
}

struct Accumulator {
    sum: Vec<i64>,
    count: Vec<u64>,
}

impl Accumulator {
    fn new(m: usize) -> Self {
        Self {
            sum: vec![0; m],
            count: vec![0; m],
        }
    }

    fn merge(mut self, other: Accumulator) -> Accumulator {
        for i in 0..self.sum.len() {
            self.sum[i] += other.sum[i];
            self.count[i] += other.count[i];
        }
        self
    }

    /// One sweep of a single shot: decrement `rem` and multiply `prod`
    /// for every observable touching the measured qubit/axis pair, then
    /// credit any observable whose `rem` reached zero.
    fn absorb_shot(
        &mut self,
        shot: &Shot,
        registry: &ObservableRegistry,
        rem: &mut [u32],
        prod: &mut [i64],
    ) {
        for obs in registry.observables() {
            rem[obs.id] = obs.k_local() as u32;
            prod[obs.id] = 1;
        }

        for (q, &axis) in shot.axes.iter().enumerate() {
            let outcome = shot.outcomes[q].as_i64();
            for &i_u32 in registry.acts().acting_on(q, axis) {
                let i = i_u32 as usize;
                rem[i] -= 1;
                prod[i] *= outcome;
            }
        }

        for obs in registry.observables() {
            if rem[obs.id] == 0 {
                self.sum[obs.id] += prod[obs.id];
                self.count[obs.id] += 1;
            }
        }
    }
}

fn scratch_buffers(m: usize) -> (Vec<u32>, Vec<i64>) {
    (vec![0; m], vec![0; m])
}

fn sequential_accumulate(log: &MeasurementLog, registry: &ObservableRegistry) -> Accumulator {
    let m = registry.len();
    let mut acc = Accumulator::new(m);
    let (mut rem, mut prod) = scratch_buffers(m);
    for shot in log.shots() {
        acc.absorb_shot(shot, registry, &mut rem, &mut prod);
    }
    acc
}

fn parallel_accumulate(log: &MeasurementLog, registry: &ObservableRegistry) -> Accumulator {
    let m = registry.len();
    log.shots()
        .par_iter()
        .fold(
            || (Accumulator::new(m), scratch_buffers(m)),
            |(mut acc, (mut rem, mut prod)), shot| {
                acc.absorb_shot(shot, registry, &mut rem, &mut prod);
                (acc, (rem, prod))
            },
        )
        .map(|(acc, _)| acc)
        .reduce(|| Accumulator::new(m), Accumulator::merge)
}

/// Estimates every observable's expectation value from the measurement
/// log (spec §4.6). Observables never matched by any shot report `0.0`
/// and log a warning rather than failing the whole query.
pub fn estimate_observables(
    log: &MeasurementLog,
    registry: &ObservableRegistry,
) -> Vec<ObservableEstimate> {
    let acc = if log.shots().len() > PARALLEL_THRESHOLD {
        parallel_accumulate(log, registry)
    } else {
        sequential_accumulate(log, registry)
    };

    registry
        .observables()
        .iter()
        .map(|obs| {
            if acc.count[obs.id] == 0 {
                tracing::warn!(observable = obs.id, "observable never measured");
                ObservableEstimate {
                    id: obs.id,
                    value: 0.0,
                    shots_matched: 0,
                }
            } else {
                ObservableEstimate {
                    id: obs.id,
                    value: acc.sum[obs.id] as f64 / acc.count[obs.id] as f64,
                    shots_matched: acc.count[obs.id],
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qshadow_core::ObservableRegistry;

    fn setup(measurements: &str, observables: &str) -> Vec<ObservableEstimate> {
        let log = MeasurementLog::from_reader(measurements.as_bytes()).unwrap();
        let registry = ObservableRegistry::from_reader(observables.as_bytes()).unwrap();
        estimate_observables(&log, &registry)
    }

    #[test]
    fn unmatched_observable_reports_zero() {
        // Shot bases are all X; an observable requiring Z on qubit 0
        // never matches.
        let estimates = setup("2\nX 1 X 1\n", "2\n1 Z 0\n");
        assert_eq!(estimates[0].value, 0.0);
        assert_eq!(estimates[0].shots_matched, 0);
    }

    #[test]
    fn two_local_observable_requires_agreement_on_both_qubits() {
        // Shot matches X@0, X@1: a 2-local XX observable should match.
        let estimates = setup("2\nX 1 X -1\n", "2\n2 X 0 X 1\n");
        assert_eq!(estimates[0].shots_matched, 1);
        assert_relative_eq!(estimates[0].value, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn large_shot_count_takes_the_parallel_path_and_agrees_with_sequential() {
        let mut text = String::from("1\n");
        for i in 0..(PARALLEL_THRESHOLD + 10) {
            text.push_str(if i % 2 == 0 { "X 1\n" } else { "X -1\n" });
        }
        let log = MeasurementLog::from_reader(text.as_bytes()).unwrap();
        let registry = ObservableRegistry::from_reader("1\n1 X 0\n".as_bytes()).unwrap();

        let parallel = parallel_accumulate(&log, &registry);
        let sequential = sequential_accumulate(&log, &registry);
        assert_eq!(parallel.sum, sequential.sum);
        assert_eq!(parallel.count, sequential.count);
    }
}
