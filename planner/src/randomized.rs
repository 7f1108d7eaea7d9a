//! Randomized Planner (component C4): uniform i.i.d. Pauli measurement
//! settings with no per-observable coverage guarantee. Correctness is
//! purely statistical (property P7).

use qshadow_core::{PauliAxis, AXES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws independent, uniformly random n-Pauli strings.
///
/// The RNG is injected rather than reached for globally, so the
/// distribution (property P7) can be exercised deterministically in
/// tests; the CLI wires this to an explicit `--seed` or a fresh
/// `StdRng::from_entropy()` per the spec's open question on seeding.
pub struct RandomizedPlanner<R: Rng> {
    rng: R,
}

impl RandomizedPlanner<StdRng> {
    /// Seed from an explicit value (reproducible runs, tests).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy (the documented default: "implementations
    /// should default to a fresh seed").
    pub fn fresh() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> RandomizedPlanner<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// One independent n-axis shot.
    pub fn next_shot(&mut self, n: usize) -> Vec<PauliAxis> {
        (0..n).map(|_| AXES[self.rng.gen_range(0..3)]).collect()
    }

    /// `shots` independent n-axis shots.
    pub fn plan(&mut self, shots: u64, n: usize) -> Vec<Vec<PauliAxis>> {
        (0..shots).map(|_| self.next_shot(n)).collect()
    }
}
