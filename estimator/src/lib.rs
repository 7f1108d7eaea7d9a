//! # qshadow-estimator
//!
//! The prediction half of the classical shadow protocol: turning a
//! recorded measurement log into point estimates.
//!
//! - [`observables::estimate_observables`] — component C6, k-local Pauli
//!   observable expectation values.
//! - [`entropy::estimate_entropy`] — component C7, Rényi-2 entanglement
//!   entropy of a subsystem.

pub mod entropy;
pub mod observables;

pub use entropy::estimate_entropy;
pub use observables::{estimate_observables, ObservableEstimate};
