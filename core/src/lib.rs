//! # qshadow-core
//!
//! Shared primitives for classical shadow tomography: the Pauli axis
//! alphabet, ±1 outcome type, the workspace-wide error enum, and the two
//! read-only registries every planner and estimator query is built on:
//!
//! - [`ObservableRegistry`] — component C1, the weighted k-local Pauli
//!   observables a query predicts, plus their per-qubit per-axis
//!   inverted index.
//! - [`SubsystemRegistry`] — component C2, the qubit subsets an entropy
//!   query is run against.
//!
//! Both registries are built once per invocation from a text file (or any
//! [`std::io::Read`]) and then treated as read-only for the remainder of
//! the query, per the lifecycle described in the project's data model.

pub mod error;
pub mod observable;
pub mod pauli;
pub mod subsystem;

pub use error::{Result, ShadowError};
pub use observable::{InvertedIndex, Observable, ObservableRegistry};
pub use pauli::{Outcome, PauliAxis, AXES};
pub use subsystem::{Subsystem, SubsystemRegistry};
