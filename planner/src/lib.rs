//! # qshadow-planner
//!
//! The data-acquisition half of the classical shadow protocol: two
//! strategies for choosing which Pauli basis to measure in each shot.
//!
//! - [`randomized::RandomizedPlanner`] — component C4, i.i.d. uniform
//!   Pauli strings with no coverage guarantee.
//! - [`derandomized::DerandomizedPlanner`] — component C5, the greedy
//!   multiplicative-weight-update derandomization that is the core of
//!   this system.

pub mod derandomized;
pub mod randomized;

pub use derandomized::DerandomizedPlanner;
pub use randomized::RandomizedPlanner;
