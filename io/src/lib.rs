//! # qshadow-io
//!
//! The text file formats described in the project's external interfaces:
//! the measurement log (component C3) read by both estimators, and the
//! writers shared by the planners and the CLI for emitting shots and
//! numeric estimates.
//!
//! Observable and subsystem file parsing lives in [`qshadow_core`]
//! (they're registries, not a log); this crate owns the one format that
//! is genuinely sequential and append-only.

pub mod measurement;
pub mod output;

pub use measurement::{MeasurementLog, Shot};
pub use output::{estimates_to_json, write_estimate_line, write_shot_line};
