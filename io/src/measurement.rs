//! Measurement Log (component C3): the recorded Pauli-basis, ±1-outcome
//! shots a lab run (or the planner, via [`crate::output::write_shot_line`])
//! produces.

use qshadow_core::{Outcome, PauliAxis, Result, ShadowError};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// One n-qubit measurement: an axis and an outcome for every qubit.
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub axes: Vec<PauliAxis>,
    pub outcomes: Vec<Outcome>,
}

impl Shot {
    pub fn new(axes: Vec<PauliAxis>, outcomes: Vec<Outcome>) -> Self {
        debug_assert_eq!(axes.len(), outcomes.len());
        Self { axes, outcomes }
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}

/// An ordered sequence of shots sharing one system size.
#[derive(Debug, Clone)]
pub struct MeasurementLog {
    pub system_size: usize,
    shots: Vec<Shot>,
}

impl MeasurementLog {
    pub fn new(system_size: usize) -> Self {
        Self {
            system_size,
            shots: Vec::new(),
        }
    }

    /// Append a shot produced elsewhere (e.g. by the planner, or by
    /// re-replaying axes against fresh lab outcomes).
    pub fn push_shot(&mut self, shot: Shot) {
        debug_assert_eq!(shot.len(), self.system_size);
        self.shots.push(shot);
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_named(reader, "<reader>")
    }

    fn from_reader_named<R: Read>(reader: R, path: &str) -> Result<Self> {
        let mut lines = BufReader::new(reader).lines();

        let header = lines
            .next()
            .ok_or_else(|| ShadowError::parse(path, 1, "missing system size"))?
            .map_err(|e| ShadowError::io(path, e))?;
        let system_size: usize = header
            .split_whitespace()
            .next()
            .ok_or_else(|| ShadowError::parse(path, 1, "missing system size"))?
            .parse()
            .map_err(|_| ShadowError::parse(path, 1, "system size must be an integer"))?;

        let mut log = MeasurementLog::new(system_size);
        for (idx, line) in lines.enumerate() {
            let lineno = idx + 2;
            let line = line.map_err(|e| ShadowError::io(path, e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            log.push_shot(parse_shot_line(path, lineno, line, system_size)?);
        }

        tracing::debug!(shots = log.len(), system_size, "loaded measurement log");
        Ok(log)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().into_owned();
        let file = std::fs::File::open(path).map_err(|e| ShadowError::io(&path_str, e))?;
        Self::from_reader_named(file, &path_str)
    }
}

fn parse_shot_line(path: &str, lineno: usize, line: &str, system_size: usize) -> Result<Shot> {
    let mut tokens = line.split_whitespace();
    let mut axes = Vec::with_capacity(system_size);
    let mut outcomes = Vec::with_capacity(system_size);

    for _ in 0..system_size {
        let axis_tok = tokens
            .next()
            .ok_or_else(|| ShadowError::parse(path, lineno, "missing Pauli axis"))?;
        let axis: PauliAxis = axis_tok
            .parse()
            .map_err(|_| ShadowError::InvalidAxis(axis_tok.to_string()))?;

        let outcome_tok = tokens
            .next()
            .ok_or_else(|| ShadowError::parse(path, lineno, "missing outcome"))?;
        let outcome_raw: i64 = outcome_tok
            .parse()
            .map_err(|_| ShadowError::parse(path, lineno, "outcome must be +1 or -1"))?;
        let outcome = Outcome::try_from(outcome_raw)?;

        axes.push(axis);
        outcomes.push(outcome);
    }

    Ok(Shot::new(axes, outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_shot() {
        let log = MeasurementLog::from_reader("3\nX 1 Y -1 Z 1\n".as_bytes()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.shots()[0].axes, vec![PauliAxis::X, PauliAxis::Y, PauliAxis::Z]);
        assert_eq!(
            log.shots()[0].outcomes,
            vec![Outcome::Plus, Outcome::Minus, Outcome::Plus]
        );
    }

    #[test]
    fn rejects_invalid_outcome() {
        let err = MeasurementLog::from_reader("1\nX 2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ShadowError::InvalidOutcome(2)));
    }

    #[test]
    fn skips_blank_lines_between_shots() {
        let log = MeasurementLog::from_reader("1\nX 1\n\nZ -1\n".as_bytes()).unwrap();
        assert_eq!(log.len(), 2);
    }
}
