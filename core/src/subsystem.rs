//! Subsystem Registry (component C2): lists of qubit indices defining
//! subsystems for Rényi-2 entropy queries.

use crate::error::{Result, ShadowError};
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// An ordered list of distinct qubit indices naming a subsystem.
#[derive(Debug, Clone)]
pub struct Subsystem {
    pub qubits: Vec<usize>,
}

impl Subsystem {
    pub fn size(&self) -> usize {
        self.qubits.len()
    }
}

#[derive(Debug, Clone)]
pub struct SubsystemRegistry {
    pub system_size: usize,
    subsystems: Vec<Subsystem>,
}

impl SubsystemRegistry {
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

        let mut subsystems = Vec::new();
        for (idx, line) in lines.enumerate() {
            let lineno = idx + 2;
            let line = line.map_err(|e| ShadowError::io(path, e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            subsystems.push(parse_subsystem_line(path, lineno, line, system_size)?);
        }

        Ok(Self {
            system_size,
            subsystems,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().into_owned();
        let file = std::fs::File::open(path).map_err(|e| ShadowError::io(&path_str, e))?;
        Self::from_reader_named(file, &path_str)
    }

    pub fn subsystems(&self) -> &[Subsystem] {
        &self.subsystems
    }
}

fn parse_subsystem_line(
    path: &str,
    lineno: usize,
    line: &str,
    system_size: usize,
) -> Result<Subsystem> {
    let mut tokens = line.split_whitespace();
    let s: usize = tokens
        .next()
        .ok_or_else(|| ShadowError::parse(path, lineno, "missing subsystem size"))?
        .parse()
        .map_err(|_| ShadowError::parse(path, lineno, "subsystem size must be an integer"))?;

    if s == 0 {
        return Err(ShadowError::EmptySubsystem);
    }

    let mut qubits = Vec::with_capacity(s);
    let mut seen = HashSet::with_capacity(s);
    for _ in 0..s {
        let tok = tokens
            .next()
            .ok_or_else(|| ShadowError::parse(path, lineno, "missing qubit index"))?;
        let q: usize = tok
            .parse()
            .map_err(|_| ShadowError::parse(path, lineno, "qubit index must be an integer"))?;
        if q >= system_size {
            return Err(ShadowError::QubitOutOfRange { qubit: q, n: system_size });
        }
        if !seen.insert(q) {
            return Err(ShadowError::DuplicateQubitInSubsystem(q));
        }
        qubits.push(q);
    }

    Ok(Subsystem { qubits })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_subsystems() {
        let reg = SubsystemRegistry::from_reader("4\n2 0 1\n1 3\n".as_bytes()).unwrap();
        assert_eq!(reg.subsystems().len(), 2);
        assert_eq!(reg.subsystems()[0].qubits, vec![0, 1]);
        assert_eq!(reg.subsystems()[1].qubits, vec![3]);
    }

    #[test]
    fn rejects_duplicate_qubit_within_subsystem() {
        let err = SubsystemRegistry::from_reader("4\n2 0 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ShadowError::DuplicateQubitInSubsystem(0)));
    }

    #[test]
    fn rejects_out_of_range_qubit() {
        let err = SubsystemRegistry::from_reader("2\n1 7\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ShadowError::QubitOutOfRange { .. }));
    }

    #[test]
    fn rejects_zero_size_subsystem() {
        let err = SubsystemRegistry::from_reader("2\n0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ShadowError::EmptySubsystem));
    }
}
