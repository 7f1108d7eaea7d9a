//! Observable Registry (component C1): parsing and indexing the list of
//! weighted k-local Pauli observables a classical-shadow query is run
//! against.

use crate::error::{Result, ShadowError};
use crate::pauli::PauliAxis;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A weighted k-local Pauli observable: an unordered set of
/// `(qubit, axis)` pairs with distinct qubit indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observable {
    pub id: usize,
    /// `(qubit, axis)` pairs, sorted by qubit index.
    pub terms: Vec<(usize, PauliAxis)>,
    pub weight: f64,
}

impl Observable {
    pub fn k_local(&self) -> usize {
        self.terms.len()
    }
}

/// `acts[q][a]` as a flat offsets-plus-concatenated-array structure:
/// cache-friendlier than a nested `Vec<Vec<Vec<usize>>>` and equivalent in
/// contract (design notes, spec §9).
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    /// `offsets[3*q + a]..offsets[3*q + a + 1]` indexes into `entries`.
    offsets: Vec<u32>,
    entries: Vec<u32>,
}

impl InvertedIndex {
    fn build(n: usize, observables: &[Observable]) -> Self {
        let buckets = 3 * n;
        let mut counts = vec![0u32; buckets];
        for obs in observables {
            for &(q, a) in &obs.terms {
                counts[3 * q + a.index()] += 1;
            }
        }

        let mut offsets = vec![0u32; buckets + 1];
        for b in 0..buckets {
            offsets[b + 1] = offsets[b] + counts[b];
        }

        let mut entries = vec![0u32; offsets[buckets] as usize];
        let mut cursor = offsets.clone();
        for obs in observables {
            for &(q, a) in &obs.terms {
                let bucket = 3 * q + a.index();
                entries[cursor[bucket] as usize] = obs.id as u32;
                cursor[bucket] += 1;
            }
        }

        Self { offsets, entries }
    }

    /// Observable indices `i` such that `(q, a) ∈ Oᵢ`, in ascending order.
    pub fn acting_on(&self, q: usize, a: PauliAxis) -> &[u32] {
        let bucket = 3 * q + a.index();
        let start = self.offsets[bucket] as usize;
        let end = self.offsets[bucket + 1] as usize;
        &self.entries[start..end]
    }
}

/// Parsed and indexed collection of observables (component C1).
#[derive(Debug, Clone)]
pub struct ObservableRegistry {
    pub system_size: usize,
    observables: Vec<Observable>,
    acts: InvertedIndex,
    k_max: usize,
}

impl ObservableRegistry {
    /// Parse from an in-memory reader (the filesystem-free half of the
    /// I/O boundary; `from_path` layers file handling on top).
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

        let mut observables = Vec::new();
        for (idx, line) in lines.enumerate() {
            let lineno = idx + 2;
            let line = line.map_err(|e| ShadowError::io(path, e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let obs = parse_observable_line(path, lineno, line, system_size, observables.len())?;
            observables.push(obs);
        }

        let k_max = observables.iter().map(Observable::k_local).max().unwrap_or(0);
        let acts = InvertedIndex::build(system_size, &observables);

        tracing::debug!(
            count = observables.len(),
            k_max,
            system_size,
            "parsed observable registry"
        );

        Ok(Self {
            system_size,
            observables,
            acts,
            k_max,
        })
    }

    /// Parse from a file on disk, mapping I/O failures to
    /// [`ShadowError::Io`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().into_owned();
        let file = std::fs::File::open(path).map_err(|e| ShadowError::io(&path_str, e))?;
        Self::from_reader_named(file, &path_str)
    }

    pub fn observables(&self) -> &[Observable] {
        &self.observables
    }

    pub fn len(&self) -> usize {
        self.observables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observables.is_empty()
    }

    pub fn k_max(&self) -> usize {
        self.k_max
    }

    pub fn acts(&self) -> &InvertedIndex {
        &self.acts
    }
}

fn parse_observable_line(
    path: &str,
    lineno: usize,
    line: &str,
    system_size: usize,
    id: usize,
) -> Result<Observable> {
    let mut tokens = line.split_whitespace();
    let k_local: usize = tokens
        .next()
        .ok_or_else(|| ShadowError::parse(path, lineno, "missing k_local"))?
        .parse()
        .map_err(|_| ShadowError::parse(path, lineno, "k_local must be an integer"))?;

    let mut terms = Vec::with_capacity(k_local);
    let mut seen = HashSet::with_capacity(k_local);
    for _ in 0..k_local {
        let axis_tok = tokens
            .next()
            .ok_or_else(|| ShadowError::parse(path, lineno, "missing Pauli axis"))?;
        let axis: PauliAxis = axis_tok
            .parse()
            .map_err(|_| ShadowError::InvalidAxis(axis_tok.to_string()))?;

        let qubit_tok = tokens
            .next()
            .ok_or_else(|| ShadowError::parse(path, lineno, "missing qubit index"))?;
        let qubit: usize = qubit_tok
            .parse()
            .map_err(|_| ShadowError::parse(path, lineno, "qubit index must be an integer"))?;

        if qubit >= system_size {
            return Err(ShadowError::QubitOutOfRange {
                qubit,
                n: system_size,
            });
        }
        if !seen.insert(qubit) {
            tracing::warn!(qubit, lineno, "duplicate qubit within one observable");
            return Err(ShadowError::DuplicateQubitInObservable(qubit));
        }

        terms.push((qubit, axis));
    }

    let weight: f64 = match tokens.next() {
        Some(tok) => tok
            .parse()
            .map_err(|_| ShadowError::parse(path, lineno, "weight must be a positive float"))?,
        None => 1.0,
    };
    if !(weight > 0.0) {
        return Err(ShadowError::parse(path, lineno, "weight must be positive"));
    }

    terms.sort_by_key(|&(q, _)| q);

    Ok(Observable { id, terms, weight })
}
