//! Error types shared across the classical-shadow workspace.

use thiserror::Error;

/// Result type for classical-shadow operations.
pub type Result<T> = std::result::Result<T, ShadowError>;

/// Error types that can arise while planning measurements or estimating
/// properties from a measurement record.
#[derive(Error, Debug)]
pub enum ShadowError {
    /// Failed to open or read an input file.
    #[error("failed to read \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be parsed according to its file's format.
    #[error("{path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    /// A qubit index fell outside [0, n).
    #[error("qubit index {qubit} out of range for system size {n}")]
    QubitOutOfRange { qubit: usize, n: usize },

    /// Two files disagreed about the system size.
    #[error("system size mismatch: expected {expected}, found {found}")]
    SystemSizeMismatch { expected: usize, found: usize },

    /// An axis token was not one of X, Y, Z.
    #[error("invalid Pauli axis {0:?}, expected one of X, Y, Z")]
    InvalidAxis(String),

    /// An outcome token was not +1 or -1.
    #[error("invalid measurement outcome {0}, expected +1 or -1")]
    InvalidOutcome(i64),

    /// A subsystem listed zero qubits.
    #[error("subsystem must contain at least one qubit")]
    EmptySubsystem,

    /// A subsystem repeated a qubit index.
    #[error("qubit {0} appears more than once in the same subsystem")]
    DuplicateQubitInSubsystem(usize),

    /// An observable repeated a qubit index.
    #[error("qubit {0} appears more than once in the same observable")]
    DuplicateQubitInObservable(usize),

    /// A subsystem's size exceeds the practical 4^s table limit.
    #[error("subsystem of size {0} is too large to allocate a 4^s table")]
    SubsystemTooLarge(usize),

    /// The derandomized planner hit its safety limit before every
    /// observable reached quota.
    #[error(
        "planner budget exhausted after {shots} shots: {satisfied}/{total} observables satisfied"
    )]
    PlannerBudgetExhausted {
        shots: u64,
        satisfied: usize,
        total: usize,
    },
}

impl ShadowError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = ShadowError::parse("obs.txt", 3, "bad axis letter");
        assert!(err.to_string().contains("obs.txt:3"));
    }

    #[test]
    fn qubit_out_of_range_reports_both_values() {
        let err = ShadowError::QubitOutOfRange { qubit: 5, n: 3 };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }
}
