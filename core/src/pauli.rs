//! The Pauli axis alphabet and single-qubit measurement outcomes.

use crate::error::ShadowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single-qubit Pauli measurement basis.
///
/// Encoded 0/1/2 so it doubles as an array index and survives a round trip
/// through the text file formats unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PauliAxis {
    X = 0,
    Y = 1,
    Z = 2,
}

/// All three axes, in the canonical `X < Y < Z` tie-break order used
/// throughout the planner.
pub const AXES: [PauliAxis; 3] = [PauliAxis::X, PauliAxis::Y, PauliAxis::Z];

impl PauliAxis {
    /// Index into a length-3 per-axis array.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(PauliAxis::X),
            1 => Some(PauliAxis::Y),
            2 => Some(PauliAxis::Z),
            _ => None,
        }
    }
}

impl fmt::Display for PauliAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            PauliAxis::X => 'X',
            PauliAxis::Y => 'Y',
            PauliAxis::Z => 'Z',
        };
        write!(f, "{c}")
    }
}

impl FromStr for PauliAxis {
    type Err = ShadowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" | "x" => Ok(PauliAxis::X),
            "Y" | "y" => Ok(PauliAxis::Y),
            "Z" | "z" => Ok(PauliAxis::Z),
            other => Err(ShadowError::InvalidAxis(other.to_string())),
        }
    }
}

/// A ±1 projective measurement outcome.
///
/// Wrapping the raw integer keeps illegal values (0, ±2, …) from ever
/// crossing the parser boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i8)]
pub enum Outcome {
    Minus = -1,
    Plus = 1,
}

impl Outcome {
    pub fn as_i64(self) -> i64 {
        self as i8 as i64
    }

    pub fn as_f64(self) -> f64 {
        self as i8 as f64
    }
}

impl TryFrom<i64> for Outcome {
    type Error = ShadowError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Outcome::Plus),
            -1 => Ok(Outcome::Minus),
            other => Err(ShadowError::InvalidOutcome(other)),
        }
    }
}

impl std::ops::Mul for Outcome {
    type Output = Outcome;

    fn mul(self, rhs: Outcome) -> Outcome {
        if self.as_i64() == rhs.as_i64() {
            Outcome::Plus
        } else {
            Outcome::Minus
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_round_trips_through_display_and_parse() {
        for a in AXES {
            let parsed: PauliAxis = a.to_string().parse().unwrap();
            assert_eq!(parsed, a);
        }
    }

    #[test]
    fn invalid_axis_letter_is_rejected() {
        assert!("W".parse::<PauliAxis>().is_err());
    }

    #[test]
    fn outcome_rejects_non_unit_values() {
        assert!(Outcome::try_from(0).is_err());
        assert!(Outcome::try_from(2).is_err());
        assert_eq!(Outcome::try_from(1).unwrap(), Outcome::Plus);
        assert_eq!(Outcome::try_from(-1).unwrap(), Outcome::Minus);
    }

    #[test]
    fn outcome_multiplication_matches_sign_rules() {
        assert_eq!(Outcome::Plus * Outcome::Plus, Outcome::Plus);
        assert_eq!(Outcome::Minus * Outcome::Minus, Outcome::Plus);
        assert_eq!(Outcome::Plus * Outcome::Minus, Outcome::Minus);
    }
}
