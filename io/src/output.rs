//! Writers for the planner's shot stream and the estimators' numeric
//! output, shared so the CLI's `--out`/`--format` handling stays in one
//! place rather than being duplicated per subcommand.

use qshadow_core::PauliAxis;
use std::io::{self, Write};

/// Appends one shot (`n` space-separated axis characters) to `out`,
/// matching the planner output format (spec §6.2).
pub fn write_shot_line<W: Write>(out: &mut W, axes: &[PauliAxis]) -> io::Result<()> {
    for (i, axis) in axes.iter().enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        write!(out, "{axis}")?;
    }
    writeln!(out)
}

/// Appends one estimate, fixed to 6 decimal places (spec §6.2: "at least
/// 6 decimals").
pub fn write_estimate_line<W: Write>(out: &mut W, value: f64) -> io::Result<()> {
    writeln!(out, "{value:.6}")
}

/// Renders a slice of estimates as a `--format json` array, in the order
/// given.
pub fn estimates_to_json(values: &[f64]) -> String {
    serde_json::to_string_pretty(values).expect("f64 slice always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shot_line_uses_single_space_separation() {
        let mut buf = Vec::new();
        write_shot_line(&mut buf, &[PauliAxis::X, PauliAxis::Z]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "X Z\n");
    }

    #[test]
    fn estimate_line_has_six_decimals() {
        let mut buf = Vec::new();
        write_estimate_line(&mut buf, 1.0).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1.000000\n");
    }
}
