//! Integration coverage for the measurement-log text format against the
//! public API only.

use qshadow_core::{Outcome, PauliAxis, ShadowError};
use qshadow_io::MeasurementLog;

#[test]
fn round_trips_axes_and_outcomes_for_every_shot() {
    let log = MeasurementLog::from_reader("2\nX 1 Z -1\nY -1 X 1\n".as_bytes()).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log.shots()[0].axes, vec![PauliAxis::X, PauliAxis::Z]);
    assert_eq!(log.shots()[0].outcomes, vec![Outcome::Plus, Outcome::Minus]);
    assert_eq!(log.shots()[1].axes, vec![PauliAxis::Y, PauliAxis::X]);
}

#[test]
fn reports_a_line_number_on_malformed_input() {
    let err = MeasurementLog::from_reader("1\nX 1\nX\n".as_bytes()).unwrap_err();
    match err {
        ShadowError::Parse { line, .. } => assert_eq!(line, 3),
        other => panic!("expected a Parse error, got {other:?}"),
    }
}

#[test]
fn empty_log_has_zero_shots() {
    let log = MeasurementLog::from_reader("5\n".as_bytes()).unwrap();
    assert!(log.is_empty());
}
