//! Black-box scenarios for the observable and entropy estimators.

use approx::assert_relative_eq;
use qshadow_core::{ObservableRegistry, Subsystem};
use qshadow_estimator::{estimate_entropy, estimate_observables};
use qshadow_io::MeasurementLog;

/// S3: single shot `X 1 Y -1 Z 1` -> each single-qubit observable
/// reports the outcome on its qubit.
#[test]
fn s3_single_shot_matches_reference_values() {
    let measurements = "3\nX 1 Y -1 Z 1\n";
    let log = MeasurementLog::from_reader(measurements.as_bytes()).unwrap();

    let x0 = ObservableRegistry::from_reader("3\n1 X 0\n".as_bytes()).unwrap();
    assert_relative_eq!(estimate_observables(&log, &x0)[0].value, 1.0, epsilon = 1e-9);

    let z2 = ObservableRegistry::from_reader("3\n1 Z 2\n".as_bytes()).unwrap();
    assert_relative_eq!(estimate_observables(&log, &z2)[0].value, 1.0, epsilon = 1e-9);

    let y1 = ObservableRegistry::from_reader("3\n1 Y 1\n".as_bytes()).unwrap();
    assert_relative_eq!(estimate_observables(&log, &y1)[0].value, -1.0, epsilon = 1e-9);
}

/// S4: two identical shots `X 1 X 1` on subsystem [0, 1] -> a pure
/// (zero-entropy) estimate once the raw U-statistic is clamped below 1.
#[test]
fn s4_identical_shots_give_zero_entropy() {
    let log = MeasurementLog::from_reader("2\nX 1 X 1\nX 1 X 1\n".as_bytes()).unwrap();
    let subsystem = Subsystem { qubits: vec![0, 1] };
    let entropy = estimate_entropy(&log, &subsystem).unwrap();
    assert_relative_eq!(entropy, 0.0, epsilon = 1e-8);
}
