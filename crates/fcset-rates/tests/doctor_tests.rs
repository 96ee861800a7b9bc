//! Tuning validation tests

use fcset_proto::tuning::{AxisRateParams, RateAlgorithm, TuningRecord};
use fcset_rates::doctor::{check_axis_params, check_tuning};

fn record(algorithm: RateAlgorithm) -> TuningRecord {
    let axis = AxisRateParams { center_rate: 100, max_rate: 70, expo: 30 };
    TuningRecord {
        algorithm,
        roll: axis,
        pitch: axis,
        yaw: axis,
        combined_roll_pitch_rate: 70,
    }
}

#[test]
fn test_sane_record_passes() {
    for algo in [
        RateAlgorithm::Classic,
        RateAlgorithm::Polynomial,
        RateAlgorithm::Linear,
        RateAlgorithm::ActualDegPerSec,
        RateAlgorithm::Quick,
    ] {
        assert!(check_tuning(&record(algo)).is_ok(), "{:?}", algo);
    }
}

#[test]
fn test_axis_ranges_enforced() {
    let p = AxisRateParams { center_rate: 300, max_rate: 70, expo: 0 };
    assert!(check_axis_params("roll", &p).is_err());

    let p = AxisRateParams { center_rate: 100, max_rate: 70, expo: 101 };
    assert!(check_axis_params("roll", &p).is_err());
}

#[test]
fn test_linear_rejects_full_rate() {
    let mut rec = record(RateAlgorithm::Linear);
    rec.pitch.max_rate = 100;
    assert!(check_tuning(&rec).is_err());
}

#[test]
fn test_quick_rejects_zero_center() {
    let mut rec = record(RateAlgorithm::Quick);
    rec.yaw.center_rate = 0;
    assert!(check_tuning(&rec).is_err());

    // zero center is fine elsewhere
    let mut rec = record(RateAlgorithm::Classic);
    rec.yaw.center_rate = 0;
    assert!(check_tuning(&rec).is_ok());
}
