//! Rate curve engine tests

use fcset_proto::tuning::{AxisRateParams, RateAlgorithm};
use fcset_rates::rates::{curve_points, max_rate, rate};

const ALGORITHMS: [RateAlgorithm; 5] = [
    RateAlgorithm::Classic,
    RateAlgorithm::Polynomial,
    RateAlgorithm::Linear,
    RateAlgorithm::ActualDegPerSec,
    RateAlgorithm::Quick,
];

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Parameter grid kept inside each algorithm's sane firmware range:
/// linear rates below 100 (full-deflection denominator), quick rates
/// with a nonzero center (super-expo divisor).
fn grid() -> Vec<AxisRateParams> {
    let mut out = Vec::new();
    for center_rate in [7, 70, 100, 180] {
        for max_rate in [10, 67, 95] {
            for expo in [0, 25, 75, 100] {
                out.push(AxisRateParams { center_rate, max_rate, expo });
            }
        }
    }
    out
}

#[test]
fn test_full_deflection_symmetry() {
    for algo in ALGORITHMS {
        for p in grid() {
            let m = max_rate(&p, algo);
            assert!(
                approx(rate(1.0, &p, algo), m, 1e-9),
                "{:?} {:?}: rate(1) != max_rate",
                algo,
                p
            );
            assert!(
                approx(rate(-1.0, &p, algo), -m, 1e-9),
                "{:?} {:?}: rate(-1) != -max_rate",
                algo,
                p
            );
        }
    }
}

#[test]
fn test_expo_never_changes_full_deflection() {
    for algo in ALGORITHMS {
        for center_rate in [70, 100, 180] {
            for max_rate_raw in [10, 67, 95] {
                let flat = AxisRateParams { center_rate, max_rate: max_rate_raw, expo: 0 };
                for expo in [25, 50, 100] {
                    let bent = AxisRateParams { center_rate, max_rate: max_rate_raw, expo };
                    assert!(
                        approx(max_rate(&flat, algo), max_rate(&bent, algo), 1e-9),
                        "{:?}: expo {} moved the full-deflection rate",
                        algo,
                        expo
                    );
                }
            }
        }
    }
}

#[test]
fn test_center_stick_is_zero() {
    for algo in ALGORITHMS {
        for p in grid() {
            assert_eq!(rate(0.0, &p, algo), 0.0, "{:?} {:?}", algo, p);
        }
    }
}

#[test]
fn test_classic_reference_values() {
    // the standard default-ish profile: rc_rate 1.0, rate 0.70, no expo
    let p = AxisRateParams { center_rate: 100, max_rate: 70, expo: 0 };

    // 200 * 1.0 / (1 - 0.70)
    assert!(approx(max_rate(&p, RateAlgorithm::Classic), 666.666_666_7, 1e-3));

    // half stick: 200 * 1.0 * 0.5 / (1 - 0.5 * 0.70)
    let half = rate(0.5, &p, RateAlgorithm::Classic);
    assert!(approx(half, 153.846, 1e-3));
    assert!(half < max_rate(&p, RateAlgorithm::Classic));
}

#[test]
fn test_classic_center_rate_correction_above_two() {
    // rc_rate 3.0 gets the firmware's +14.54 per unit correction:
    // (3.0 + 1.0 * 14.54) * 200 with no max-rate shaping
    let p = AxisRateParams { center_rate: 300, max_rate: 0, expo: 0 };
    assert!(approx(rate(1.0, &p, RateAlgorithm::Classic), 3508.0, 1e-9));
}

#[test]
fn test_classic_zero_max_rate_skips_shaping() {
    let p = AxisRateParams { center_rate: 100, max_rate: 0, expo: 0 };
    // pure linear 200 deg/s end to end
    assert!(approx(rate(1.0, &p, RateAlgorithm::Classic), 200.0, 1e-9));
    assert!(approx(rate(0.25, &p, RateAlgorithm::Classic), 50.0, 1e-9));
}

#[test]
fn test_actual_center_rate_floors_max() {
    // center above max: delta clamps to zero, full deflection lands on
    // the center rate
    let p = AxisRateParams { center_rate: 70, max_rate: 50, expo: 0 };
    assert!(approx(max_rate(&p, RateAlgorithm::ActualDegPerSec), 700.0, 1e-9));

    // center below max: full deflection reaches the configured max
    let p = AxisRateParams { center_rate: 18, max_rate: 67, expo: 0 };
    assert!(approx(max_rate(&p, RateAlgorithm::ActualDegPerSec), 670.0, 1e-9));
}

#[test]
fn test_quick_rate_clamped_to_center() {
    // configured max (100 deg/s) below the center rate (200 deg/s):
    // the clamp kills the super-expo term entirely
    let p = AxisRateParams { center_rate: 100, max_rate: 10, expo: 0 };
    assert!(approx(max_rate(&p, RateAlgorithm::Quick), 200.0, 1e-9));
}

#[test]
fn test_quick_reaches_configured_max() {
    let p = AxisRateParams { center_rate: 100, max_rate: 67, expo: 0 };
    assert!(approx(max_rate(&p, RateAlgorithm::Quick), 670.0, 1e-9));
}

#[test]
fn test_polynomial_reference_value() {
    // rc_rate 80*10, rate 67: 800 + 800 * 67 * 0.01
    let p = AxisRateParams { center_rate: 80, max_rate: 67, expo: 0 };
    assert!(approx(max_rate(&p, RateAlgorithm::Polynomial), 1336.0, 1e-9));
}

#[test]
fn test_linear_reference_value() {
    // (1.0 / 10) * 2000 / (1 - 0.67)
    let p = AxisRateParams { center_rate: 100, max_rate: 67, expo: 0 };
    assert!(approx(max_rate(&p, RateAlgorithm::Linear), 606.060_606, 1e-3));
}

#[test]
fn test_engine_is_deterministic() {
    let p = AxisRateParams { center_rate: 120, max_rate: 80, expo: 40 };
    for algo in ALGORITHMS {
        let first = rate(0.3, &p, algo);
        for _ in 0..10 {
            assert_eq!(rate(0.3, &p, algo), first);
        }
    }
}

#[test]
fn test_curve_points_sampling() {
    let p = AxisRateParams { center_rate: 100, max_rate: 70, expo: 30 };
    let pts = curve_points(&p, RateAlgorithm::Classic, 21);

    assert_eq!(pts.len(), 21);
    assert!(approx(pts[0].0, -1.0, 1e-12));
    assert!(approx(pts[20].0, 1.0, 1e-12));
    assert_eq!(pts[10].1, 0.0);
    assert!(approx(pts[20].1, max_rate(&p, RateAlgorithm::Classic), 1e-9));
}

#[test]
fn test_out_of_range_stick_is_clamped() {
    let p = AxisRateParams { center_rate: 100, max_rate: 70, expo: 0 };
    for algo in ALGORITHMS {
        assert_eq!(rate(1.5, &p, algo), rate(1.0, &p, algo));
        assert_eq!(rate(-7.0, &p, algo), rate(-1.0, &p, algo));
    }
}
