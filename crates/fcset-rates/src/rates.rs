use fcset_proto::tuning::{AxisRateParams, RateAlgorithm};

/// Commanded angular velocity in deg/s for a stick deflection in [-1, 1].
/// Pure and deterministic; called on every edit for live preview.
pub fn rate(stick: f64, params: &AxisRateParams, algorithm: RateAlgorithm) -> f64 {
    let stick = stick.clamp(-1.0, 1.0);
    match algorithm {
        RateAlgorithm::Classic => classic(stick, params),
        RateAlgorithm::Polynomial => polynomial(stick, params),
        RateAlgorithm::Linear => linear(stick, params),
        RateAlgorithm::ActualDegPerSec => actual_deg_per_sec(stick, params),
        RateAlgorithm::Quick => quick(stick, params),
    }
}

/// Angular velocity at full deflection. Expo never changes this value,
/// for any of the five curve families.
pub fn max_rate(params: &AxisRateParams, algorithm: RateAlgorithm) -> f64 {
    rate(1.0, params, algorithm).abs()
}

/// Evenly sampled curve across [-1, 1], for preview rendering.
pub fn curve_points(
    params: &AxisRateParams,
    algorithm: RateAlgorithm,
    n: usize,
) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let stick = -1.0 + 2.0 * i as f64 / (n - 1) as f64;
            (stick, rate(stick, params, algorithm))
        })
        .collect()
}

fn classic(stick: f64, p: &AxisRateParams) -> f64 {
    let mut rc_rate = f64::from(p.center_rate) / 100.0;
    // firmware applies a correction above 2.0 to extend the usable range
    if rc_rate > 2.0 {
        rc_rate += (rc_rate - 2.0) * 14.54;
    }
    let rate = f64::from(p.max_rate) / 100.0;
    let expo = f64::from(p.expo) / 100.0;

    let cmd = if expo == 0.0 {
        stick
    } else {
        stick * stick.abs().powi(3) * expo + stick * (1.0 - expo)
    };

    let mut ang_vel = 200.0 * rc_rate * cmd;
    if rate > 0.0 {
        ang_vel /= (1.0 - stick.abs() * rate).max(0.01);
    }
    ang_vel
}

fn polynomial(stick: f64, p: &AxisRateParams) -> f64 {
    // raw integers arrive pre-scaled x100 relative to Classic
    let rate = f64::from(p.max_rate);
    let rc_rate = f64::from(p.center_rate) * 10.0;
    let expo = f64::from(p.expo);

    let ang_vel = (1.0 + 0.01 * expo * (stick * stick - 1.0)) * stick;
    ang_vel * (rc_rate + ang_vel.abs() * rc_rate * rate * 0.01)
}

fn linear(stick: f64, p: &AxisRateParams) -> f64 {
    let rate = f64::from(p.max_rate) / 100.0;
    let rc_rate = f64::from(p.center_rate) / 100.0;
    let expo = f64::from(p.expo) / 100.0;

    let denom = 1.0 - stick.abs() * rate;
    let curve = stick * stick;
    let cmd = (stick * curve * expo + stick * (1.0 - expo)) * (rc_rate / 10.0);
    2000.0 * cmd / denom
}

fn actual_deg_per_sec(stick: f64, p: &AxisRateParams) -> f64 {
    let max_rate = f64::from(p.max_rate) * 10.0;
    let center_rate = f64::from(p.center_rate) * 10.0;
    let expo = f64::from(p.expo) / 100.0;

    // signed despite the abs(): the inner blend keeps the stick sign
    let expof = stick.abs() * (stick.powi(5) * expo + stick * (1.0 - expo));
    let delta = (max_rate - center_rate).max(0.0);
    stick * center_rate + delta * expof
}

fn quick(stick: f64, p: &AxisRateParams) -> f64 {
    let rate = f64::from(p.max_rate) * 10.0;
    let rc_rate = f64::from(p.center_rate) / 100.0 * 200.0;
    let expo = f64::from(p.expo) / 100.0;

    // max rate can never drop below the center rate
    let rate = rate.max(rc_rate);
    let super_expo = (rate / rc_rate - 1.0) / (rate / rc_rate);
    let curve = stick.abs().powi(3) * expo + stick.abs() * (1.0 - expo);
    let ang_vel = 1.0 / (1.0 - curve * super_expo);
    stick * rc_rate * ang_vel
}
