use anyhow::Result;
use fcset_proto::tuning::{AxisRateParams, RateAlgorithm, TuningRecord};

pub fn check_axis_params(axis: &str, p: &AxisRateParams) -> Result<()> {
    anyhow::ensure!(p.center_rate <= 255, "{}.center_rate out of range (0-255)", axis);
    anyhow::ensure!(p.max_rate <= 255, "{}.max_rate out of range (0-255)", axis);
    anyhow::ensure!(p.expo <= 100, "{}.expo out of range (0-100)", axis);
    Ok(())
}

pub fn check_tuning(record: &TuningRecord) -> Result<()> {
    check_axis_params("roll", &record.roll)?;
    check_axis_params("pitch", &record.pitch)?;
    check_axis_params("yaw", &record.yaw)?;

    for (axis, p) in [
        ("roll", &record.roll),
        ("pitch", &record.pitch),
        ("yaw", &record.yaw),
    ] {
        match record.algorithm {
            // center rate is a divisor in the super-expo term
            RateAlgorithm::Quick => {
                anyhow::ensure!(p.center_rate > 0, "{}.center_rate must be > 0 for quick rates", axis);
            }
            // max_rate of 100 puts the full-deflection denominator at zero
            RateAlgorithm::Linear => {
                anyhow::ensure!(p.max_rate < 100, "{}.max_rate must be < 100 for linear rates", axis);
            }
            _ => {}
        }
    }
    Ok(())
}
