use fcset_proto::tuning::{AxisRateParams, RateAlgorithm, RawTuningFields, TuningRecord};

/// Legacy firmware leaves both per-axis roll/pitch max-rate slots at zero
/// and publishes the combined field instead. A genuine zero in both slots
/// is indistinguishable from "absent"; same heuristic the device uses.
pub fn detect_legacy(raw: &RawTuningFields) -> bool {
    raw.roll_rate == 0 && raw.pitch_rate == 0
}

/// Unified view of a raw field layout. For legacy shapes the combined
/// max-rate and shared expo are copied into both roll and pitch.
pub fn expand(raw: &RawTuningFields) -> TuningRecord {
    let legacy = detect_legacy(raw);

    let (roll_rate, pitch_rate) = if legacy {
        (raw.roll_pitch_rate, raw.roll_pitch_rate)
    } else {
        (raw.roll_rate, raw.pitch_rate)
    };
    let (roll_expo, pitch_expo) = if legacy {
        (raw.roll_pitch_expo, raw.roll_pitch_expo)
    } else {
        (raw.roll_expo, raw.pitch_expo)
    };

    TuningRecord {
        algorithm: RateAlgorithm::from_raw(raw.rates_type),
        roll: AxisRateParams {
            center_rate: raw.roll_center_rate,
            max_rate: roll_rate,
            expo: roll_expo,
        },
        pitch: AxisRateParams {
            center_rate: raw.pitch_center_rate,
            max_rate: pitch_rate,
            expo: pitch_expo,
        },
        yaw: AxisRateParams {
            center_rate: raw.yaw_center_rate,
            max_rate: raw.yaw_rate,
            expo: raw.yaw_expo,
        },
        combined_roll_pitch_rate: raw.roll_pitch_rate,
    }
}

/// Write-back layout for a unified record. The combined legacy fields
/// always mirror the ROLL axis, never pitch, so a pitch edit leaves them
/// unchanged and legacy firmware keeps reading a stable value.
pub fn collapse(record: &TuningRecord) -> RawTuningFields {
    RawTuningFields {
        rates_type: record.algorithm.to_raw(),
        roll_center_rate: record.roll.center_rate,
        pitch_center_rate: record.pitch.center_rate,
        yaw_center_rate: record.yaw.center_rate,
        roll_rate: record.roll.max_rate,
        pitch_rate: record.pitch.max_rate,
        yaw_rate: record.yaw.max_rate,
        roll_expo: record.roll.expo,
        pitch_expo: record.pitch.expo,
        yaw_expo: record.yaw.expo,
        roll_pitch_rate: record.roll.max_rate,
        roll_pitch_expo: record.roll.expo,
    }
}
