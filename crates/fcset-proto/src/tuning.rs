use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Roll,
    Pitch,
    Yaw,
}

/// Rate curve family selected on the firmware side. One setting for the
/// whole connection, never per-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateAlgorithm {
    Classic,
    Polynomial,
    Linear,
    ActualDegPerSec,
    Quick,
}

impl RateAlgorithm {
    /// Maps the firmware `rates_type` integer. Unknown values read back as
    /// Classic, which is what old firmware reports anyway.
    pub fn from_raw(v: u16) -> Self {
        match v {
            1 => RateAlgorithm::Polynomial,
            2 => RateAlgorithm::Linear,
            3 => RateAlgorithm::ActualDegPerSec,
            4 => RateAlgorithm::Quick,
            _ => RateAlgorithm::Classic,
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            RateAlgorithm::Classic => 0,
            RateAlgorithm::Polynomial => 1,
            RateAlgorithm::Linear => 2,
            RateAlgorithm::ActualDegPerSec => 3,
            RateAlgorithm::Quick => 4,
        }
    }
}

/// Per-axis tuning integers exactly as the firmware transmits them.
/// Physical meaning depends on the active RateAlgorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRateParams {
    pub center_rate: u16,
    pub max_rate: u16,
    pub expo: u16,
}

/// Unified per-axis tuning state plus the legacy combined field older
/// firmware revisions still read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuningRecord {
    pub algorithm: RateAlgorithm,
    pub roll: AxisRateParams,
    pub pitch: AxisRateParams,
    pub yaw: AxisRateParams,
    #[serde(default)]
    pub combined_roll_pitch_rate: u16,
}

impl TuningRecord {
    pub fn axis(&self, axis: Axis) -> &AxisRateParams {
        match axis {
            Axis::Roll => &self.roll,
            Axis::Pitch => &self.pitch,
            Axis::Yaw => &self.yaw,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisRateParams {
        match axis {
            Axis::Roll => &mut self.roll,
            Axis::Pitch => &mut self.pitch,
            Axis::Yaw => &mut self.yaw,
        }
    }
}

/// Draft tuning state as edited in the UI, compared against the snapshot
/// taken when the record was loaded from the device. Lives for one
/// connection session; dropped on disconnect.
#[derive(Debug, Clone)]
pub struct TuningDraft {
    pub current: TuningRecord,
    original: TuningRecord,
}

impl TuningDraft {
    pub fn new(record: TuningRecord) -> Self {
        Self { original: record.clone(), current: record }
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.original
    }

    /// Re-snapshot after a successful save.
    pub fn accept(&mut self) {
        self.original = self.current.clone();
    }

    pub fn revert(&mut self) {
        self.current = self.original.clone();
    }
}

/// On-device field layout. Modern firmware fills the per-axis fields;
/// legacy revisions leave roll/pitch max rates at zero and publish the
/// shared roll_pitch_* fields instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTuningFields {
    pub rates_type: u16,
    pub roll_center_rate: u16,
    pub pitch_center_rate: u16,
    pub yaw_center_rate: u16,
    pub roll_rate: u16,
    pub pitch_rate: u16,
    pub yaw_rate: u16,
    pub roll_expo: u16,
    pub pitch_expo: u16,
    pub yaw_expo: u16,
    pub roll_pitch_rate: u16,
    pub roll_pitch_expo: u16,
}
