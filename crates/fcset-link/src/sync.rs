use fcset_proto::sync::{ConfigDomain, FieldWrite, SaveOutcome};
use fcset_proto::tuning::TuningRecord;
use tracing::{info, warn};

use crate::channel::{DeviceChannel, TelemetryControl};
use crate::dispatch::{DispatchError, SettingsDispatcher};

type ModesProbe = Box<dyn Fn() -> bool + Send + Sync>;

/// Session-owned dirty tracking across config domains, plus the staged
/// field writes behind each flag. One value per connection; no globals.
#[derive(Default)]
pub struct ConfigSyncState {
    dirty: [bool; 3],
    staged: [Vec<FieldWrite>; 3],
    modes_probe: Option<ModesProbe>,
}

impl ConfigSyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Externally-owned "modes changed" predicate, OR-ed into
    /// is_modified alongside the domain flags.
    pub fn set_modes_probe(&mut self, probe: impl Fn() -> bool + Send + Sync + 'static) {
        self.modes_probe = Some(Box::new(probe));
    }

    pub fn mark_dirty(&mut self, domain: ConfigDomain) {
        self.dirty[domain.index()] = true;
    }

    pub fn is_dirty(&self, domain: ConfigDomain) -> bool {
        self.dirty[domain.index()]
    }

    pub fn stage(&mut self, domain: ConfigDomain, write: FieldWrite) {
        self.staged[domain.index()].push(write);
        self.dirty[domain.index()] = true;
    }

    pub fn staged(&self, domain: ConfigDomain) -> &[FieldWrite] {
        &self.staged[domain.index()]
    }

    pub fn is_modified(&self) -> bool {
        self.dirty.iter().any(|d| *d)
            || self.modes_probe.as_ref().map(|p| p()).unwrap_or(false)
    }

    /// Dropped wholesale on disconnect.
    pub fn clear(&mut self) {
        self.dirty = [false; 3];
        for writes in &mut self.staged {
            writes.clear();
        }
    }

    /// Pushes every dirty domain to the device in fixed order, then one
    /// device-wide commit. The walk stops at the first failing domain;
    /// later domains are untouched so a retry only re-sends what failed.
    /// Dirty flags clear only after the commit succeeds, all at once.
    pub async fn save_all<C, T>(
        &mut self,
        dispatcher: &SettingsDispatcher,
        chan: &mut C,
        telemetry: &mut T,
    ) -> SaveOutcome
    where
        C: DeviceChannel,
        T: TelemetryControl,
    {
        for domain in ConfigDomain::ALL {
            if !self.dirty[domain.index()] {
                continue;
            }
            for write in &self.staged[domain.index()] {
                match dispatcher.set_field(chan, telemetry, write).await {
                    Ok(()) => {}
                    Err(DispatchError::Unsupported(field)) => {
                        warn!("save stopped in {:?}: {} not supported", domain, field);
                        return SaveOutcome::PartialFailure(domain);
                    }
                    Err(DispatchError::Transport(msg)) => {
                        warn!("save stopped in {:?}: {}", domain, msg);
                        return SaveOutcome::TransportError(msg);
                    }
                }
            }
            info!("domain {:?} written", domain);
        }

        // a single commit for the whole save; commits are slow and the
        // firmware serializes them anyway
        if let Err(e) = dispatcher.commit(chan, telemetry).await {
            warn!("commit failed: {}", e);
            return SaveOutcome::TransportError(e.to_string());
        }

        self.clear();
        info!("configuration saved");
        SaveOutcome::Success
    }
}

/// Named firmware writes for a tuning record, routed through the legacy
/// write-back layout so older firmware keeps reading consistent combined
/// fields.
pub fn tuning_writes(record: &TuningRecord) -> Vec<FieldWrite> {
    let raw = fcset_rates::legacy::collapse(record);
    vec![
        FieldWrite::int("rates_type", i64::from(raw.rates_type)),
        FieldWrite::int("roll_center_rate", i64::from(raw.roll_center_rate)),
        FieldWrite::int("pitch_center_rate", i64::from(raw.pitch_center_rate)),
        FieldWrite::int("yaw_center_rate", i64::from(raw.yaw_center_rate)),
        FieldWrite::int("roll_rate", i64::from(raw.roll_rate)),
        FieldWrite::int("pitch_rate", i64::from(raw.pitch_rate)),
        FieldWrite::int("yaw_rate", i64::from(raw.yaw_rate)),
        FieldWrite::int("roll_expo", i64::from(raw.roll_expo)),
        FieldWrite::int("pitch_expo", i64::from(raw.pitch_expo)),
        FieldWrite::int("yaw_expo", i64::from(raw.yaw_expo)),
        FieldWrite::int("roll_pitch_rate", i64::from(raw.roll_pitch_rate)),
        FieldWrite::int("roll_pitch_expo", i64::from(raw.roll_pitch_expo)),
    ]
}
