use std::time::Duration;

use fcset_proto::sync::FieldWrite;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::channel::{DeviceChannel, TelemetryControl};
use crate::dispatch::SettingsDispatcher;

/// Settings the firmware only applies after a restart.
const RESTART_FIELDS: &[&str] = &["platform_type", "mixer_profile", "applied_defaults"];

/// Safety settings that force a restart only when the firmware target is
/// simulated; real targets apply them live.
const SIM_RESTART_FIELDS: &[&str] = &["failsafe_procedure", "nav_extra_arming_safety"];

pub fn restart_required(field: &str, simulated_target: bool) -> bool {
    RESTART_FIELDS.contains(&field)
        || (simulated_target && SIM_RESTART_FIELDS.contains(&field))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconfigState {
    Idle,
    Writing,
    Committing,
    Rebooting,
    Reconnecting,
    Error,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconfigError {
    #[error("a reconfiguration is already in flight")]
    Busy,
    #[error("no reconfiguration session open")]
    NotStarted,
    #[error("reconfiguration failed: {0}")]
    Failed(String),
}

/// Fixed pacing for the restart cycle. Empirical firmware timing, not
/// derived from a handshake; the device cannot be queried mid-reboot.
#[derive(Debug, Clone)]
pub struct ReconfigTiming {
    /// storage flush time between commit and reboot request
    pub commit_flush: Duration,
    /// typical boot time, sized conservatively
    pub reboot_grace: Duration,
}

impl Default for ReconfigTiming {
    fn default() -> Self {
        Self {
            commit_flush: Duration::from_millis(500),
            reboot_grace: Duration::from_millis(3000),
        }
    }
}

/// One restart-requiring change in flight. Lives from begin() until the
/// machine lands back in Idle or the user dismisses the Error state.
#[derive(Debug, Clone)]
pub struct ReconfigSession {
    pub target_description: String,
    pub state: ReconfigState,
    pub error: Option<String>,
}

/// Drives write -> commit -> reboot -> reconnect as an explicit state
/// machine. One instance per connection; overlapping restart cycles
/// would race on the same transport handle, so begin() gates entry.
pub struct Reconfigurator {
    session: Option<ReconfigSession>,
    timing: ReconfigTiming,
    dispatcher: SettingsDispatcher,
}

impl Reconfigurator {
    pub fn new(dispatcher: SettingsDispatcher, timing: ReconfigTiming) -> Self {
        Self { session: None, timing, dispatcher }
    }

    pub fn state(&self) -> ReconfigState {
        self.session.as_ref().map(|s| s.state).unwrap_or(ReconfigState::Idle)
    }

    pub fn session(&self) -> Option<&ReconfigSession> {
        self.session.as_ref()
    }

    /// Opens a session. Refused while any session exists, including one
    /// parked in Error waiting for dismissal.
    pub fn begin(&mut self, target_description: &str) -> Result<(), ReconfigError> {
        if self.session.is_some() {
            return Err(ReconfigError::Busy);
        }
        info!("reconfiguration started: {}", target_description);
        self.session = Some(ReconfigSession {
            target_description: target_description.to_string(),
            state: ReconfigState::Writing,
            error: None,
        });
        Ok(())
    }

    /// Error is the only state the user can leave manually.
    pub fn dismiss(&mut self) -> bool {
        match self.state() {
            ReconfigState::Error => {
                self.session = None;
                true
            }
            _ => false,
        }
    }

    /// Runs the machine from Writing to a terminal state. on_reload fires
    /// exactly once, after a successful reconnect: nothing about the
    /// device state is trusted across a reboot.
    pub async fn run<C, T, F>(
        &mut self,
        chan: &mut C,
        telemetry: &mut T,
        writes: &[FieldWrite],
        reconnect_target: &str,
        mut on_reload: F,
    ) -> Result<(), ReconfigError>
    where
        C: DeviceChannel,
        T: TelemetryControl,
        F: FnMut(),
    {
        match self.state() {
            ReconfigState::Writing => {}
            ReconfigState::Idle => return Err(ReconfigError::NotStarted),
            _ => return Err(ReconfigError::Busy),
        }

        loop {
            match self.state() {
                ReconfigState::Idle | ReconfigState::Error => break,

                ReconfigState::Writing => {
                    let mut failed = None;
                    for write in writes {
                        if let Err(e) =
                            self.dispatcher.set_field(chan, telemetry, write).await
                        {
                            failed = Some(e.to_string());
                            break;
                        }
                    }
                    match failed {
                        Some(msg) => self.fail(msg),
                        None => self.advance(ReconfigState::Committing),
                    }
                }

                ReconfigState::Committing => match self.dispatcher.commit(chan, telemetry).await {
                    Ok(()) => {
                        tokio::time::sleep(self.timing.commit_flush).await;
                        self.advance(ReconfigState::Rebooting);
                    }
                    Err(e) => self.fail(e.to_string()),
                },

                ReconfigState::Rebooting => {
                    // the device drops the link as soon as it accepts the
                    // command, so an error on this send is the normal case
                    if let Err(e) = self.dispatcher.reboot(chan, telemetry).await {
                        debug!("reboot send returned {}; device likely already down", e);
                    }
                    tokio::time::sleep(self.timing.reboot_grace).await;
                    self.advance(ReconfigState::Reconnecting);
                }

                ReconfigState::Reconnecting => {
                    if chan.reconnect(reconnect_target).await {
                        info!("device back after restart, reloading configuration");
                        on_reload();
                        self.session = None;
                    } else {
                        self.fail("could not reconnect to the device after restart".into());
                    }
                }
            }
        }

        match self.session.as_ref() {
            None => Ok(()),
            Some(s) => Err(ReconfigError::Failed(
                s.error.clone().unwrap_or_else(|| "unknown failure".into()),
            )),
        }
    }

    fn advance(&mut self, next: ReconfigState) {
        if let Some(s) = self.session.as_mut() {
            debug!("reconfiguration: {:?} -> {:?}", s.state, next);
            s.state = next;
        }
    }

    fn fail(&mut self, msg: String) {
        warn!("reconfiguration failed: {}", msg);
        if let Some(s) = self.session.as_mut() {
            s.state = ReconfigState::Error;
            s.error = Some(msg);
        }
    }
}
