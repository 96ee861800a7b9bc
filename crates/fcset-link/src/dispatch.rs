use std::time::Duration;

use fcset_proto::sync::FieldWrite;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::channel::{
    ChannelError, DeviceChannel, StructuredReply, StructuredRequest, TelemetryControl,
};

/// Idle time between console lines. The firmware console is not
/// reentrant and silently drops input while the previous command runs.
pub const TEXT_SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// Both the structured call and the console path were tried and
    /// neither took the write.
    #[error("setting not supported by this firmware: {0}")]
    Unsupported(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Routes a named field write to the structured settings call, falling
/// back to the text console when the firmware lacks the capability.
/// Shared by every settings path so the try/fallback dance exists once.
#[derive(Debug, Clone)]
pub struct SettingsDispatcher {
    text_settle: Duration,
}

impl Default for SettingsDispatcher {
    fn default() -> Self {
        Self { text_settle: TEXT_SETTLE }
    }
}

impl SettingsDispatcher {
    pub fn with_settle(text_settle: Duration) -> Self {
        Self { text_settle }
    }

    pub async fn set_field<C, T>(
        &self,
        chan: &mut C,
        telemetry: &mut T,
        write: &FieldWrite,
    ) -> Result<(), DispatchError>
    where
        C: DeviceChannel,
        T: TelemetryControl,
    {
        let req = StructuredRequest::Set {
            name: write.name.clone(),
            value: write.value.clone(),
        };
        match chan.send_structured(&req).await {
            Ok(StructuredReply::Applied) => return Ok(()),
            Ok(StructuredReply::Unsupported) => {
                debug!("structured set unsupported for {}, trying console", write.name);
            }
            Err(ChannelError::Rejected(msg)) => {
                debug!("structured set rejected for {} ({}), trying console", write.name, msg);
            }
            Err(ChannelError::Transport(msg)) => return Err(DispatchError::Transport(msg)),
        }

        // console fallback; telemetry must be off the wire first
        telemetry.pause();
        let res = self.console_set(chan, write).await;
        telemetry.resume();
        res
    }

    async fn console_set<C: DeviceChannel>(
        &self,
        chan: &mut C,
        write: &FieldWrite,
    ) -> Result<(), DispatchError> {
        let line = format!("set {} = {}", write.name, write.value);
        self.console_line(chan, &line, &write.name).await?;
        // console writes land in RAM only; persist explicitly
        self.console_line(chan, "save", &write.name).await?;
        info!("console write applied: {}", write.name);
        Ok(())
    }

    async fn console_line<C: DeviceChannel>(
        &self,
        chan: &mut C,
        line: &str,
        field: &str,
    ) -> Result<(), DispatchError> {
        match chan.send_text_line(line).await {
            Ok(()) => {
                tokio::time::sleep(self.text_settle).await;
                Ok(())
            }
            Err(ChannelError::Rejected(msg)) => {
                warn!("console rejected '{}': {}", line, msg);
                Err(DispatchError::Unsupported(field.to_string()))
            }
            Err(ChannelError::Transport(msg)) => Err(DispatchError::Transport(msg)),
        }
    }

    /// One device-wide commit of the in-memory configuration to
    /// persistent storage.
    pub async fn commit<C, T>(&self, chan: &mut C, telemetry: &mut T) -> Result<(), DispatchError>
    where
        C: DeviceChannel,
        T: TelemetryControl,
    {
        match chan.send_structured(&StructuredRequest::Commit).await {
            Ok(StructuredReply::Applied) => return Ok(()),
            Ok(StructuredReply::Unsupported) | Err(ChannelError::Rejected(_)) => {}
            Err(ChannelError::Transport(msg)) => return Err(DispatchError::Transport(msg)),
        }

        telemetry.pause();
        let res = self.console_line(chan, "save", "save").await;
        telemetry.resume();
        res
    }

    /// Fire-and-forget reboot. The device drops the link the moment it
    /// accepts the command, so callers treat send errors as expected.
    pub async fn reboot<C, T>(&self, chan: &mut C, telemetry: &mut T) -> Result<(), DispatchError>
    where
        C: DeviceChannel,
        T: TelemetryControl,
    {
        match chan.send_structured(&StructuredRequest::Reboot).await {
            Ok(StructuredReply::Applied) => return Ok(()),
            Ok(StructuredReply::Unsupported) | Err(ChannelError::Rejected(_)) => {}
            Err(ChannelError::Transport(msg)) => return Err(DispatchError::Transport(msg)),
        }

        telemetry.pause();
        let res = self.console_line(chan, "reboot", "reboot").await;
        telemetry.resume();
        res
    }
}
