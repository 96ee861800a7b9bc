use fcset_proto::sync::SettingValue;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelError {
    /// The channel itself failed. Surfaced verbatim; never retried here.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The device answered, and said no.
    #[error("command rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StructuredRequest {
    Set { name: String, value: SettingValue },
    Commit,
    Reboot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredReply {
    Applied,
    /// The firmware lacks this capability. Distinct from a transport
    /// failure; the caller may fall back to the text console.
    Unsupported,
}

/// Already-open duplex channel to the flight controller. Receivers take
/// `&mut self`: the firmware has no request correlation on the text path
/// and very little buffering on the structured one, so exclusive access
/// is the serialization mechanism.
#[allow(async_fn_in_trait)]
pub trait DeviceChannel {
    async fn send_structured(
        &mut self,
        req: &StructuredRequest,
    ) -> Result<StructuredReply, ChannelError>;

    async fn send_text_line(&mut self, line: &str) -> Result<(), ChannelError>;

    async fn disconnect(&mut self);

    async fn reconnect(&mut self, target: &str) -> bool;
}

/// Streaming telemetry shares the wire with the text console and cannot
/// interleave with it. Must be paused around any console interaction.
pub trait TelemetryControl {
    fn pause(&mut self);
    fn resume(&mut self);
}
