//! In-memory stand-in for a connected flight controller, used by the
//! integration tests and by `fcset plan --dry-run`.

use std::collections::{HashMap, HashSet};

use crate::channel::{
    ChannelError, DeviceChannel, StructuredReply, StructuredRequest, TelemetryControl,
};

/// Scriptable fake device. Structured support is per-field; every
/// accepted command lands in `log` for assertions.
#[derive(Debug)]
pub struct FakeDevice {
    pub settings: HashMap<String, String>,
    /// fields the structured path answers Unsupported for
    pub unsupported: HashSet<String>,
    /// fields the console rejects too (both paths fail)
    pub console_rejects: HashSet<String>,
    /// reboot is accepted but the reply never makes it back, the way a
    /// real device drops the link mid-acknowledge
    pub reboot_reply_lost: bool,
    pub transport_down: bool,
    pub reconnect_ok: bool,
    pub commits: u32,
    pub reboots: u32,
    pub log: Vec<String>,
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self {
            settings: HashMap::new(),
            unsupported: HashSet::new(),
            console_rejects: HashSet::new(),
            reboot_reply_lost: false,
            transport_down: false,
            reconnect_ok: true,
            commits: 0,
            reboots: 0,
            log: Vec::new(),
        }
    }
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device whose structured path lacks the given fields.
    pub fn without_structured(fields: &[&str]) -> Self {
        Self {
            unsupported: fields.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl DeviceChannel for FakeDevice {
    async fn send_structured(
        &mut self,
        req: &StructuredRequest,
    ) -> Result<StructuredReply, ChannelError> {
        if self.transport_down {
            return Err(ChannelError::Transport("link down".into()));
        }
        match req {
            StructuredRequest::Set { name, value } => {
                self.log.push(format!("msp set {}", name));
                if self.unsupported.contains(name.as_str()) {
                    return Ok(StructuredReply::Unsupported);
                }
                self.settings.insert(name.clone(), value.to_string());
                Ok(StructuredReply::Applied)
            }
            StructuredRequest::Commit => {
                self.log.push("msp commit".into());
                self.commits += 1;
                Ok(StructuredReply::Applied)
            }
            StructuredRequest::Reboot => {
                self.log.push("msp reboot".into());
                self.reboots += 1;
                if self.reboot_reply_lost {
                    return Err(ChannelError::Transport("connection reset".into()));
                }
                Ok(StructuredReply::Applied)
            }
        }
    }

    async fn send_text_line(&mut self, line: &str) -> Result<(), ChannelError> {
        if self.transport_down {
            return Err(ChannelError::Transport("link down".into()));
        }
        self.log.push(format!("cli {}", line));
        if line == "save" {
            self.commits += 1;
            return Ok(());
        }
        if line == "reboot" {
            self.reboots += 1;
            return Ok(());
        }
        if let Some(rest) = line.strip_prefix("set ") {
            let (name, value) = rest
                .split_once('=')
                .map(|(n, v)| (n.trim(), v.trim()))
                .unwrap_or((rest.trim(), ""));
            if self.console_rejects.contains(name) {
                return Err(ChannelError::Rejected(format!("unknown setting: {}", name)));
            }
            self.settings.insert(name.to_string(), value.to_string());
            return Ok(());
        }
        Err(ChannelError::Rejected(format!("unknown command: {}", line)))
    }

    async fn disconnect(&mut self) {
        self.log.push("disconnect".into());
    }

    async fn reconnect(&mut self, target: &str) -> bool {
        self.log.push(format!("reconnect {}", target));
        self.reconnect_ok
    }
}

/// Records pause/resume calls with their order.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    pub pauses: u32,
    pub resumes: u32,
    pub events: Vec<&'static str>,
}

impl TelemetryControl for RecordingTelemetry {
    fn pause(&mut self) {
        self.pauses += 1;
        self.events.push("pause");
    }

    fn resume(&mut self) {
        self.resumes += 1;
        self.events.push("resume");
    }
}
