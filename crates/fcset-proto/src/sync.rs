use std::fmt;

use serde::{Deserialize, Serialize};

/// Save domains in their fixed save order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigDomain {
    Tuning,
    Modes,
    Safety,
}

impl ConfigDomain {
    pub const ALL: [ConfigDomain; 3] =
        [ConfigDomain::Tuning, ConfigDomain::Modes, ConfigDomain::Safety];

    pub fn index(self) -> usize {
        match self {
            ConfigDomain::Tuning => 0,
            ConfigDomain::Modes => 1,
            ConfigDomain::Safety => 2,
        }
    }
}

/// Result of a coalesced save. A failed domain is always named so the UI
/// can retry exactly that domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Success,
    PartialFailure(ConfigDomain),
    TransportError(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Float(v) => write!(f, "{}", v),
            SettingValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// One named firmware setting write, accepted by both backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWrite {
    pub name: String,
    pub value: SettingValue,
}

impl FieldWrite {
    pub fn int(name: &str, value: i64) -> Self {
        Self { name: name.into(), value: SettingValue::Int(value) }
    }

    pub fn text(name: &str, value: &str) -> Self {
        Self { name: name.into(), value: SettingValue::Text(value.into()) }
    }
}
