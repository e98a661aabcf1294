use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::validation::ValidationError;

/// The two terminal outcomes of an automation run.
///
/// Ordinals are pinned so they stay stable when stored or transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateType {
    Completed = 1,
    CompletedWithException = 2,
}

impl StateType {
    pub const ALL: [StateType; 2] = [StateType::Completed, StateType::CompletedWithException];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|s| s.ordinal() == ordinal)
            .ok_or_else(|| ValidationError::UnknownState {
                value: ordinal.to_string(),
            })
    }

    /// Canonical identifier, e.g. `COMPLETED_WITH_EXCEPTION`.
    pub fn as_str(self) -> &'static str {
        match self {
            StateType::Completed => "COMPLETED",
            StateType::CompletedWithException => "COMPLETED_WITH_EXCEPTION",
        }
    }

    /// Accepts either the canonical name or the ordinal.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::String(name) => name.parse(),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .map_or_else(
                    || {
                        Err(ValidationError::UnknownState {
                            value: n.to_string(),
                        })
                    },
                    Self::from_ordinal,
                ),
            other => Err(ValidationError::UnknownState {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownState {
                value: s.to_string(),
            })
    }
}

impl Serialize for StateType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Buffers into a `serde_json::Value` first, so only self-describing formats
// (JSON, TOML, YAML) can deserialize a `StateType`; bincode-style formats cannot.
impl<'de> Deserialize<'de> for StateType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
