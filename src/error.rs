//! Error hierarchy reported by automation scripts.
//!
//! [`RpaError`] always carries a non-empty message. Its [`ErrorKind`] tells
//! a business-rule violation apart from a technical failure in the process
//! itself; the root kind covers anything not classified further.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::validation::{ValidationError, message_from_value, python_repr_quote, validate_message};

/// Classifies an [`RpaError`] for differentiated handling upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unclassified failure (`BaseRPAError`).
    #[serde(rename = "BaseRPAError")]
    Base,
    /// A business rule was violated, e.g. invalid input data.
    #[serde(rename = "BusinessError")]
    Business,
    /// The automation failed technically, e.g. a dependency was unavailable.
    #[serde(rename = "ProcessError")]
    Process,
}

impl ErrorKind {
    /// Name shown in diagnostic output.
    pub fn type_name(self) -> &'static str {
        match self {
            ErrorKind::Base => "BaseRPAError",
            ErrorKind::Business => "BusinessError",
            ErrorKind::Process => "ProcessError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A reportable failure with a guaranteed non-empty description.
///
/// `Display` yields the message alone. `Debug` yields the kind and the quoted
/// message, e.g. `BusinessError(message='x')`.
#[derive(Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("{message}")]
#[serde(try_from = "RawRpaError")]
pub struct RpaError {
    kind: ErrorKind,
    message: String,
}

impl RpaError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Result<Self, ValidationError> {
        let message = validate_message("message", message)?;
        Ok(Self { kind, message })
    }

    pub fn base(message: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(ErrorKind::Base, message)
    }

    pub fn business(message: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(ErrorKind::Business, message)
    }

    pub fn process(message: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(ErrorKind::Process, message)
    }

    /// Build from an untyped message value; anything but a string is rejected.
    pub fn from_value(kind: ErrorKind, message: &Value) -> Result<Self, ValidationError> {
        let message = message_from_value("message", message)?;
        Ok(Self { kind, message })
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_business(&self) -> bool {
        self.kind == ErrorKind::Business
    }

    pub fn is_process(&self) -> bool {
        self.kind == ErrorKind::Process
    }
}

impl fmt::Debug for RpaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(message={})",
            self.kind.type_name(),
            python_repr_quote(&self.message)
        )
    }
}

#[derive(Deserialize)]
struct RawRpaError {
    kind: ErrorKind,
    // Absent stays `None`; an explicit `null` becomes `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present")]
    message: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawRpaError> for RpaError {
    type Error = ValidationError;

    fn try_from(raw: RawRpaError) -> Result<Self, Self::Error> {
        let message = raw
            .message
            .ok_or(ValidationError::MissingField { field: "message" })?;
        RpaError::from_value(raw.kind, &message)
    }
}
