//! Construction-time validation shared by the error and completion-state types.
//!
//! A message is valid when it is a string and it is non-empty after trimming
//! leading and trailing whitespace. The untrimmed value is what gets stored.
//! Whitespace is Unicode `White_Space` plus the information separators
//! U+001C..=U+001F, the same set Python's `str.isspace` uses.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Rejected constructor input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value for `field` was not a string.
    #[error("{field}: expected a string, found {found}")]
    NotAString { field: &'static str, found: &'static str },

    /// The value for `field` was empty or whitespace-only.
    #[error("{field}: must not be empty or whitespace-only")]
    EmptyMessage { field: &'static str },

    /// The state tag was not one of the recognized values.
    #[error("state: unknown value {value}")]
    UnknownState { value: String },

    /// A required field was absent.
    #[error("{field}: field required")]
    MissingField { field: &'static str },
}

/// Validate a message and hand back the original, untrimmed string.
pub fn validate_message(
    field: &'static str,
    message: impl Into<String>,
) -> Result<String, ValidationError> {
    let message = message.into();
    if message.trim_matches(is_message_whitespace).is_empty() {
        debug!(field, reason = "empty", "rejected message");
        return Err(ValidationError::EmptyMessage { field });
    }
    Ok(message)
}

/// Characters trimmed before the emptiness check.
pub fn is_message_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Validate an untyped message value, as found in deserialized data.
pub fn message_from_value(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => validate_message(field, s.as_str()),
        other => {
            let found = json_type_name(other);
            debug!(field, found, reason = "not a string", "rejected message");
            Err(ValidationError::NotAString { field, found })
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Quote a string for diagnostic output, Python `repr` style.
///
/// Single quotes are used unless the string contains a single quote and no
/// double quote, in which case double quotes wrap it. Backslashes and the
/// active quote character are escaped; control characters use
/// [`char::escape_debug`] sequences (`\n`, `\0`, `\u{1b}`).
///
/// Only Unicode `Cc` characters are escaped. Other non-printable characters,
/// such as U+00A0 or U+2028, pass through unchanged, unlike Python's `repr`
/// which would write them as `\xa0` or `\u2028`.
pub fn python_repr_quote(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.extend(c.escape_debug()),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
