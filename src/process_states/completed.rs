use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use super::state::StateType;
use crate::error::RpaError;
use crate::validation::{ValidationError, message_from_value, validate_message};

/// The final, immutable outcome record of one automation run.
///
/// Two states are equal when both the state tag and the message match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CompletedState {
    state: StateType,
    message: String,
}

impl CompletedState {
    pub fn new(state: StateType, message: impl Into<String>) -> Result<Self, ValidationError> {
        let message = validate_message("message", message)?;
        Ok(Self { state, message })
    }

    /// The run finished without exceptions.
    pub fn completed(message: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(StateType::Completed, message)
    }

    /// The run finished, but exceptions were raised and handled along the way.
    pub fn completed_with_exception(message: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(StateType::CompletedWithException, message)
    }

    /// Report a recovered error as a completion with exception.
    pub fn from_error(error: &RpaError) -> Self {
        Self {
            state: StateType::CompletedWithException,
            message: error.message().to_owned(),
        }
    }

    /// Rebuild from untyped data holding `state` and `message` keys.
    ///
    /// `state` may be the canonical name or the ordinal.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let state = value
            .get("state")
            .ok_or(ValidationError::MissingField { field: "state" })?;
        let state = StateType::from_value(state).inspect_err(|err| {
            debug!(field = "state", reason = %err, "rejected completion state");
        })?;

        let message = value
            .get("message")
            .ok_or(ValidationError::MissingField { field: "message" })?;
        let message = message_from_value("message", message)?;

        Ok(Self { state, message })
    }

    pub fn state(&self) -> StateType {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_success(&self) -> bool {
        self.state == StateType::Completed
    }
}

impl fmt::Display for CompletedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            StateType::Completed => write!(f, "Completed: {}", self.message),
            StateType::CompletedWithException => {
                write!(f, "Completed with exceptions: {}", self.message)
            }
        }
    }
}

impl From<&RpaError> for CompletedState {
    fn from(error: &RpaError) -> Self {
        Self::from_error(error)
    }
}

// Goes through `serde_json::Value`, so this needs a self-describing format.
impl<'de> Deserialize<'de> for CompletedState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completed_factory() {
        let message = "Process completed successfully";
        let state = CompletedState::completed(message).unwrap();

        assert_eq!(state.state(), StateType::Completed);
        assert_eq!(state.message(), message);
        assert_eq!(state.to_string(), "Completed: Process completed successfully");
        assert!(state.is_success());

        let direct = CompletedState::new(StateType::Completed, message).unwrap();
        assert_eq!(direct, state);
    }

    #[test]
    fn completed_with_exception_factory() {
        let message = "Process completed with an exception";
        let state = CompletedState::completed_with_exception(message).unwrap();

        assert_eq!(state.state(), StateType::CompletedWithException);
        assert_eq!(state.message(), message);
        assert_eq!(
            state.to_string(),
            "Completed with exceptions: Process completed with an exception"
        );
        assert!(!state.is_success());

        let direct = CompletedState::new(StateType::CompletedWithException, message).unwrap();
        assert_eq!(direct, state);
    }

    #[test]
    fn equality_needs_both_fields() {
        let a = CompletedState::completed("done").unwrap();
        assert_ne!(a, CompletedState::completed("done!").unwrap());
        assert_ne!(a, CompletedState::completed_with_exception("done").unwrap());
    }

    #[test]
    fn empty_message_is_rejected() {
        assert_eq!(
            CompletedState::completed(""),
            Err(ValidationError::EmptyMessage { field: "message" })
        );
        assert!(CompletedState::completed_with_exception("   ").is_err());
        assert!(CompletedState::new(StateType::Completed, "\n").is_err());
    }

    #[test]
    fn from_value_validation() {
        let ok = CompletedState::from_value(&json!({"state": "COMPLETED", "message": "fine"})).unwrap();
        assert_eq!(ok, CompletedState::completed("fine").unwrap());

        let by_ordinal = CompletedState::from_value(&json!({"state": 2, "message": "boom"})).unwrap();
        assert_eq!(by_ordinal.state(), StateType::CompletedWithException);

        assert!(matches!(
            CompletedState::from_value(&json!({"state": "COMPLETED", "message": 123})),
            Err(ValidationError::NotAString { field: "message", found: "number" })
        ));
        assert!(matches!(
            CompletedState::from_value(&json!({"state": "COMPLETED", "message": ""})),
            Err(ValidationError::EmptyMessage { .. })
        ));
        assert!(matches!(
            CompletedState::from_value(&json!({"state": "DONE", "message": "x"})),
            Err(ValidationError::UnknownState { .. })
        ));
        assert_eq!(
            CompletedState::from_value(&json!({"message": "x"})),
            Err(ValidationError::MissingField { field: "state" })
        );
        assert_eq!(
            CompletedState::from_value(&json!({"state": 1})),
            Err(ValidationError::MissingField { field: "message" })
        );
        assert_eq!(
            CompletedState::from_value(&json!({"state": 1, "message": null})),
            Err(ValidationError::NotAString { field: "message", found: "null" })
        );
    }

    #[test]
    fn information_separators_are_rejected() {
        assert!(CompletedState::completed("\u{1f}").is_err());
        assert!(CompletedState::completed_with_exception("\u{1c}\u{1d}\u{1e}").is_err());
    }

    #[test]
    fn from_error_reports_exception() {
        let err = RpaError::business("Invalid CPR number").unwrap();
        let state = CompletedState::from(&err);
        assert_eq!(state.state(), StateType::CompletedWithException);
        assert_eq!(state.to_string(), "Completed with exceptions: Invalid CPR number");
    }

    #[test]
    fn serde_roundtrip_through_json() {
        let state = CompletedState::completed_with_exception("boom").unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, json!({"state": "COMPLETED_WITH_EXCEPTION", "message": "boom"}));

        let parsed: CompletedState = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn deserialize_from_toml() {
        let toml_str = r#"
            state = "COMPLETED"
            message = "Run finished"
        "#;
        let state: CompletedState = toml::from_str(toml_str).unwrap();
        assert_eq!(state.to_string(), "Completed: Run finished");

        assert!(toml::from_str::<CompletedState>("state = \"COMPLETED\"\nmessage = \"\"").is_err());
    }
}
