//! Validated error and completion-state types shared by RPA automations.
//!
//! - [`RpaError`] carries a non-empty message tagged as a base, business or
//!   process failure.
//! - [`CompletedState`] records the terminal outcome of a run.
//!
//! Every constructor validates its input and returns [`ValidationError`] on
//! rejection; no partially valid value is ever produced.

pub mod error;
pub mod process_states;
pub mod validation;

pub use error::{ErrorKind, RpaError};
pub use process_states::{CompletedState, StateType};
pub use validation::ValidationError;
