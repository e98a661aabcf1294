mod completed;
mod state;

pub use completed::CompletedState;
pub use state::StateType;
