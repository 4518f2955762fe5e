//! Conversation session state and orchestration.

mod controller;
#[cfg(test)]
mod controller_test;
mod state;

pub use controller::ChatController;
pub use state::ChatState;
