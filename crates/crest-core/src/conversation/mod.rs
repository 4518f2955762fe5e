//! Conversation and message domain models.

mod message;
mod model;

pub use message::{Message, MessageRole};
pub use model::Conversation;
