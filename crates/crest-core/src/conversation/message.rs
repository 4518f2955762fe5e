//! Message types.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the backend assistant.
    Assistant,
}

/// A single message in a conversation.
///
/// Messages within a conversation are an ordered, append-only sequence from
/// the client's perspective; the server is authoritative for persistence.
/// Optimistic echoes carry a temporary `tmp-` prefixed id until (and unless)
/// the server supplies a real one on a later full fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Returns true for messages authored by the user.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
