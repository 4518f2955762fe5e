//! Conversation domain model.

use serde::{Deserialize, Serialize};

use super::message::Message;

/// A conversation with the backend assistant.
///
/// The `id` is canonical: whatever identifier field the backend used
/// (`id`, `uuid`, `_id`) has already been folded into this one by the
/// canonicalization boundary. `messages` may be empty until the
/// conversation is fetched individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Creates a conversation shell with no messages.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
        }
    }
}
