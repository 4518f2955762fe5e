//! Canonicalization of heterogeneous backend payloads.
//!
//! Backend deployments vary in route naming and in field naming
//! (`id`/`uuid`/`_id`, `role`/`sender`, `content`/`text`). This module is the
//! single boundary where those variants are folded into the canonical domain
//! models; nothing past it branches on field names again.

use serde_json::Value;
use uuid::Uuid;

use crate::conversation::{Conversation, Message, MessageRole};
use crate::knowledge::KnowledgeItem;

/// Identifier fields accepted for conversations, in preference order.
const CONVERSATION_ID_KEYS: [&str; 3] = ["id", "uuid", "_id"];

/// Identifier fields accepted for messages.
const MESSAGE_ID_KEYS: [&str; 2] = ["id", "_id"];

/// Display-label fields accepted for knowledge items, in preference order.
const KNOWLEDGE_LABEL_KEYS: [&str; 3] = ["title", "text", "snippet"];

/// Extracts a conversation identifier from a payload, whatever the backend
/// called it. String and integer ids are both accepted; integers are
/// rendered as their decimal string.
pub fn extract_id(value: &Value) -> Option<String> {
    id_from_keys(value, &CONVERSATION_ID_KEYS)
}

fn id_from_keys(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| id_string(value.get(*key)?))
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn temp_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Builds the optimistic local echo for a user message, with a temporary id.
pub fn user_echo(content: &str) -> Message {
    Message {
        id: temp_id("tmp-u"),
        role: MessageRole::User,
        content: content.to_string(),
    }
}

/// Normalizes one message record.
///
/// Role falls back from an explicit `role` field to a `sender` field
/// (`"user"` or anything else), defaulting to assistant. Content prefers
/// `content`, then `text`. A bare string payload is taken as the content
/// itself. Records without an id get a temporary one.
pub fn message_from_value(value: &Value) -> Message {
    if let Value::String(text) = value {
        return Message {
            id: temp_id("tmp-a"),
            role: MessageRole::Assistant,
            content: text.clone(),
        };
    }

    let id = id_from_keys(value, &MESSAGE_ID_KEYS).unwrap_or_else(|| temp_id("tmp-a"));

    let role = match value.get("role").and_then(Value::as_str) {
        Some("user") => MessageRole::User,
        Some(_) => MessageRole::Assistant,
        None => match value.get("sender").and_then(Value::as_str) {
            Some("user") => MessageRole::User,
            _ => MessageRole::Assistant,
        },
    };

    let content = value
        .get("content")
        .and_then(Value::as_str)
        .or_else(|| value.get("text").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    Message { id, role, content }
}

/// Normalizes a payload expected to be an array of messages. Anything that
/// is not an array yields an empty list.
pub fn message_list(value: &Value) -> Vec<Message> {
    value
        .as_array()
        .map(|items| items.iter().map(message_from_value).collect())
        .unwrap_or_default()
}

/// Extracts the single assistant reply from a send-message response.
///
/// Accepts, in order: a `messages` array (last element), an `assistant`
/// field, or the whole payload treated as the message. Returns `None` when
/// there is nothing to extract (null payload, empty `messages` array) —
/// multi-turn replies beyond one assistant message per call are not modeled.
pub fn assistant_reply(value: &Value) -> Option<Message> {
    if let Some(messages) = value.get("messages").and_then(Value::as_array) {
        return messages.last().map(message_from_value);
    }
    if let Some(assistant) = value.get("assistant") {
        return Some(message_from_value(assistant));
    }
    if value.is_null() {
        return None;
    }
    Some(message_from_value(value))
}

/// Normalizes a conversation record from a list or create response.
/// Returns `None` when the record carries no usable identifier.
pub fn conversation_from_value(value: &Value) -> Option<Conversation> {
    let id = extract_id(value)?;
    let title = value
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let messages = value
        .get("messages")
        .map(message_list)
        .unwrap_or_default();
    Some(Conversation {
        id,
        title,
        messages,
    })
}

/// Normalizes a full conversation-detail response, falling back to the
/// requested id when the payload omits one.
pub fn conversation_detail(requested_id: &str, value: &Value) -> Conversation {
    Conversation {
        id: extract_id(value).unwrap_or_else(|| requested_id.to_string()),
        title: value
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        messages: value
            .get("messages")
            .map(message_list)
            .unwrap_or_default(),
    }
}

/// Normalizes one knowledge record; the label prefers `title`, then `text`,
/// then `snippet`.
pub fn knowledge_item(value: &Value) -> KnowledgeItem {
    let label = KNOWLEDGE_LABEL_KEYS
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();
    KnowledgeItem {
        label,
        raw: value.clone(),
    }
}

/// Normalizes a search response: a bare array and an object with a
/// `results` array are treated as equivalent; anything else is empty.
pub fn knowledge_list(value: &Value) -> Vec<KnowledgeItem> {
    value
        .as_array()
        .or_else(|| value.get("results").and_then(Value::as_array))
        .map(|items| items.iter().map(knowledge_item).collect())
        .unwrap_or_default()
}
