//! Related-knowledge search results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loosely structured knowledge snippet surfaced next to a conversation.
///
/// Items are references, not owned by any conversation. Backends return them
/// in assorted shapes; `label` is the canonical display string (preferring
/// `title`, then `text`, then `snippet`), and `raw` keeps the original record
/// for consumers that want more than the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub label: String,
    pub raw: Value,
}
