//! Observable controller state.

use crate::conversation::{Conversation, Message};
use crate::knowledge::KnowledgeItem;
use crate::user::User;

/// The state a view renders from.
///
/// Consumers read this between actions; they never mutate it directly.
/// `sending` is an advisory flag for gating a send control, not a lock.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    /// The authenticated user, established by bootstrap or login.
    pub user: Option<User>,
    /// All known conversations, in backend order.
    pub conversations: Vec<Conversation>,
    /// The currently selected conversation. At most one is active.
    pub active: Option<Conversation>,
    /// Messages of the active conversation. Append-only within a session;
    /// replaced wholesale only on conversation switch.
    pub messages: Vec<Message>,
    /// Related-knowledge snippets from the last search.
    pub related: Vec<KnowledgeItem>,
    /// True while a send is in flight.
    pub sending: bool,
    /// The last action's user-visible error, if any.
    pub error: Option<String>,
}

impl ChatState {
    /// True when a user identity has been established this session.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The id of the active conversation, if one is selected.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|c| c.id.as_str())
    }
}
