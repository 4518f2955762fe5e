//! Backend trait seams.
//!
//! These traits decouple the controller from the concrete HTTP client,
//! allowing mock implementations in tests and alternative transports later.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::{Conversation, Message};
use crate::error::Result;
use crate::knowledge::KnowledgeItem;
use crate::user::User;

/// The normalized result of a login, whichever endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub access_token: String,
    /// The user record, when the backend returned (or a follow-up profile
    /// fetch produced) one.
    #[serde(default)]
    pub user: Option<User>,
}

/// An abstract chat backend.
///
/// Implementations own endpoint selection and payload normalization: every
/// method returns canonical shapes regardless of which backend variant
/// answered. The credential accessors expose the in-memory session token so
/// consumers never reach around the backend to manage auth state.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Authenticates and stores the access token in the session.
    ///
    /// On success the credential is already set when this returns; callers
    /// do not need to call [`set_credential`](Self::set_credential).
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome>;

    /// Creates an account. Does not set the credential or the user; callers
    /// log in separately.
    async fn register(&self, email: &str, password: &str) -> Result<()>;

    /// Fetches the current user's profile. Fails when unauthenticated.
    async fn profile(&self) -> Result<User>;

    /// Lists the current user's conversations.
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Creates a conversation. Returns `None` when the backend's response
    /// carried no usable identifier (the caller resolves it by title from a
    /// reloaded list).
    async fn create_conversation(&self, title: &str) -> Result<Option<Conversation>>;

    /// Fetches one conversation with its full message history.
    async fn get_conversation(&self, id: &str) -> Result<Conversation>;

    /// Sends a user message and returns the single assistant reply, if the
    /// response contained one.
    async fn send_message(&self, conversation_id: &str, content: &str)
        -> Result<Option<Message>>;

    /// Searches the knowledge base for snippets related to `query`.
    async fn search_knowledge(&self, query: &str) -> Result<Vec<KnowledgeItem>>;

    /// Replaces the in-memory credential. `None` clears it.
    async fn set_credential(&self, token: Option<String>);

    /// Returns the current in-memory credential, if any.
    async fn credential(&self) -> Option<String>;
}

/// Durable cache for the last-known user identity.
///
/// The cache is advisory: it exists so a consumer can paint a signed-in
/// shell before the profile fetch settles, never to decide whether the
/// session is authenticated. Implementations fail soft — corrupt or
/// unreadable storage reads as "no user" and write failures are swallowed.
pub trait UserCache: Send + Sync {
    /// Returns the cached user, or `None` when absent or unreadable.
    fn load(&self) -> Option<User>;

    /// Overwrites the cached user; `None` removes the cache entry.
    fn store(&self, user: Option<&User>);
}
