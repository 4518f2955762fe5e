//! The conversation session controller.

use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::{ChatBackend, UserCache};
use crate::canonical;
use crate::conversation::Conversation;
use crate::session::state::ChatState;

/// Title used when a send auto-provisions a conversation.
const DEFAULT_CONVERSATION_TITLE: &str = "New chat";

/// Orchestrates authentication, conversation selection, and messaging over
/// an abstract [`ChatBackend`].
///
/// Every action catches backend errors at its own boundary and surfaces a
/// user-visible message in [`ChatState::error`] instead of propagating —
/// no error is fatal; everything is recoverable by user retry. The one
/// exception is the knowledge search, whose failures are swallowed
/// entirely because it is an auxiliary affordance.
///
/// Actions take `&mut self`, so two actions on one controller cannot
/// interleave.
pub struct ChatController<B, C> {
    backend: Arc<B>,
    user_cache: Arc<C>,
    state: ChatState,
}

impl<B, C> ChatController<B, C>
where
    B: ChatBackend,
    C: UserCache,
{
    pub fn new(backend: Arc<B>, user_cache: Arc<C>) -> Self {
        Self {
            backend,
            user_cache,
            state: ChatState::default(),
        }
    }

    /// The current observable state.
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// The backend this controller drives.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// The cached user from durable storage, for painting a shell before
    /// [`bootstrap`](Self::bootstrap) settles. Advisory only.
    pub fn cached_user(&self) -> Option<crate::user::User> {
        self.user_cache.load()
    }

    /// Establishes the session at process start.
    ///
    /// An optional token (e.g. from the environment) is set as the
    /// credential first; the profile fetch then decides whether the session
    /// is authenticated — the locally cached user is deliberately ignored
    /// for that decision. On success the cache is overwritten with the
    /// fresh user and the conversation list is loaded; on any failure the
    /// cache is cleared and the session stays unauthenticated.
    pub async fn bootstrap(&mut self, token: Option<String>) {
        if token.is_some() {
            self.backend.set_credential(token).await;
        }
        match self.backend.profile().await {
            Ok(user) => {
                info!(user = %user.label(), "session bootstrapped");
                self.user_cache.store(Some(&user));
                self.state.user = Some(user);
                self.load_conversations().await;
            }
            Err(err) => {
                debug!(error = %err, "profile fetch failed during bootstrap");
                self.user_cache.store(None);
                self.state.user = None;
            }
        }
    }

    /// Reloads the conversation list and auto-selects the first entry, if
    /// any exist.
    pub async fn load_conversations(&mut self) {
        if let Err(err) = self.refresh_conversations().await {
            self.state.error = Some(err);
            return;
        }
        match self.state.conversations.first().cloned() {
            Some(first) => self.select_conversation(first).await,
            None => {
                self.state.active = None;
                self.state.messages.clear();
            }
        }
    }

    async fn refresh_conversations(&mut self) -> Result<(), String> {
        match self.backend.list_conversations().await {
            Ok(list) => {
                self.state.conversations = list;
                Ok(())
            }
            Err(err) => Err(err.to_string()),
        }
    }

    /// Makes `conversation` active and loads its full message history.
    ///
    /// The selection itself is optimistic: `active` is set before the fetch.
    /// On success the message list is replaced wholesale and `related` is
    /// cleared; on failure the selection stays, the previous messages are
    /// kept untouched, and the error is surfaced.
    pub async fn select_conversation(&mut self, conversation: Conversation) {
        let id = conversation.id.clone();
        self.state.active = Some(conversation);
        match self.backend.get_conversation(&id).await {
            Ok(full) => {
                self.state.messages = full.messages;
                self.state.related.clear();
            }
            Err(err) => {
                self.state.error = Some(err.to_string());
            }
        }
    }

    /// Creates a conversation and selects it.
    ///
    /// The list is reloaded from the backend rather than spliced locally.
    /// The new conversation is resolved by the identifier from the create
    /// response when present, otherwise by exact title match against the
    /// freshly reloaded list.
    pub async fn create_conversation(&mut self, title: &str) {
        let created = match self.backend.create_conversation(title).await {
            Ok(created) => created,
            Err(err) => {
                self.state.error = Some(err.to_string());
                return;
            }
        };
        if let Err(err) = self.refresh_conversations().await {
            self.state.error = Some(err);
            return;
        }
        let resolved = created.or_else(|| {
            self.state
                .conversations
                .iter()
                .find(|c| c.title == title)
                .cloned()
        });
        match resolved {
            Some(conversation) => self.select_conversation(conversation).await,
            None => debug!(title, "created conversation could not be resolved"),
        }
    }

    /// Sends a user message to the active conversation.
    ///
    /// When no conversation is active, one titled "New chat" is provisioned
    /// first — a message is never sent without a target. The user's text is
    /// appended immediately as an optimistic echo with a temporary id;
    /// `sending` is true for the duration of the call. On success exactly
    /// one assistant message is appended. On failure the echo is kept (not
    /// rolled back) and the error is surfaced: not losing the user's input
    /// wins over strict consistency with server state.
    pub async fn send_message(&mut self, text: &str) {
        if self.state.active.is_none() {
            self.create_conversation(DEFAULT_CONVERSATION_TITLE).await;
        }
        let Some(conversation_id) = self.state.active_id().map(str::to_string) else {
            // Auto-provisioning failed; its error is already surfaced.
            return;
        };

        self.state.messages.push(canonical::user_echo(text));
        self.state.sending = true;
        self.state.error = None;

        match self.backend.send_message(&conversation_id, text).await {
            Ok(Some(reply)) => self.state.messages.push(reply),
            Ok(None) => debug!(%conversation_id, "send returned no assistant reply"),
            Err(err) => {
                self.state.error = Some(err.to_string());
            }
        }
        self.state.sending = false;
    }

    /// Replaces `related` with knowledge snippets for `text`.
    ///
    /// Blank input is a no-op. Failures are swallowed without touching the
    /// error state; the search is non-blocking and non-critical.
    pub async fn search_related(&mut self, text: &str) {
        let query = text.trim();
        if query.is_empty() {
            return;
        }
        match self.backend.search_knowledge(query).await {
            Ok(items) => self.state.related = items,
            Err(err) => debug!(error = %err, "knowledge search failed"),
        }
    }

    /// Tears down the local session: credential, cached user, conversation
    /// list, active conversation, and messages are all cleared. No
    /// server-side revocation call is made.
    pub async fn logout(&mut self) {
        info!("logging out");
        self.backend.set_credential(None).await;
        self.user_cache.store(None);
        self.state.user = None;
        self.state.conversations.clear();
        self.state.active = None;
        self.state.messages.clear();
    }
}
