//! In-memory credential store.

use std::sync::Arc;

use tokio::sync::RwLock;

/// Holds the bearer token for the current session, in process memory only.
///
/// The token is never persisted: it is set on successful login, cleared on
/// logout, and gone on process exit. The store is an explicitly injected
/// handle shared by the transport (which reads it on every request) and the
/// resolver (which writes it on login) — there is no module-wide global, so
/// tests cannot leak credentials into each other.
#[derive(Clone, Default)]
pub struct CredentialStore {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the token; `None` clears it.
    pub async fn set(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    /// Returns a clone of the current token, if any.
    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }
}
