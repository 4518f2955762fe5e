pub mod auth;
pub mod chat;
pub mod knowledge;

use std::env;
use std::sync::Arc;

use anyhow::Result;

use crest_client::{CrestApi, FileUserCache};
use crest_core::session::ChatController;

/// Controller over the configured backend and the on-disk user cache.
pub(crate) type Controller = ChatController<CrestApi, FileUserCache>;

pub(crate) fn build_controller() -> Result<Controller> {
    let backend = Arc::new(CrestApi::try_from_env()?);
    let cache = Arc::new(FileUserCache::new()?);
    Ok(ChatController::new(backend, cache))
}

/// Optional bootstrap token from the environment. The credential lives only
/// for this process; nothing token-shaped is ever written to disk.
pub(crate) fn env_token() -> Option<String> {
    env::var("CREST_ACCESS_TOKEN")
        .ok()
        .filter(|token| !token.is_empty())
}

pub(crate) fn prompt_password() -> Result<String> {
    let mut editor = rustyline::DefaultEditor::new()?;
    Ok(editor.readline("Password: ")?)
}
