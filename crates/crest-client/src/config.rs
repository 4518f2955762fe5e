//! Client configuration.
//!
//! Configuration priority: ~/.config/crest/config.toml > environment
//! variables (CREST_BACKEND_URL, CREST_SITE_URL).

use std::env;
use std::fs;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::paths::CrestPaths;

/// Settings for talking to a crest backend deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash.
    #[serde(default)]
    pub backend_url: String,
    /// Public site URL, sent as the email-redirect target on registration.
    #[serde(default)]
    pub site_url: Option<String>,
}

impl ClientConfig {
    /// Loads configuration from config.toml, filling missing values from
    /// the environment.
    ///
    /// A missing or unparseable config file is not an error — the file is
    /// optional and the environment may carry everything. An empty
    /// `backend_url` is rejected later, at client construction.
    pub fn load() -> Self {
        let mut config = Self::from_config_file().unwrap_or_default();
        if config.backend_url.is_empty()
            && let Ok(url) = env::var("CREST_BACKEND_URL")
        {
            config.backend_url = url;
        }
        if config.site_url.is_none()
            && let Ok(url) = env::var("CREST_SITE_URL")
        {
            config.site_url = Some(url);
        }
        config.backend_url = config.backend_url.trim_end_matches('/').to_string();
        config
    }

    fn from_config_file() -> Option<Self> {
        let path = CrestPaths::config_file().ok()?;
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "ignoring unparseable config file");
                None
            }
        }
    }
}
