//! Unified path management for crest configuration files.
//!
//! All crest configuration and cached state live under the platform config
//! directory (e.g. `~/.config/crest/` on Linux).
//!
//! ```text
//! ~/.config/crest/
//! ├── config.toml        # backend URL and related settings
//! └── user_cache.json    # last-known user identity (UI bootstrap cache)
//! ```

use std::path::PathBuf;

use crest_core::{CrestError, Result};

/// Unified path management for crest.
pub struct CrestPaths;

impl CrestPaths {
    /// Returns the crest configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the config directory (e.g. `~/.config/crest/`)
    /// - `Err(CrestError::Config)`: Could not determine the home directory
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("crest"))
            .ok_or_else(|| CrestError::config("cannot find home directory"))
    }

    /// Returns the path to the main configuration file (config.toml).
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the cached-user file (user_cache.json).
    pub fn user_cache_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("user_cache.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_is_under_config_dir() {
        let config_dir = CrestPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("crest"));

        let config_file = CrestPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_user_cache_file_is_under_config_dir() {
        let cache_file = CrestPaths::user_cache_file().unwrap();
        assert!(cache_file.ends_with("user_cache.json"));
        assert!(cache_file.starts_with(CrestPaths::config_dir().unwrap()));
    }
}
