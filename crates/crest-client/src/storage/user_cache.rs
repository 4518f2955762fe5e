//! Cached-user file storage.
//!
//! Persists the last-known user identity as a single JSON file so a UI can
//! paint a signed-in shell before the profile fetch settles on the next
//! start. The cache is advisory only and must never gate authenticated
//! actions.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crest_core::backend::UserCache;
use crest_core::user::User;
use crest_core::Result;

use crate::paths::CrestPaths;

/// File-backed [`UserCache`].
///
/// Every operation fails soft: a missing, unreadable, or corrupt file reads
/// as "no user", and write failures are logged and swallowed. Losing this
/// cache costs one avoidable loading flash, never correctness.
pub struct FileUserCache {
    path: PathBuf,
}

impl FileUserCache {
    /// Creates a cache at the default location
    /// (`~/.config/crest/user_cache.json`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: CrestPaths::user_cache_file()?,
        })
    }

    /// Creates a cache at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path of the cache file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl UserCache for FileUserCache {
    fn load(&self) -> Option<User> {
        let content = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn store(&self, user: Option<&User>) {
        match user {
            Some(user) => {
                if let Some(parent) = self.path.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                match serde_json::to_string_pretty(user) {
                    Ok(json) => {
                        if let Err(err) = fs::write(&self.path, json) {
                            warn!(path = %self.path.display(), error = %err, "failed to write user cache");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to serialize user for cache");
                    }
                }
            }
            None => {
                // Removing an already-absent file is fine.
                let _ = fs::remove_file(&self.path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_user() -> User {
        User {
            id: "u-1".to_string(),
            email: Some("a@b.com".to_string()),
            display_name: Some("Ada".to_string()),
        }
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileUserCache::with_path(temp_dir.path().join("user_cache.json"));
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_store_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileUserCache::with_path(temp_dir.path().join("user_cache.json"));

        cache.store(Some(&sample_user()));
        assert_eq!(cache.load(), Some(sample_user()));
    }

    #[test]
    fn test_corrupt_file_reads_as_no_user() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("user_cache.json");
        fs::write(&path, "{ not json").unwrap();

        let cache = FileUserCache::with_path(path);
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_store_none_removes_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("user_cache.json");
        let cache = FileUserCache::with_path(path.clone());

        cache.store(Some(&sample_user()));
        assert!(path.exists());

        cache.store(None);
        assert!(!path.exists());
        assert!(cache.load().is_none());

        // Clearing twice is harmless.
        cache.store(None);
    }

    #[test]
    fn test_store_overwrites_previous_user() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileUserCache::with_path(temp_dir.path().join("user_cache.json"));

        cache.store(Some(&sample_user()));
        let replacement = User {
            id: "u-2".to_string(),
            email: Some("new@b.com".to_string()),
            display_name: None,
        };
        cache.store(Some(&replacement));
        assert_eq!(cache.load(), Some(replacement));
    }
}
