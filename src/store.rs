//! Durable local state.
//!
//! The client keeps four small files under the configured storage
//! directory, one per durable key:
//!
//! | Key | Contents |
//! |-----|----------|
//! | `token` | opaque bearer token |
//! | `user.json` | serialized [`crate::models::User`] |
//! | `qa_history.json` | serialized Q&A transcript |
//! | `recent_searches.json` | up to 5 recent query strings |
//!
//! All reads and writes are synchronous; the only writer is the command
//! currently running, so there is no locking.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user.json";
pub const QA_HISTORY_KEY: &str = "qa_history.json";
pub const RECENT_SEARCHES_KEY: &str = "recent_searches.json";

/// Handle to the local state directory. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StateDir {
    dir: PathBuf,
}

impl StateDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read a key's raw contents. A missing or unreadable file reads as absent.
    pub fn read(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    pub fn write(&self, key: &str, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create state dir: {}", self.dir.display()))?;
        let path = self.path(key);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Remove a key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    /// Read and parse a JSON key. Missing or corrupt contents read as absent.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string_pretty(value)?;
        self.write(key, &raw)
    }
}

impl AsRef<Path> for StateDir {
    fn as_ref(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key_is_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = StateDir::new(tmp.path());
        assert!(state.read(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_write_read_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = StateDir::new(tmp.path().join("nested/state"));
        state.write(TOKEN_KEY, "abc123").unwrap();
        assert_eq!(state.read(TOKEN_KEY).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = StateDir::new(tmp.path());
        state.write(TOKEN_KEY, "abc").unwrap();
        state.remove(TOKEN_KEY).unwrap();
        state.remove(TOKEN_KEY).unwrap();
        assert!(state.read(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_load_json_corrupt_is_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = StateDir::new(tmp.path());
        state.write(RECENT_SEARCHES_KEY, "{not json").unwrap();
        let recent: Option<Vec<String>> = state.load_json(RECENT_SEARCHES_KEY);
        assert!(recent.is_none());
    }
}
