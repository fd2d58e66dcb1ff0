//! Durable session storage
//!
//! The whole session (access token, refresh token and cached profile) is kept
//! as one record so it can never be half-written.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::session::UserProfile;

/// Persisted session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub current_user: UserProfile,
}

/// Backend that keeps a [`StoredSession`] across runs
pub trait SessionStorage: Send + std::fmt::Debug {
    /// `Ok(None)` when nothing is stored or the stored record is unreadable
    fn load(&self) -> Result<Option<StoredSession>>;

    fn save(&mut self, session: &StoredSession) -> Result<()>;

    fn clear(&mut self) -> Result<()>;
}

/// Session record kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ClientError::io_from_error("Failed to read session file", e))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<StoredSession>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    fn save(&mut self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ClientError::io_from_error("Failed to create session directory", e))?;
        }

        let content = serde_json::to_string_pretty(session)?;
        let temp = self.temp_path();
        fs::write(&temp, content)
            .map_err(|e| ClientError::io_from_error("Failed to write session file", e))?;
        fs::rename(&temp, &self.path)
            .map_err(|e| ClientError::io_from_error("Failed to replace session file", e))?;

        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::io_from_error("Failed to remove session file", e)),
        }
    }
}

/// In-process storage; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    session: Option<StoredSession>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session: Some(session),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.session.clone())
    }

    fn save(&mut self, session: &StoredSession) -> Result<()> {
        self.session = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.session = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::{create_temp_dir, sample_profile};

    fn sample_session() -> StoredSession {
        StoredSession {
            access_token: "a.b.c".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            current_user: sample_profile("ORGANIZADOR"),
        }
    }

    #[test]
    fn test_file_storage_save_and_load() {
        let dir = create_temp_dir();
        let mut storage = FileSessionStorage::new(dir.path().join("nested/session.json"));

        assert!(storage.load().unwrap().is_none());

        storage.save(&sample_session()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(sample_session()));
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_file_storage_clear_is_idempotent() {
        let dir = create_temp_dir();
        let mut storage = FileSessionStorage::new(dir.path().join("session.json"));

        storage.save(&sample_session()).unwrap();
        storage.clear().unwrap();
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_file_storage_corrupt_file_loads_as_empty() {
        let dir = create_temp_dir();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = FileSessionStorage::new(&path);
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_missing_refresh_token_defaults_to_none() {
        let dir = create_temp_dir();
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"access_token":"a.b.c","current_user":{"id":1,"name":"Ana","email":"ana@x.com","role":"ATLETA"}}"#,
        )
        .unwrap();

        let loaded = FileSessionStorage::new(&path).load().unwrap().unwrap();
        assert_eq!(loaded.refresh_token, None);
        assert_eq!(loaded.current_user.email, "ana@x.com");
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemorySessionStorage::new();
        assert!(storage.load().unwrap().is_none());
        storage.save(&sample_session()).unwrap();
        assert!(storage.load().unwrap().is_some());
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }
}
