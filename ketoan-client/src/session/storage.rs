// ketoan-client/src/session/storage.rs
// Durable session storage - JSON file or in-memory

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared::client::UserProfile;

use crate::error::{ClientError, ClientResult};

/// What survives a restart: the access token and the cached profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl PersistedSession {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.user.is_none()
    }
}

/// Durable key-value storage for the session.
///
/// Each call is a single atomic operation: a reader never observes a
/// half-written session.
pub trait SessionStorage: Send + Sync + std::fmt::Debug {
    fn load(&self) -> ClientResult<PersistedSession>;
    fn save(&self, session: &PersistedSession) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

/// Session persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> ClientResult<PersistedSession> {
        if !self.path.exists() {
            return Ok(PersistedSession::default());
        }
        let json = fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Storage(format!("read {}: {e}", self.path.display())))?;
        if json.trim().is_empty() {
            return Ok(PersistedSession::default());
        }
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, session: &PersistedSession) -> ClientResult<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)
            .map_err(|e| ClientError::Storage(format!("create {}: {e}", dir.display())))?;

        // Write to a sibling temp file, then rename over the target
        let json = serde_json::to_string_pretty(session)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| ClientError::Storage(format!("persist {}: {e}", self.path.display())))?;
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(format!(
                "remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

/// In-process session storage
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    inner: Mutex<PersistedSession>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> ClientResult<PersistedSession> {
        Ok(self.inner.lock().clone())
    }

    fn save(&self, session: &PersistedSession) -> ClientResult<()> {
        *self.inner.lock() = session.clone();
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.inner.lock() = PersistedSession::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedSession {
        PersistedSession {
            access_token: Some("token-1".into()),
            user: Some(UserProfile {
                id: "u1".into(),
                email: "lan@example.vn".into(),
                full_name: "Trần Thị Lan".into(),
                role: "admin".into(),
                avatar: None,
            }),
        }
    }

    #[test]
    fn file_storage_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested").join("session.json"));

        assert!(storage.load().unwrap().is_empty());

        storage.save(&sample()).unwrap();
        assert_eq!(storage.load().unwrap(), sample());

        let raw = fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("\"accessToken\""));

        storage.clear().unwrap();
        assert!(!storage.path().exists());
        assert!(storage.load().unwrap().is_empty());
        // Clearing twice is fine
        storage.clear().unwrap();
    }

    #[test]
    fn file_storage_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        storage.save(&sample()).unwrap();

        let mut next = sample();
        next.access_token = Some("token-2".into());
        storage.save(&next).unwrap();

        assert_eq!(storage.load().unwrap().access_token.as_deref(), Some("token-2"));
        // Only the session file is left behind, no temp files
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        let storage = FileSessionStorage::new(&path);
        assert!(matches!(storage.load(), Err(ClientError::Serialization(_))));
    }

    #[test]
    fn memory_storage() {
        let storage = MemorySessionStorage::new();
        storage.save(&sample()).unwrap();
        assert_eq!(storage.load().unwrap(), sample());
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }
}
