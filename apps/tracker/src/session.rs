//! CurrentUserEmail: the seeker's last-used email, scoping the own-status list.
//!
//! Passed into `SeekerView` as an explicit context object instead of living in
//! ambient storage. No expiry; an empty string means "not set".

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub trait SessionStore: Send + Sync {
    fn current_email(&self) -> String;

    /// Replaces the stored email. An empty string clears it.
    fn set_current_email(&self, email: &str) -> Result<(), SessionError>;
}

/// Process-local session, nothing persisted.
#[derive(Debug, Default)]
pub struct MemorySession {
    email: RwLock<String>,
}

impl MemorySession {
    pub fn with_email(email: &str) -> Self {
        Self {
            email: RwLock::new(email.to_string()),
        }
    }
}

impl SessionStore for MemorySession {
    fn current_email(&self) -> String {
        read(&self.email)
    }

    fn set_current_email(&self, email: &str) -> Result<(), SessionError> {
        write(&self.email, email);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    #[serde(default)]
    user_email: String,
}

/// Session persisted as a small JSON document (`{"userEmail": "..."}`).
#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    email: RwLock<String>,
}

impl FileSession {
    /// Opens the session at `path`. A missing file is an empty session.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let stored = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => SessionFile::default(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionFile::default(),
            Err(e) => return Err(e.into()),
        };
        debug!("Session loaded from {}", path.display());
        Ok(Self {
            path,
            email: RwLock::new(stored.user_email),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSession {
    fn current_email(&self) -> String {
        read(&self.email)
    }

    fn set_current_email(&self, email: &str) -> Result<(), SessionError> {
        // In-memory value first: the running view stays scoped even if the write fails.
        write(&self.email, email);
        let doc = SessionFile {
            user_email: email.to_string(),
        };
        std::fs::write(&self.path, serde_json::to_vec_pretty(&doc)?)?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }
}

fn read(lock: &RwLock<String>) -> String {
    lock.read().unwrap_or_else(|e| e.into_inner()).clone()
}

fn write(lock: &RwLock<String>, value: &str) {
    *lock.write().unwrap_or_else(|e| e.into_inner()) = value.to_string();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = FileSession::open(dir.path().join("session.json")).unwrap();
        assert_eq!(session.current_email(), "");
    }

    #[test]
    fn test_email_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let session = FileSession::open(&path).unwrap();
        session.set_current_email("asha@example.com").unwrap();

        let reopened = FileSession::open(&path).unwrap();
        assert_eq!(reopened.current_email(), "asha@example.com");

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"userEmail\""));
    }

    #[test]
    fn test_clearing_email() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = FileSession::open(&path).unwrap();
        session.set_current_email("asha@example.com").unwrap();
        session.set_current_email("").unwrap();
        assert_eq!(FileSession::open(&path).unwrap().current_email(), "");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileSession::open(&path),
            Err(SessionError::Malformed(_))
        ));
    }

    #[test]
    fn test_memory_session() {
        let session = MemorySession::with_email("a@example.com");
        assert_eq!(session.current_email(), "a@example.com");
        session.set_current_email("b@example.com").unwrap();
        assert_eq!(session.current_email(), "b@example.com");
    }
}
