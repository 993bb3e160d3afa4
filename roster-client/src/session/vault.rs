//! Durable key-value storage for session data.
//!
//! The store itself stays pure; everything side-effecting lives behind
//! [`SessionVault`] so tests run against an in-memory backend. The file
//! backend is a plain JSON document under the platform data directory,
//! the desktop analogue of the browser's local storage.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use log::debug;
use roster_model::Role;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub(crate) const SESSION_FILE: &str = "session.json";

/// Persisted session data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub role: Role,
    /// When this session was stored.
    pub stored_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: String, role: Role) -> Self {
        Self {
            token,
            role,
            stored_at: Utc::now(),
        }
    }
}

/// Key-value boundary for durable session storage.
///
/// Synchronous and atomic from the caller's perspective; absence of a
/// stored session is not an error.
pub trait SessionVault: Send + Sync {
    fn load(&self) -> Option<StoredSession>;
    fn store(&self, session: &StoredSession) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

/// File-backed vault under the platform data directory.
#[derive(Debug)]
pub struct FileVault {
    path: PathBuf,
}

impl FileVault {
    /// Create a vault at the standard per-user location.
    pub fn new() -> ClientResult<Self> {
        let proj_dirs = ProjectDirs::from("", "roster", "roster-console")
            .ok_or_else(|| {
                ClientError::Storage("Unable to determine data directory".into())
            })?;
        Ok(Self {
            path: proj_dirs.data_dir().join(SESSION_FILE),
        })
    }

    /// Create a vault at an explicit path. Used by tests.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionVault for FileVault {
    fn load(&self) -> Option<StoredSession> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("[FileVault] No stored session: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                // A corrupt file is treated as absent; the next login
                // overwrites it.
                debug!("[FileVault] Discarding unreadable session file: {e}");
                None
            }
        }
    }

    fn store(&self, session: &StoredSession) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| ClientError::Storage(e.to_string()))
    }

    fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(e.to_string())),
        }
    }
}

/// In-memory vault for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryVault {
    inner: parking_lot::Mutex<Option<StoredSession>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: parking_lot::Mutex::new(Some(session)),
        }
    }
}

impl SessionVault for MemoryVault {
    fn load(&self) -> Option<StoredSession> {
        self.inner.lock().clone()
    }

    fn store(&self, session: &StoredSession) -> ClientResult<()> {
        *self.inner.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.inner.lock() = None;
        Ok(())
    }
}
