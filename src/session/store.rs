//! Persisted-session storage
//!
//! The session blob is the set of `Set-Cookie` headers captured during a
//! successful login, together with the URL each one came from, so the
//! cookie jar can be rebuilt without re-authenticating. The store is
//! isolated behind a trait so an expiry or refresh policy can be added
//! later without touching crawl logic; the file-backed implementation
//! treats mere file presence as proof of validity.

use crate::SessionStoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One captured `Set-Cookie` header and the URL of the response that
/// carried it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedCookie {
    pub url: String,
    pub set_cookie: String,
}

/// The opaque serialized session blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedSession {
    pub cookies: Vec<PersistedCookie>,
}

/// Storage backend for the authenticated session.
pub trait SessionStore: Send {
    /// Whether a persisted session is available. Presence is treated as
    /// validity; no staleness probe is performed.
    fn exists(&self) -> bool;

    /// Loads the persisted session, or `None` if there is none.
    fn load(&self) -> Result<Option<PersistedSession>, SessionStoreError>;

    /// Persists the session. Called at most once per process, after a
    /// successful login handshake.
    fn save(&self, session: &PersistedSession) -> Result<(), SessionStoreError>;
}

/// File-backed session store writing a JSON blob at a fixed path.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<Option<PersistedSession>, SessionStoreError> {
        if !self.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    fn save(&self, session: &PersistedSession) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string(session)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
