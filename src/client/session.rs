// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Caller-side session: where the issued token lives between requests.
//!
//! Nothing here has authority. [`ClientSession::is_active`] decodes the token
//! locally to avoid pointless round trips; the server re-verifies every
//! request regardless.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ClientError;
use crate::auth::token::peek_claims;
use crate::auth::{SessionClaims, VerificationFailure};

/// Durable home for the session token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, ClientError>;

    /// Overwrites any previous token.
    fn save(&self, token: &str) -> Result<(), ClientError>;

    /// Removing an absent token is not an error.
    fn remove(&self) -> Result<(), ClientError>;
}

// =============================================================================
// File store
// =============================================================================

#[derive(Serialize, Deserialize)]
struct StoredToken {
    id_token: String,
}

/// Token persisted as `{"id_token": "..."}` at a fixed path.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, ClientError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredToken = serde_json::from_slice(&bytes)?;
        Ok(Some(stored.id_token))
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(&StoredToken {
            id_token: token.to_string(),
        })?;

        // Write then rename so a crash never leaves a half-written token
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Memory store
// =============================================================================

/// Process-local store. Gone when dropped.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, ClientError> {
        let slot = self.slot.lock().map_err(|_| ClientError::StorePoisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        let mut slot = self.slot.lock().map_err(|_| ClientError::StorePoisoned)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), ClientError> {
        let mut slot = self.slot.lock().map_err(|_| ClientError::StorePoisoned)?;
        *slot = None;
        Ok(())
    }
}

// =============================================================================
// Session
// =============================================================================

#[derive(Clone)]
pub struct ClientSession {
    store: Arc<dyn TokenStore>,
}

impl ClientSession {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session backed by a [`MemoryTokenStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Persist a freshly issued token.
    pub fn store(&self, token: &str) -> Result<(), ClientError> {
        self.store.save(token)
    }

    /// The stored token, if any. An unreadable store counts as empty.
    pub fn current(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored session token");
                None
            }
        }
    }

    /// Whether a stored token exists and has not expired by the local clock.
    ///
    /// An expired or undecodable token is discarded from the store.
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let Some(token) = self.current() else {
            return false;
        };

        let failure = match peek_claims(&token) {
            Ok(claims) if now.timestamp() < claims.exp => return true,
            Ok(_) => VerificationFailure::Expired,
            Err(failure) => failure,
        };

        tracing::warn!(reason = failure.reason(), "Discarding stored session token");
        if let Err(e) = self.store.remove() {
            tracing::warn!(error = %e, "Could not discard stored session token");
        }
        false
    }

    /// Unverified claims of the stored token, for display.
    pub fn profile(&self) -> Option<SessionClaims> {
        self.current().and_then(|token| peek_claims(&token).ok())
    }

    /// Log out locally.
    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.remove()
    }

    /// Add the bearer header if a token is stored; otherwise pass through.
    pub fn attach(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.current() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("has_token", &self.current().is_some())
            .finish()
    }
}
