// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache of successfully verified tokens.
//!
//! Keyed by the SHA-256 digest of the token text so raw tokens are never held
//! in memory longer than the request. An entry is never served at or after
//! the token's `exp`.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use lru::LruCache;
use sha2::{Digest, Sha256};

use super::identity::Identity;

/// Default number of cached verifications.
pub const DEFAULT_CAPACITY: usize = 1024;

type TokenDigest = [u8; 32];

struct CacheEntry {
    identity: Identity,
    expires_at: i64,
}

/// In-process cache for hot session tokens.
pub struct VerificationCache {
    cache: Mutex<LruCache<TokenDigest, CacheEntry>>,
}

impl VerificationCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a previously verified token.
    ///
    /// Returns `None` if absent or if `now` has reached the token's expiry,
    /// evicting the stale entry.
    pub fn get(&self, token: &str, now: DateTime<Utc>) -> Option<Identity> {
        let key = digest(token);
        let mut cache = self.cache.lock().ok()?;
        let entry = cache.get(&key)?;
        if now.timestamp() < entry.expires_at {
            return Some(entry.identity.clone());
        }
        cache.pop(&key);
        None
    }

    /// Remember a verified token until `expires_at` (Unix seconds).
    pub fn insert(&self, token: &str, identity: Identity, expires_at: i64) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                digest(token),
                CacheEntry {
                    identity,
                    expires_at,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VerificationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}
