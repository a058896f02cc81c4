// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and the request-scoped identity derived from them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried inside a session token.
///
/// Field names are the wire names shared with any other verifier of these
/// tokens: `_id`, `username`, `email`, `iat`, `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user record ID)
    #[serde(rename = "_id")]
    pub subject_id: String,

    pub username: String,

    pub email: String,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    /// Project the identity fields out of the claims.
    pub fn identity(&self) -> Identity {
        Identity {
            subject_id: self.subject_id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// The authenticated principal attached to a single request.
///
/// Only ever built from a token that passed structure, signature and expiry
/// checks. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Opaque ID of the user record
    pub subject_id: String,
    pub username: String,
    pub email: String,
}

impl Identity {
    pub fn new(
        subject_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            username: username.into(),
            email: email.into(),
        }
    }

    /// Whether this identity is the owner of the given user record ID.
    pub fn owns(&self, subject_id: &str) -> bool {
        self.subject_id == subject_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> SessionClaims {
        SessionClaims {
            subject_id: "user_123".to_string(),
            username: "reader".to_string(),
            email: "a@x.com".to_string(),
            iat: 1700000000,
            exp: 1700003600,
        }
    }

    #[test]
    fn identity_copies_claim_fields() {
        let identity = sample_claims().identity();
        assert_eq!(identity, Identity::new("user_123", "reader", "a@x.com"));
    }

    #[test]
    fn subject_serializes_as_underscore_id() {
        let json = serde_json::to_value(sample_claims()).unwrap();
        assert_eq!(json["_id"], "user_123");
        assert!(json.get("subject_id").is_none());
    }

    #[test]
    fn owns_compares_subject() {
        let identity = sample_claims().identity();
        assert!(identity.owns("user_123"));
        assert!(!identity.owns("user_456"));
    }
}
