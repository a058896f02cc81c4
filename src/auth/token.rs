// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification.
//!
//! Tokens are compact HS256 JWTs carrying [`SessionClaims`]. Every token lives
//! for exactly [`TOKEN_LIFETIME_SECS`]; there is no renewal. Expiry is checked
//! here against an explicit instant rather than inside `jsonwebtoken`, so the
//! check is `now < exp` with no leeway.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::identity::{Identity, SessionClaims};
use crate::config::SigningSecret;

/// Fixed session lifetime (one hour).
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a presented token was rejected.
///
/// Callers outside the resolver only care that verification failed; the
/// category exists for logging.
///
/// The header segment is decoded before the signature is checked, so a
/// tampered header usually reports `Malformed`. Tampered payloads and
/// signatures report `BadSignature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationFailure {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

impl VerificationFailure {
    /// Stable tag used in structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            VerificationFailure::Malformed => "malformed",
            VerificationFailure::BadSignature => "bad_signature",
            VerificationFailure::Expired => "expired",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for VerificationFailure {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                VerificationFailure::BadSignature
            }
            ErrorKind::ExpiredSignature => VerificationFailure::Expired,
            _ => VerificationFailure::Malformed,
        }
    }
}

/// Signing a token failed. Only reachable through a broken crypto backend.
#[derive(Debug, thiserror::Error)]
#[error("failed to sign session token: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

/// An issued session token: the wire text plus the claims it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    text: String,
    claims: SessionClaims,
}

impl SessionToken {
    /// URL-safe wire representation.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        unix_to_datetime(self.claims.iat)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        unix_to_datetime(self.claims.exp)
    }
}

/// Signs and verifies session tokens with the process-wide secret.
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is enforced in `verify_at` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for the given user, valid for one hour from now.
    pub fn issue(
        &self,
        subject_id: &str,
        username: &str,
        email: &str,
    ) -> Result<SessionToken, SigningError> {
        self.issue_at(subject_id, username, email, Utc::now())
    }

    /// Issue a token stamped as issued at `now`.
    pub fn issue_at(
        &self,
        subject_id: &str,
        username: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, SigningError> {
        let iat = now.timestamp();
        let claims = SessionClaims {
            subject_id: subject_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        };

        let text = encode(&Header::new(ALGORITHM), &claims, &self.encoding)?;
        Ok(SessionToken { text, claims })
    }

    /// Verify a token against the current wall clock.
    pub fn verify(&self, token: &str) -> Result<Identity, VerificationFailure> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// Order: structure and signature first, then claim sanity, then expiry.
    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, VerificationFailure> {
        self.verified_claims_at(token, now)
            .map(|claims| claims.identity())
    }

    /// Same checks as [`verify_at`](Self::verify_at) but returns the full claims.
    pub fn verified_claims_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, VerificationFailure> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation)?;
        let claims = data.claims;
        check_claims(&claims)?;

        if now.timestamp() >= claims.exp {
            return Err(VerificationFailure::Expired);
        }

        Ok(claims)
    }
}

/// Decode claims WITHOUT checking the signature.
///
/// For client-side display and expiry hints only. Never use the result to
/// grant access.
pub fn peek_claims(token: &str) -> Result<SessionClaims, VerificationFailure> {
    let data = jsonwebtoken::dangerous::insecure_decode::<SessionClaims>(token)
        .map_err(|_| VerificationFailure::Malformed)?;
    check_claims(&data.claims)?;
    Ok(data.claims)
}

fn check_claims(claims: &SessionClaims) -> Result<(), VerificationFailure> {
    if claims.subject_id.is_empty() || claims.username.is_empty() || claims.exp <= claims.iat {
        return Err(VerificationFailure::Malformed);
    }
    Ok(())
}

fn unix_to_datetime(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}
