// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request identity resolution.
//!
//! Every request passes through [`resolve_identity`], which reads the
//! `Authorization: Bearer <token>` header, verifies the token and stores a
//! [`RequestContext`] in the request extensions. A missing or rejected token
//! yields an anonymous context; it never fails the request. Enforcement is
//! left to [`require_identity`](super::guard::require_identity).
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/v1/users/me", get(me))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), resolve_identity))
//!     .with_state(state);
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use super::cache::VerificationCache;
use super::identity::Identity;
use super::token::TokenService;
use crate::state::AppState;

/// Credential scheme prefix. Case-sensitive, exactly one space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Per-request authentication state handed to operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

impl From<Option<Identity>> for RequestContext {
    fn from(identity: Option<Identity>) -> Self {
        Self { identity }
    }
}

/// Turns request headers into an optional [`Identity`].
pub struct RequestAuthResolver {
    tokens: Arc<TokenService>,
    cache: Option<VerificationCache>,
}

impl RequestAuthResolver {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            cache: None,
        }
    }

    /// Serve repeat tokens from a verification cache.
    pub fn with_cache(mut self, cache: VerificationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve the caller's identity as of now.
    pub fn resolve(&self, headers: &HeaderMap) -> Option<Identity> {
        self.resolve_at(headers, Utc::now())
    }

    /// Resolve the caller's identity as of `now`.
    ///
    /// Missing header, wrong scheme, empty token and every verification
    /// failure all return `None`.
    pub fn resolve_at(&self, headers: &HeaderMap, now: DateTime<Utc>) -> Option<Identity> {
        let token = bearer_token(headers)?;

        if let Some(identity) = self.cache.as_ref().and_then(|c| c.get(token, now)) {
            return Some(identity);
        }

        match self.tokens.verified_claims_at(token, now) {
            Ok(claims) => {
                let identity = claims.identity();
                if let Some(cache) = &self.cache {
                    cache.insert(token, identity.clone(), claims.exp);
                }
                Some(identity)
            }
            Err(failure) => {
                tracing::warn!(
                    reason = failure.reason(),
                    "Session token rejected, continuing as anonymous"
                );
                None
            }
        }
    }

    /// Build the request context for the given headers.
    pub fn context(&self, headers: &HeaderMap) -> RequestContext {
        self.resolve(headers).into()
    }
}

/// Extract the bearer token text, if the header carries one.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Middleware that attaches a [`RequestContext`] to every request.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = state.resolver.context(request.headers());
    request.extensions_mut().insert(context);
    next.run(request).await
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Normally set by the middleware
        if let Some(context) = parts.extensions.get::<RequestContext>().cloned() {
            return Ok(context);
        }

        let context = state.resolver.context(&parts.headers);
        parts.extensions.insert(context.clone());
        Ok(context)
    }
}
