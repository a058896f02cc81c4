// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Enforcement of "must be authenticated".
//!
//! Every identity-scoped operation calls [`require_identity`] (or
//! [`require_identity_with`] for a custom message) before doing any work.
//! Ownership of individual records is checked by the operation itself using
//! [`Identity::subject_id`].

use super::error::AuthorizationError;
use super::identity::Identity;
use super::resolver::RequestContext;

/// Default message for a missing identity.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Return the request's identity or fail with `UNAUTHENTICATED`.
pub fn require_identity(context: &RequestContext) -> Result<&Identity, AuthorizationError> {
    require_identity_with(context, NOT_AUTHENTICATED)
}

/// Like [`require_identity`] with an operation-specific message.
pub fn require_identity_with<'a>(
    context: &'a RequestContext,
    message: &str,
) -> Result<&'a Identity, AuthorizationError> {
    context
        .identity()
        .ok_or_else(|| AuthorizationError::unauthenticated(message))
}
