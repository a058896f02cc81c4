// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session tokens for the Bookshelf API.
//!
//! ## Auth Flow
//!
//! 1. `register` / `login` succeed → [`TokenService::issue`] signs an HS256
//!    token valid for one hour
//! 2. The client stores it and sends `Authorization: Bearer <token>`
//! 3. [`resolver::resolve_identity`] verifies it and places a
//!    [`RequestContext`] (identity or anonymous) in the request
//! 4. Protected operations call [`require_identity`] first
//!
//! ## Security
//!
//! - A bad token never grants access; it only makes the request anonymous
//! - Absent, expired and tampered tokens produce the same `UNAUTHENTICATED`
//!   response
//! - No leeway on expiry and no renewal; log in again for a fresh token

pub mod cache;
pub mod error;
pub mod guard;
pub mod identity;
pub mod resolver;
pub mod token;

pub use cache::VerificationCache;
pub use error::{AuthorizationError, ErrorCategory};
pub use guard::{require_identity, require_identity_with};
pub use identity::{Identity, SessionClaims};
pub use resolver::{RequestAuthResolver, RequestContext};
pub use token::{SessionToken, TokenService, VerificationFailure, TOKEN_LIFETIME_SECS};
