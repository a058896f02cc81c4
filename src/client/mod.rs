// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client for the bookshelf API.
//!
//! [`ClientSession`] keeps the session token between calls and
//! [`ApiClient`] attaches it to every request.

pub mod api;
pub mod session;

pub use api::ApiClient;
pub use session::{ClientSession, FileTokenStore, MemoryTokenStore, TokenStore};

/// Client-side failure.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server refused the call for lack of a valid session. Log in again.
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// Any other error response from the server.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("token store serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("token store lock poisoned")]
    StorePoisoned,
}

impl ClientError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ClientError::Unauthenticated(_))
    }
}
