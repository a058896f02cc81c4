// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::token::SigningError;
use crate::auth::AuthorizationError;
use crate::storage::StorageError;

/// Non-authorization failure with an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::AlreadyExists(what) => ApiError::conflict(format!("{what} already exists")),
            other => {
                tracing::error!(error = %other, "Storage failure");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<SigningError> for ApiError {
    fn from(e: SigningError) -> Self {
        tracing::error!(error = %e, "Token signing failure");
        ApiError::internal("Internal server error")
    }
}

/// Failure of a user-facing operation.
///
/// Authorization failures stay distinguishable from everything else so
/// clients can tell "log in" apart from a generic error.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl OperationError {
    /// The authorization error, if that is what this is.
    pub fn as_authorization(&self) -> Option<&AuthorizationError> {
        match self {
            OperationError::Authorization(e) => Some(e),
            OperationError::Api(_) => None,
        }
    }
}

impl From<StorageError> for OperationError {
    fn from(e: StorageError) -> Self {
        OperationError::Api(e.into())
    }
}

impl From<SigningError> for OperationError {
    fn from(e: SigningError) -> Self {
        OperationError::Api(e.into())
    }
}

impl IntoResponse for OperationError {
    fn into_response(self) -> Response {
        match self {
            OperationError::Authorization(e) => e.into_response(),
            OperationError::Api(e) => e.into_response(),
        }
    }
}
