// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Machine-checkable category of an authorization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// No verified identity is attached to the request
    Unauthenticated,
}

impl ErrorCategory {
    /// Get the wire code for this category.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCategory::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The only authentication-related error callers ever see.
///
/// The response is identical whether the token was absent, expired or
/// tampered with; only the message differs per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationError {
    category: ErrorCategory,
    message: String,
}

/// JSON body returned for authorization failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorizationErrorBody {
    pub error: String,
    pub error_code: ErrorCategory,
}

impl AuthorizationError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            category: ErrorCategory::Unauthenticated,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> StatusCode {
        self.category.status_code()
    }
}

impl std::fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

impl std::error::Error for AuthorizationError {}

impl IntoResponse for AuthorizationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthorizationErrorBody {
            error: self.message,
            error_code: self.category,
        });
        (status, body).into_response()
    }
}
