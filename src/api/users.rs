// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Endpoints scoped to the authenticated caller.
//!
//! Handlers take the [`RequestContext`] rather than a rejecting extractor so
//! each operation applies its own guard and message.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::run_blocking;
use crate::auth::error::AuthorizationErrorBody;
use crate::auth::{require_identity_with, RequestContext};
use crate::error::{ApiError, OperationError};
use crate::operations::library::SAVE_REQUIRES_LOGIN;
use crate::models::{BookInput, UserProfile};
use crate::state::AppState;

/// Get the caller's profile and saved books.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = UserProfile),
        (status = 401, description = "Not authenticated", body = AuthorizationErrorBody),
        (status = 404, description = "User record no longer exists"),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    context: RequestContext,
) -> Result<Json<UserProfile>, OperationError> {
    let library = state.library.clone();
    let profile = run_blocking(move || library.me(&context)).await?;
    Ok(Json(profile))
}

/// Save a book to the caller's shelf.
///
/// An anonymous caller is refused before the body is decoded, so a malformed
/// body never masks `UNAUTHENTICATED`.
#[utoipa::path(
    post,
    path = "/v1/users/me/books",
    tag = "Users",
    security(("bearer" = [])),
    request_body = BookInput,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Missing book id or title, or malformed body"),
        (status = 401, description = "Not authenticated", body = AuthorizationErrorBody),
        (status = 404, description = "User record no longer exists"),
    )
)]
pub async fn save_book(
    State(state): State<AppState>,
    context: RequestContext,
    body: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<UserProfile>, OperationError> {
    require_identity_with(&context, SAVE_REQUIRES_LOGIN)?;
    let Json(input) = body.map_err(|e| ApiError::new(e.status(), e.body_text()))?;

    let library = state.library.clone();
    let profile = run_blocking(move || library.save_book(&context, input)).await?;
    Ok(Json(profile))
}

/// Remove a book from the caller's shelf.
#[utoipa::path(
    delete,
    path = "/v1/users/me/books/{book_id}",
    tag = "Users",
    security(("bearer" = [])),
    params(("book_id" = String, Path, description = "External book identifier")),
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 401, description = "Not authenticated", body = AuthorizationErrorBody),
        (status = 404, description = "User record no longer exists"),
    )
)]
pub async fn remove_book(
    State(state): State<AppState>,
    context: RequestContext,
    Path(book_id): Path<String>,
) -> Result<Json<UserProfile>, OperationError> {
    let library = state.library.clone();
    let profile = run_blocking(move || library.remove_book(&context, &book_id)).await?;
    Ok(Json(profile))
}
