// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::run_blocking;
use crate::auth::error::AuthorizationErrorBody;
use crate::error::OperationError;
use crate::models::{AuthPayload, LoginRequest, RegisterRequest};
use crate::state::AppState;

/// Create an account and return a session token for it.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthPayload),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "Email or username already taken"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthPayload>), OperationError> {
    let accounts = state.accounts.clone();
    let payload = run_blocking(move || accounts.register(&request)).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

/// Exchange email and password for a session token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthPayload),
        (status = 401, description = "Incorrect email or password", body = AuthorizationErrorBody),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthPayload>, OperationError> {
    let accounts = state.accounts.clone();
    let payload = run_blocking(move || accounts.login(&request)).await?;
    Ok(Json(payload))
}
