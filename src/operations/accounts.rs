// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account creation and login. Both end by issuing a session token.

use std::sync::Arc;

use crate::auth::{AuthorizationError, TokenService};
use crate::error::{ApiError, OperationError};
use crate::models::{AuthPayload, LoginRequest, RegisterRequest};
use crate::storage::{NewUser, UserRecord, UserStore};

/// Message for any failed login; never says which half was wrong.
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password.";

pub struct Accounts {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
}

impl Accounts {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Create a user and log them in.
    pub fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, OperationError> {
        validate_registration(request)?;

        let record = self.users.create_user(NewUser {
            username: &request.username,
            email: &request.email,
            password: &request.password,
        })?;

        tracing::info!(subject_id = %record.id, "User registered");
        self.session_for(record)
    }

    /// Check credentials and issue a token.
    pub fn login(&self, request: &LoginRequest) -> Result<AuthPayload, OperationError> {
        let Some(record) = self.users.find_user_by_email(&request.email)? else {
            tracing::info!("Login rejected: unknown email");
            return Err(AuthorizationError::unauthenticated(INVALID_CREDENTIALS).into());
        };

        if !self.users.verify_password(&record, &request.password) {
            tracing::info!(subject_id = %record.id, "Login rejected: wrong password");
            return Err(AuthorizationError::unauthenticated(INVALID_CREDENTIALS).into());
        }

        tracing::info!(subject_id = %record.id, "User logged in");
        self.session_for(record)
    }

    fn session_for(&self, record: UserRecord) -> Result<AuthPayload, OperationError> {
        let token = self
            .tokens
            .issue(&record.id, &record.username, &record.email)?;
        Ok(AuthPayload {
            token: token.into_string(),
            user: record.profile(),
        })
    }
}

fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    if request.username.trim().is_empty() {
        return Err(ApiError::bad_request("username is required"));
    }
    if !is_plausible_email(request.email.trim()) {
        return Err(ApiError::bad_request("email must be a valid email address"));
    }
    if request.password.is_empty() {
        return Err(ApiError::bad_request("password is required"));
    }
    Ok(())
}

/// `local@domain` with no whitespace and a dot somewhere in the domain.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
