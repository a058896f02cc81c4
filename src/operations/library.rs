// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The caller's own shelf: read it, add to it, remove from it.
//!
//! Every operation here is identity-scoped and starts with the guard. The
//! user record is always looked up by the identity's subject id, so a caller
//! can only ever touch their own shelf.

use std::sync::Arc;

use crate::auth::{require_identity, require_identity_with, RequestContext};
use crate::error::{ApiError, OperationError};
use crate::models::{BookInput, UserProfile};
use crate::storage::UserStore;

pub const SAVE_REQUIRES_LOGIN: &str = "User must be logged in";
pub const REMOVE_REQUIRES_LOGIN: &str = "User must be logged in to remove a book.";

pub struct Library {
    users: Arc<dyn UserStore>,
}

impl Library {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// The caller's profile with saved books.
    pub fn me(&self, context: &RequestContext) -> Result<UserProfile, OperationError> {
        let identity = require_identity(context)?;

        let user = self
            .users
            .find_user_by_id(&identity.subject_id)?
            .ok_or_else(user_not_found)?;
        Ok(user.profile())
    }

    /// Add a book to the caller's shelf. Saving an already saved book is a
    /// no-op.
    pub fn save_book(
        &self,
        context: &RequestContext,
        input: BookInput,
    ) -> Result<UserProfile, OperationError> {
        let identity = require_identity_with(context, SAVE_REQUIRES_LOGIN)?;
        validate_book(&input)?;

        let user = self
            .users
            .add_book(&identity.subject_id, input.into())?
            .ok_or_else(user_not_found)?;

        tracing::debug!(subject_id = %identity.subject_id, books = user.book_count(), "Book saved");
        Ok(user.profile())
    }

    /// Remove a book from the caller's shelf.
    pub fn remove_book(
        &self,
        context: &RequestContext,
        book_id: &str,
    ) -> Result<UserProfile, OperationError> {
        let identity = require_identity_with(context, REMOVE_REQUIRES_LOGIN)?;

        let user = self
            .users
            .remove_book(&identity.subject_id, book_id)?
            .ok_or_else(user_not_found)?;

        tracing::debug!(subject_id = %identity.subject_id, books = user.book_count(), "Book removed");
        Ok(user.profile())
    }
}

/// A valid token whose user record is gone. Not an authorization failure.
fn user_not_found() -> ApiError {
    ApiError::not_found("User not found")
}

fn validate_book(input: &BookInput) -> Result<(), ApiError> {
    if input.book_id.trim().is_empty() {
        return Err(ApiError::bad_request("bookId is required"));
    }
    if input.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }
    Ok(())
}
