// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures shared by the HTTP API and the
//! client. All types derive `Serialize`, `Deserialize`, and `ToSchema` and use
//! camelCase field names on the wire.
//!
//! ## Model Categories
//!
//! - **Books**: Saved book entries and the input used to save one
//! - **Users**: The caller's profile with their saved books
//! - **Auth**: Registration/login requests and the token payload

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Book Models
// =============================================================================

/// A book saved to a user's shelf.
///
/// `book_id` is the identifier from the public search provider and is unique
/// within a single user's shelf.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// External book identifier.
    pub book_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Link to the book's details page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Request to save a book.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub book_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl From<BookInput> for Book {
    fn from(input: BookInput) -> Self {
        Self {
            book_id: input.book_id,
            title: input.title,
            authors: input.authors,
            description: input.description,
            image: input.image,
            link: input.link,
        }
    }
}

// =============================================================================
// User Models
// =============================================================================

/// The authenticated caller's profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User record ID.
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    /// Number of saved books.
    pub book_count: usize,
    pub saved_books: Vec<Book>,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request to create an account.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
}

/// Request to log in.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Issued session token together with the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthPayload {
    /// Bearer token for subsequent requests.
    pub token: String,
    pub user: UserProfile,
}
