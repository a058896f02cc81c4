// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User records and the store interface the operations depend on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{password, StorageResult};
use crate::models::{Book, UserProfile};

/// A user as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier (UUID)
    pub id: String,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string; never the plaintext
    pub password_hash: String,
    /// Saved books, unique by `book_id`
    #[serde(default)]
    pub saved_books: Vec<Book>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn book_count(&self) -> usize {
        self.saved_books.len()
    }

    /// Add a book unless one with the same `book_id` is already saved.
    ///
    /// Returns whether the shelf changed.
    pub fn add_book(&mut self, book: Book) -> bool {
        if self.saved_books.iter().any(|b| b.book_id == book.book_id) {
            return false;
        }
        self.saved_books.push(book);
        true
    }

    /// Remove every book with the given `book_id`.
    ///
    /// Returns whether the shelf changed.
    pub fn remove_book(&mut self, book_id: &str) -> bool {
        let before = self.saved_books.len();
        self.saved_books.retain(|b| b.book_id != book_id);
        self.saved_books.len() != before
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            book_count: self.book_count(),
            saved_books: self.saved_books.clone(),
        }
    }
}

/// Fields needed to create a user. The password is plaintext here and is
/// hashed by the store before anything is written.
#[derive(Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Persistence operations consumed by the account and library operations.
///
/// Lookups return `Ok(None)` for absent records. `add_book` and
/// `remove_book` return `Ok(None)` when the user no longer exists.
pub trait UserStore: Send + Sync {
    fn find_user_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>>;

    /// Case-insensitive lookup by email.
    fn find_user_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>>;

    /// Create a user, hashing the password. Fails with `AlreadyExists` if the
    /// email or username is taken.
    fn create_user(&self, new_user: NewUser<'_>) -> StorageResult<UserRecord>;

    fn add_book(&self, user_id: &str, book: Book) -> StorageResult<Option<UserRecord>>;

    fn remove_book(&self, user_id: &str, book_id: &str) -> StorageResult<Option<UserRecord>>;

    /// Check a plaintext password against the record's stored hash.
    fn verify_password(&self, record: &UserRecord, plaintext: &str) -> bool {
        password::verify(plaintext, &record.password_hash)
    }
}
