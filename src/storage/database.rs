// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded user database backed by redb (pure Rust, ACID).

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use uuid::Uuid;

use super::users::{NewUser, UserRecord, UserStore};
use super::{password, StorageError, StorageResult};
use crate::models::Book;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user id → serialized UserRecord (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Index: lowercase email → user id.
const USER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("user_emails");

/// Index: lowercase username → user id.
const USERNAMES: TableDefinition<&str, &str> = TableDefinition::new("usernames");

fn index_key(value: &str) -> String {
    value.trim().to_lowercase()
}

// =============================================================================
// UserDatabase
// =============================================================================

pub struct UserDatabase {
    db: Database,
}

impl UserDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
            let _ = write_txn.open_table(USERNAMES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Read-modify-write a user record in one transaction.
    ///
    /// Returns `Ok(None)` if the user does not exist.
    fn update_user<F>(&self, user_id: &str, apply: F) -> StorageResult<Option<UserRecord>>
    where
        F: FnOnce(&mut UserRecord) -> bool,
    {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(USERS)?;

            let existing_bytes = match table.get(user_id)? {
                Some(existing) => existing.value().to_vec(),
                None => return Ok(None),
            };

            let mut user: UserRecord = serde_json::from_slice(&existing_bytes)?;
            if apply(&mut user) {
                let json = serde_json::to_vec(&user)?;
                table.insert(user_id, json.as_slice())?;
            }
            user
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }
}

impl UserStore for UserDatabase {
    fn find_user_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn find_user_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        let user_id = {
            let read_txn = self.db.begin_read()?;
            let emails = read_txn.open_table(USER_EMAILS)?;
            match emails.get(index_key(email).as_str())? {
                Some(v) => v.value().to_string(),
                None => return Ok(None),
            }
        };
        self.find_user_by_id(&user_id)
    }

    fn create_user(&self, new_user: NewUser<'_>) -> StorageResult<UserRecord> {
        // Hash outside the write transaction; Argon2 is deliberately slow.
        let password_hash = password::hash(new_user.password)
            .map_err(|e| StorageError::PasswordHash(e.to_string()))?;

        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            username: new_user.username.trim().to_string(),
            email: new_user.email.trim().to_string(),
            password_hash,
            saved_books: Vec::new(),
            created_at: Utc::now(),
        };
        let email_key = index_key(&record.email);
        let username_key = index_key(&record.username);
        let json = serde_json::to_vec(&record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            if emails.get(email_key.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!("User with email {}", record.email)));
            }

            let mut usernames = write_txn.open_table(USERNAMES)?;
            if usernames.get(username_key.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "User with username {}",
                    record.username
                )));
            }

            let mut users = write_txn.open_table(USERS)?;
            users.insert(record.id.as_str(), json.as_slice())?;
            emails.insert(email_key.as_str(), record.id.as_str())?;
            usernames.insert(username_key.as_str(), record.id.as_str())?;
        }
        write_txn.commit()?;

        Ok(record)
    }

    fn add_book(&self, user_id: &str, book: Book) -> StorageResult<Option<UserRecord>> {
        self.update_user(user_id, |user| user.add_book(book))
    }

    fn remove_book(&self, user_id: &str, book_id: &str) -> StorageResult<Option<UserRecord>> {
        self.update_user(user_id, |user| user.remove_book(book_id))
    }
}
