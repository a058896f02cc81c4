// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Storage
//!
//! Persistence for user accounts and their saved books, behind the
//! [`UserStore`] trait. The production implementation is [`UserDatabase`],
//! an embedded redb file under `DATA_DIR`.
//!
//! ## Table Layout
//!
//! ```text
//! users        id → UserRecord (JSON)
//! user_emails  lowercase email → id
//! usernames    lowercase username → id
//! ```

pub mod database;
pub mod password;
pub mod users;

pub use database::UserDatabase;
pub use users::{NewUser, UserRecord, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("database directory error: {0}")]
    Io(#[from] std::io::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
