// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bookshelf Server - token-authenticated personal book shelf
//!
//! Users register or log in to receive a signed, hour-long session token.
//! Every request is resolved to an optional identity from its bearer token,
//! and identity-scoped operations refuse to run without one.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session tokens, request identity resolution and the guard
//! - `client` - Caller-side session store and HTTP client
//! - `operations` - Account and shelf operations
//! - `storage` - User records (redb)

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod operations;
pub mod state;
pub mod storage;
pub mod telemetry;
