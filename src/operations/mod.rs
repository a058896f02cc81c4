// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User-facing operations, independent of the HTTP layer.

pub mod accounts;
pub mod library;

pub use accounts::Accounts;
pub use library::Library;
