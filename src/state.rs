// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{RequestAuthResolver, TokenService, VerificationCache};
use crate::operations::{Accounts, Library};
use crate::storage::UserStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RequestAuthResolver>,
    pub accounts: Arc<Accounts>,
    pub library: Arc<Library>,
}

impl AppState {
    /// Wire the operations to a store and token service. Repeat tokens are
    /// served from a verification cache.
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        let resolver =
            RequestAuthResolver::new(tokens.clone()).with_cache(VerificationCache::default());
        Self {
            resolver: Arc::new(resolver),
            accounts: Arc::new(Accounts::new(users.clone(), tokens)),
            library: Arc::new(Library::new(users)),
        }
    }
}
