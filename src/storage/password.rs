// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Argon2 password hashing. Plaintext passwords never reach the database.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password into a PHC string.
pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
}

/// Check a plaintext password against a stored PHC string.
///
/// An unparseable hash never verifies.
pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_right_password() {
        let hashed = hash("correct").unwrap();
        assert_ne!(hashed, "correct");
        assert!(verify("correct", &hashed));
        assert!(!verify("wrong", &hashed));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash("correct").unwrap(), hash("correct").unwrap());
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify("correct", "correct"));
        assert!(!verify("", ""));
    }
}
