//! services/api/src/adapters/password.rs
//!
//! Argon2id implementation of the `PasswordService` port.

use anon_journal_core::ports::{PasswordService, PortError, PortResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hashes passwords into PHC strings with default Argon2id parameters.
#[derive(Clone, Default)]
pub struct Argon2PasswordAdapter {
    argon2: Argon2<'static>,
}

impl Argon2PasswordAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordAdapter {
    fn hash_password(&self, plaintext: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {e}")))
    }

    fn verify_password(&self, plaintext: &str, hash: &str) -> PortResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PortError::Unexpected(format!("Invalid password hash format: {e}")))?;

        Ok(self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let adapter = Argon2PasswordAdapter::new();
        let hash = adapter.hash_password("correct-horse-battery").unwrap();

        // Hash should be in PHC format
        assert!(hash.starts_with("$argon2"));

        assert!(adapter.verify_password("correct-horse-battery", &hash).unwrap());
        assert!(!adapter.verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_different_salts() {
        let adapter = Argon2PasswordAdapter::new();
        let hash1 = adapter.hash_password("same-password").unwrap();
        let hash2 = adapter.hash_password("same-password").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_invalid_hash_format() {
        let adapter = Argon2PasswordAdapter::new();
        assert!(adapter.verify_password("password", "not-a-valid-hash").is_err());
    }
}
