//! Password value object.
//!
//! Wraps an Argon2 PHC string; the plain text never leaves `new`/`verify`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hashed password as stored on the user record.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password with a fresh salt.
    ///
    /// # Errors
    /// Validation error when shorter than `MIN_PASSWORD_LENGTH`, internal
    /// error if hashing itself fails.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Rehydrate from a stored hash.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a candidate against the stored hash. A malformed hash never
    /// verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let password = Password::new("Catalogo#2024").unwrap();
        assert!(password.verify("Catalogo#2024"));
        assert!(!password.verify("catalogo#2024"));
    }

    #[test]
    fn test_rehydrated_hash_verifies() {
        let stored = Password::new("estoque-cheio").unwrap().into_string();
        assert!(Password::from_hash(stored).verify("estoque-cheio"));
    }

    #[test]
    fn test_salts_differ() {
        let a = Password::new("mesma-senha").unwrap();
        let b = Password::new("mesma-senha").unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_too_short_rejected() {
        assert!(matches!(Password::new("curta"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!Password::from_hash("not-a-phc-string").verify("anything"));
    }
}
