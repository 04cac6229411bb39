//! Password value object - hashing and verification.
//!
//! Argon2 configuration lives in one place so every hash in the system is
//! produced the same way.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::registration::{Field, Rule, ValidationErrorSet};
use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hashed password.
///
/// Holds only the PHC-formatted Argon2 hash, never the plain text.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a `password` validation error if the text is blank or shorter
    /// than [`MIN_PASSWORD_LENGTH`] characters.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.trim().is_empty() {
            return Err(AppError::Validation(ValidationErrorSet::single(
                Field::Password,
                Rule::Required,
            )));
        }
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(ValidationErrorSet::single(
                Field::Password,
                Rule::Min,
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "secret";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("not-secret"));
        assert!(password.as_str().starts_with("$argon2"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPassword123";
        let password = Password::new(plain).unwrap();
        let hash = password.as_str().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        // Different salts produce different hashes
        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_password_too_short() {
        match Password::new("secre") {
            Err(AppError::Validation(errors)) => assert!(errors.has(Field::Password, Rule::Min)),
            other => panic!("expected min violation, got {:?}", other),
        }
    }

    #[test]
    fn test_password_blank() {
        match Password::new("") {
            Err(AppError::Validation(errors)) => {
                assert!(errors.has(Field::Password, Rule::Required))
            }
            other => panic!("expected required violation, got {:?}", other),
        }
    }

    #[test]
    fn test_password_minimum_length_counts_characters() {
        // Six characters, more than six bytes
        assert!(Password::new("ééééé1").is_ok());
        assert!(Password::new("secret").is_ok());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let password = Password::from_hash("not-a-phc-string".to_string());
        assert!(!password.verify("secret"));
    }
}
