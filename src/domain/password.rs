//! Password value object - Domain layer password handling.
//!
//! Customers store a hash and the salt it was derived with. Only the
//! contract matters to callers: `new` derives both, `verify` checks a
//! plain-text candidate against them.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// Salted password hash.
#[derive(Clone)]
pub struct Password {
    hash: String,
    salt: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password with a freshly generated salt.
    ///
    /// # Errors
    /// Returns a validation error for an empty password.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.is_empty() {
            return Err(AppError::validation("password must not be empty"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("password hash failed: {}", e)))?;

        Ok(Self {
            hash: hash.to_string(),
            salt: salt.as_str().to_string(),
        })
    }

    /// Rebuild from stored columns.
    pub fn from_parts(hash: String, salt: String) -> Self {
        Self { hash, salt }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Verify a plain-text candidate. A corrupt stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return false;
        };

        if parsed.salt.map(|s| s.as_str()) != Some(self.salt.as_str()) {
            return false;
        }

        Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.salt == other.salt
    }
}

impl Eq for Password {}
