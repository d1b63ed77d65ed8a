//! Password hashing adapter built on Argon2id.
//!
//! Hashes are produced in PHC string format, so the parameters and salt
//! travel with the hash and verification needs no extra configuration.
//! Hashing is CPU-bound by design; both operations run on the blocking
//! thread pool to keep the async executor responsive.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash as PhcHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher as _};
use async_trait::async_trait;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Argon2id-backed [`PasswordHasher`] implementation with default
/// parameters.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a hasher with the library's default Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext on the calling thread.
    ///
    /// Intended for startup seeding before the server accepts traffic;
    /// request paths use the async port methods instead.
    pub fn hash_blocking(plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|error| PasswordHasherError::hash(error.to_string()))?;
        Ok(PasswordHash::new(hash.to_string()))
    }

    fn verify_blocking(plaintext: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let parsed = PhcHash::new(hash.as_str())
            .map_err(|error| PasswordHasherError::hash(format!("stored hash is invalid: {error}")))?;
        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(PasswordHasherError::hash(error.to_string())),
        }
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || Self::hash_blocking(&plaintext))
            .await
            .map_err(|error| PasswordHasherError::hash(format!("hashing task failed: {error}")))?
    }

    async fn verify(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let plaintext = plaintext.to_owned();
        let hash = hash.clone();
        tokio::task::spawn_blocking(move || Self::verify_blocking(&plaintext, &hash))
            .await
            .map_err(|error| {
                PasswordHasherError::hash(format!("verification task failed: {error}"))
            })?
    }
}
