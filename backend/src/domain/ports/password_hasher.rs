//! Port abstraction for one-way secret hashing.
use async_trait::async_trait;

use crate::domain::user::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing or verification could not be performed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Driven port producing and checking salted, slow, one-way hashes.
///
/// Hashing is CPU-bound; adapters are expected to move the work off the
/// async executor (for example via `spawn_blocking`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext secret into PHC string format.
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a plaintext secret against a stored hash.
    async fn verify(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}
