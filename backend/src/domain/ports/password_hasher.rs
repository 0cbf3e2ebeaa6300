//! Port for one-way password hashing.
use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Producing a digest failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored digest could not be checked, usually because it is corrupt.
        Verify { message: String } => "password verification failed: {message}",
    }
}

/// Salted, adaptive password hashing.
///
/// Implementations may be CPU heavy and are expected to move work off the
/// async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Derive a salted digest from `password`.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Whether `password` matches `hash`. A mismatch is `Ok(false)`.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
