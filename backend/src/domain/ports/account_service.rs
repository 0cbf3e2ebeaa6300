//! Driving port for registration, login and profile lookup.
//!
//! Inbound adapters call this port without knowing which user store or
//! password hasher backs it, so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account. A taken email yields [`crate::domain::ErrorCode::Conflict`].
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials. Unknown emails and wrong passwords both yield the
    /// same [`crate::domain::ErrorCode::Unauthorized`] error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Load the profile for an authenticated user id.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}
