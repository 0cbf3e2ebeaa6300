//! Port for issuing and verifying signed bearer tokens.

use crate::domain::{AccessToken, TokenError, UserId};

/// Signs and checks bearer tokens bound to a user id.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token whose subject is `subject`.
    fn issue(&self, subject: UserId) -> Result<AccessToken, TokenError>;

    /// Check signature, algorithm and expiry, returning the subject.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
