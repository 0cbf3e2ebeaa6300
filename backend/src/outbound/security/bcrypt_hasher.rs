//! bcrypt-backed [`PasswordHasher`].
//!
//! bcrypt is deliberately slow, so hashing and verification run on the
//! Tokio blocking pool with the caller's tracing span re-entered.

use async_trait::async_trait;
use tracing::Span;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Password hasher using bcrypt with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the given cost. bcrypt accepts 4 to 31.
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

async fn run_blocking<T, F>(
    job: F,
    on_join_error: fn(String) -> PasswordHashError,
) -> Result<T, PasswordHashError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PasswordHashError> + Send + 'static,
{
    let span = Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(job))
        .await
        .map_err(|err| on_join_error(format!("blocking task failed: {err}")))?
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        run_blocking(
            move || {
                bcrypt::hash(password.as_bytes(), cost)
                    .map(PasswordHash::new)
                    .map_err(|err| PasswordHashError::hash(err.to_string()))
            },
            |message| PasswordHashError::hash(message),
        )
        .await
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        run_blocking(
            move || {
                bcrypt::verify(password.as_bytes(), &encoded)
                    .map_err(|err| PasswordHashError::verify(err.to_string()))
            },
            |message| PasswordHashError::verify(message),
        )
        .await
    }
}
