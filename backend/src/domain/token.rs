//! Signed bearer tokens.

use std::fmt;

use chrono::{DateTime, Utc};

/// Reasons a bearer token is rejected or cannot be issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Not a decodable token, or its claims are unusable.
    #[error("token is malformed")]
    Malformed,
    /// Signature does not match the server secret.
    #[error("token signature is invalid")]
    BadSignature,
    /// The expiry instant has passed.
    #[error("token has expired")]
    Expired,
    /// Header names an algorithm other than the one tokens are issued with.
    #[error("token uses an unexpected signing algorithm")]
    UnexpectedAlgorithm,
    /// Encoding a fresh token failed.
    #[error("failed to sign token: {message}")]
    Signing { message: String },
}

/// Freshly issued bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Encoded token string handed to the client.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Instant after which the token is rejected.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
