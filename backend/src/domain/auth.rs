//! Credential payloads for registration and login.
//!
//! Both types validate their inputs on construction and keep the plaintext
//! password in a [`Zeroizing`] buffer so it is wiped when dropped. Their
//! `Debug` output never includes the password.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserValidationError};

/// Longest password accepted, in bytes. bcrypt ignores everything past it.
pub const PASSWORD_MAX_BYTES: usize = 72;

/// Field-level validation failure for credential payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at most {max} bytes")]
    PasswordTooLong { max: usize },
}

impl CredentialsValidationError {
    /// Name of the offending request field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyEmail | Self::EmailTooLong { .. } => "email",
            Self::EmptyPassword | Self::PasswordTooLong { .. } => "password",
        }
    }

    /// Machine-readable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
            Self::EmptyEmail => "empty_email",
            Self::EmailTooLong { .. } => "email_too_long",
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooLong { .. } => "password_too_long",
        }
    }
}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        match value {
            UserValidationError::DisplayNameTooLong { max } => Self::NameTooLong { max },
            UserValidationError::EmptyEmail => Self::EmptyEmail,
            UserValidationError::EmailTooLong { max } => Self::EmailTooLong { max },
            UserValidationError::EmptyDisplayName | UserValidationError::InvalidId => {
                Self::EmptyName
            }
        }
    }
}

fn password_from(raw: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if raw.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    if raw.len() > PASSWORD_MAX_BYTES {
        return Err(CredentialsValidationError::PasswordTooLong {
            max: PASSWORD_MAX_BYTES,
        });
    }
    Ok(Zeroizing::new(raw.to_owned()))
}

const REDACTED: &str = "[redacted]";

/// Login request: email plus plaintext password.
///
/// # Examples
/// ```
/// use flowboard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ALICE@example.com", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "alice@example.com");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: password_from(password)?,
        })
    }

    /// Normalised email used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password; keep the borrow short-lived.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Registration request: display name, email and plaintext password.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration fields in request order.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            name: DisplayName::new(name)?,
            email: EmailAddress::new(email)?,
            password: password_from(password)?,
        })
    }

    /// Validated display name.
    #[must_use]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Normalised email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password; keep the borrow short-lived.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}
