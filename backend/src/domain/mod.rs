//! Domain primitives, workflows and ports.
//!
//! Everything here is transport agnostic. Inbound adapters translate
//! requests into the validated types below and outbound adapters implement
//! the traits in [`ports`].

pub mod accounts;
pub mod auth;
pub mod error;
pub mod page;
pub mod pages;
pub mod ports;
pub mod token;
pub mod user;

pub use self::accounts::{AccountServiceImpl, INVALID_CREDENTIALS_MESSAGE};
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MAX_BYTES, Registration,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::page::{NewPage, PAGE_TITLE_MAX, Page, PageDraft, PageId, PageValidationError};
pub use self::pages::PageService;
pub use self::token::{AccessToken, TokenError};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EMAIL_MAX, EmailAddress, NewUserAccount, PasswordHash, User,
    UserAccount, UserId, UserValidationError,
};
