//! Domain ports: the traits adapters implement or call across the
//! hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod page_repository;
mod pages_command;
mod pages_query;
mod password_hasher;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::AccountService;
#[cfg(test)]
pub use page_repository::MockPageRepository;
pub use page_repository::{PagePersistenceError, PageRepository};
#[cfg(test)]
pub use pages_command::MockPagesCommand;
pub use pages_command::PagesCommand;
#[cfg(test)]
pub use pages_query::MockPagesQuery;
pub use pages_query::PagesQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::TokenService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
