//! PostgreSQL persistence adapters using Diesel with `diesel-async` and a
//! bb8 connection pool.
//!
//! Row structs and table definitions stay private to this module; the
//! repositories translate them into domain records and map Diesel failures
//! onto the port error types.

mod diesel_error_mapping;
mod diesel_page_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_page_repository::DieselPageRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
