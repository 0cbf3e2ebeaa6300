//! Outbound adapters implementing the domain ports.
//!
//! - **persistence**: PostgreSQL stores using Diesel and a bb8 pool
//! - **memory**: mutex-guarded stores for development runs and tests
//! - **security**: bcrypt password hashing and HS256 bearer tokens
//!
//! Adapters translate between domain records and infrastructure types and
//! contain no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
