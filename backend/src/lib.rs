//! Flowboard backend: multi-tenant notes behind bearer-token auth.
//!
//! The crate follows a hexagonal layout. [`domain`] holds validated types,
//! workflows and ports; [`inbound`] adapts HTTP onto the driving ports and
//! [`outbound`] implements the driven ports over PostgreSQL, memory, bcrypt
//! and JWT.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
