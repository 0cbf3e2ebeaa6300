//! Classification of Diesel failures shared by the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse failure category a repository maps onto its own port error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// The connection dropped mid-operation.
    Connection,
    /// Any other query failure, with a client-safe summary.
    Query(&'static str),
}

impl DieselFailure {
    /// Summary text for the port error. Never includes SQL or row data.
    pub(crate) fn message(self) -> &'static str {
        match self {
            Self::UniqueViolation => "unique constraint violated",
            Self::Connection => "database connection error",
            Self::Query(message) => message,
        }
    }
}

/// Log and classify a Diesel error.
pub(crate) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => DieselFailure::Connection,
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            DieselFailure::Query("database row conversion error")
        }
        _ => DieselFailure::Query("database error"),
    }
}
