//! Storage failure taxonomy and its translation into domain errors.
//!
//! Adapters classify every Diesel or pool failure as a [`StorageError`].
//! Crossing into the domain, `NotFound` keeps its kind so services can decide
//! whether to re-map it; everything else becomes an opaque `Internal` error
//! and the driver text is only logged.

use tracing::debug;

use super::pool::PoolError;
use crate::domain::Error;

/// Failures raised by persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("{entity} violates a unique constraint")]
    Conflict { entity: &'static str },
    #[error("database connection error: {message}")]
    Connection { message: String },
    #[error("database query error: {message}")]
    Query { message: String },
}

impl StorageError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn conflict(entity: &'static str) -> Self {
        Self::Conflict { entity }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Classify a Diesel error raised while reading or writing `entity`.
    pub fn from_diesel(entity: &'static str, error: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match error {
            DieselError::NotFound => Self::not_found(entity),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                Self::conflict(entity)
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                Self::connection(info.message().to_owned())
            }
            DieselError::DatabaseError(kind, info) => {
                Self::query(format!("{kind:?}: {}", info.message()))
            }
            other => Self::query(other.to_string()),
        }
    }
}

impl From<PoolError> for StorageError {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::connection(message)
            }
        }
    }
}

impl From<StorageError> for Error {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound { entity } => Self::not_found(format!("{entity} not found")),
            StorageError::Conflict { entity } => {
                debug!(entity, "unique constraint violated");
                Self::bad_request(format!("{entity} already exists"))
            }
            StorageError::Connection { ref message } | StorageError::Query { ref message } => {
                debug!(%message, "storage failure hidden behind internal error");
                Self::opaque_internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, INTERNAL_MESSAGE};
    use rstest::rstest;

    #[rstest]
    fn missing_rows_keep_not_found_kind() {
        let err = Error::from(StorageError::from_diesel("photo", diesel::result::Error::NotFound));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "photo not found");
    }

    #[rstest]
    #[case(StorageError::connection("connection refused on 10.0.0.3:5432"))]
    #[case(StorageError::query("relation \"photos\" does not exist"))]
    #[case(StorageError::from(PoolError::checkout("timed out")))]
    fn infrastructure_failures_become_opaque(#[case] storage: StorageError) {
        let err = Error::from(storage);
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), INTERNAL_MESSAGE);
    }

    #[rstest]
    fn conflicts_are_bad_requests() {
        let err = Error::from(StorageError::conflict("user"));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "user already exists");
    }

    #[rstest]
    fn rollback_errors_are_query_failures() {
        let storage = StorageError::from_diesel("task", diesel::result::Error::RollbackTransaction);
        assert!(matches!(storage, StorageError::Query { .. }));
    }
}
