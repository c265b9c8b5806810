/// Service error taxonomy
///
/// Every service operation fails with one of these variants; the HTTP layer
/// maps them onto status codes (400, 404, 409, 500).

use crate::models::user::EMAIL_UNIQUE_CONSTRAINT;
use thiserror::Error;

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// Unexpected database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        // A concurrent insert can slip past the explicit email lookup; the
        // unique constraint still reports it as a conflict.
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
                return ServiceError::Conflict("Email already exists".to_string());
            }
        }

        ServiceError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServiceError::Validation("Title is required".to_string());
        assert_eq!(err.to_string(), "Title is required");

        let err = ServiceError::Database(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Database error"));
    }

    #[test]
    fn test_non_constraint_errors_are_database_errors() {
        let err = ServiceError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, ServiceError::Database(_)));
    }
}
