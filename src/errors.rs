use diesel::result::{ConnectionError, DatabaseErrorKind};
use thiserror::Error;

/// Failures surfaced by the student record operations.
#[derive(Error, Debug)]
pub enum StudentError {
    /// Storage could not be reached at startup.
    #[error("could not connect to the database: {0}")]
    ConnectionFailure(#[from] ConnectionError),

    /// A write collided with the unique email constraint.
    #[error("email already exists in the database")]
    DuplicateKey { message: String },

    /// Caller-supplied text could not be coerced to the column type.
    #[error("invalid {field}: {value:?}")]
    InvalidInput { field: &'static str, value: String },

    #[error("no student found with ID: {0}")]
    NotFound(i32),

    /// Any other backend failure, carrying the driver's message.
    #[error("database error: {0}")]
    StorageError(diesel::result::Error),
}

impl From<diesel::result::Error> for StudentError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StudentError::DuplicateKey {
                    message: info.message().to_string(),
                }
            }
            other => StudentError::StorageError(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StudentError>;
