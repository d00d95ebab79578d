//! Messages service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessagesServiceError {
    #[error("message already exists")]
    AlreadyExists,

    #[error("message not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for MessagesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(_) | None => Self::Sql(error),
        }
    }
}
