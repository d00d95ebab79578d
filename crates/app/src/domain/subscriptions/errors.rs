//! Subscriptions service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubscriptionsServiceError {
    #[error("subscription not found")]
    NotFound,

    #[error("subscription is not active")]
    NotActive,

    #[error("subscription is not paused")]
    NotPaused,

    #[error("subscription is already cancelled")]
    AlreadyCancelled,

    #[error("related resource not found")]
    InvalidReference,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid delivery schedule")]
    Schedule(#[source] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SubscriptionsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(_) | None => Self::Sql(error),
        }
    }
}
