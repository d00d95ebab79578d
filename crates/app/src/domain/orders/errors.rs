//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{coupons::errors::CouponRejection, orders::models::OrderStatus};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// Checkout of an empty cart; detected before any write.
    #[error("the cart is empty")]
    EmptyCart,

    /// A required shipping address field is blank.
    #[error("shipping address is missing {0}")]
    MissingAddressField(&'static str),

    /// The coupon failed server-side re-validation or was exhausted by a
    /// concurrent order.
    #[error("coupon rejected: {0}")]
    CouponRejected(CouponRejection),

    /// The requested redemption exceeds the live balance, whether from a
    /// stale client or a concurrent spend.
    #[error("not enough points for the requested redemption")]
    InsufficientPoints,

    /// The requested fulfilment move is not allowed.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// An order with this UUID already exists; a replayed placement lands
    /// here instead of charging twice.
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("cart valuation failed")]
    Valuation(#[source] orchard::carts::CartError),

    #[error("quote computation failed")]
    Pricing(#[source] orchard::quote::QuoteError),

    #[error("invalid delivery schedule")]
    Schedule(#[source] jiff::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
