//! Coupons

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub(crate) use repository::PgCouponsRepository;

pub use errors::{CouponRejection, CouponsServiceError};
pub use service::*;
