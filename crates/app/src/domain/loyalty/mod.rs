//! Loyalty Points

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub(crate) use repository::PgLoyaltyRepository;

pub use errors::LoyaltyServiceError;
pub use service::*;
