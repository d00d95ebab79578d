//! Shipping Methods

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub(crate) use repository::PgShippingRepository;

pub use errors::ShippingServiceError;
pub use service::*;
