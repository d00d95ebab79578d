//! Back-office Messages

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::MessagesServiceError;
pub use service::*;
