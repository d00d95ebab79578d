//! Shipping Method Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Shipping Method UUID
pub type ShippingMethodUuid = TypedUuid<ShippingMethod>;

/// Shipping Method Model
#[derive(Debug, Clone)]
pub struct ShippingMethod {
    pub uuid: ShippingMethodUuid,
    pub name: String,
    /// Flat cost in minor units, added after discounting.
    pub price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Shipping Method Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewShippingMethod {
    pub uuid: ShippingMethodUuid,
    pub name: String,
    pub price: u64,
}
