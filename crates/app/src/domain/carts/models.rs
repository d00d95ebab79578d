//! Cart Models

use jiff::Timestamp;

use crate::{domain::products::models::ProductUuid, uuids::TypedUuid};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Model
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,
    /// Merchandise subtotal in minor units, valued by the pricing core.
    pub subtotal: u64,
    pub items: Vec<CartItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Cart Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCart {
    pub uuid: CartUuid,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// CartItem Model
#[derive(Debug, Clone)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    /// Unit price in minor units, captured from the product when added.
    pub unit_price: u64,
    pub quantity: u32,
    /// Weeks between deliveries when the line is a subscription.
    pub subscription_weeks: Option<u32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Cart Item Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub subscription_weeks: Option<u32>,
}
