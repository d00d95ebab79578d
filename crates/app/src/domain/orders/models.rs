//! Order Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;

use crate::{
    domain::{
        carts::models::CartUuid, products::models::ProductUuid,
        shipping::models::ShippingMethodUuid, users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Order fulfilment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    /// Terminal; only reachable before shipment.
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether fulfilment may move from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Shipping address captured verbatim onto the order.
///
/// A snapshot, not a reference: later edits to a saved address must not
/// rewrite where an already-placed order was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    pub recipient: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
}

impl ShippingAddress {
    /// The first required field that is blank, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("recipient", &self.recipient),
            ("line1", &self.line1),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
        ]
        .into_iter()
        .find_map(|(name, value)| value.trim().is_empty().then_some(name))
    }
}

/// Order Model
///
/// Financial fields are immutable after creation; only `status` moves.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub subtotal: u64,
    pub shipping: u64,
    pub coupon_discount: u64,
    pub points_discount: u64,
    pub total: u64,
    pub coupon_code: Option<String>,
    pub points_redeemed: u32,
    pub shipping_method_uuid: ShippingMethodUuid,
    pub address: ShippingAddress,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Model
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    /// Unit price at purchase, in minor units.
    pub unit_price: u64,
    pub quantity: u32,
    pub subscription_weeks: Option<u32>,
    pub created_at: Timestamp,
}

/// Place Order Model
///
/// The order UUID is client-generated: replaying the same placement maps
/// onto the same primary key instead of creating a second order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    pub order_uuid: OrderUuid,
    pub cart: CartUuid,
    pub user_email: String,
    pub address: ShippingAddress,
    pub shipping_method: ShippingMethodUuid,
    pub coupon_code: Option<String>,
    pub points_to_use: u32,
}
