//! Subscription Models

use jiff::Timestamp;

use crate::{domain::products::models::ProductUuid, uuids::TypedUuid};

/// Subscription UUID
pub type SubscriptionUuid = TypedUuid<Subscription>;

/// Subscription lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    Paused,
    /// Terminal.
    Cancelled,
}

impl SubscriptionStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Subscription Model
///
/// Created at checkout from a recurring cart line, then lives its own life;
/// the originating order holds no lien on it.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub uuid: SubscriptionUuid,
    pub product_uuid: ProductUuid,
    pub frequency_weeks: u32,
    pub status: SubscriptionStatus,
    pub next_delivery_at: Timestamp,
    /// Delivery dates the shopper chose to skip, oldest first.
    pub skipped_deliveries: Vec<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Subscription Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub uuid: SubscriptionUuid,
    pub product_uuid: ProductUuid,
    pub frequency_weeks: u32,
    pub next_delivery_at: Timestamp,
}
