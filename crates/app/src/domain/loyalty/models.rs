//! Loyalty Models

use jiff::Timestamp;

use crate::domain::users::UserUuid;

/// Loyalty Account Model
///
/// One row per shopper; a missing row reads as a zero balance.
#[derive(Debug, Clone)]
pub struct LoyaltyAccount {
    pub user_uuid: UserUuid,
    pub points: u64,
    /// Lifetime points redeemed against orders.
    pub points_spent: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
