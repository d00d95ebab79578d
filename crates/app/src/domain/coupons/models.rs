//! Coupon Models

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rusty_money::Money;

use orchard::discounts::CouponValue;

use crate::{domain::STORE_CURRENCY, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<Coupon>;

/// How a coupon's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponKind {
    /// `value` is a whole percentage, 1–100.
    Percentage,

    /// `value` is a fixed amount in minor units.
    Fixed,
}

impl CouponKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "percentage" => Some(Self::Percentage),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Coupon Model
#[derive(Debug, Clone)]
pub struct Coupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub kind: CouponKind,
    pub value: u32,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub max_uses: Option<u32>,
    pub used_count: u32,
    /// Minimum merchandise subtotal, in minor units, for the coupon to apply.
    pub minimum_order: Option<u64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Coupon {
    /// The coupon's value as the pricing core sees it.
    #[must_use]
    pub fn discount_value(&self) -> CouponValue<'static> {
        match self.kind {
            CouponKind::Percentage => {
                CouponValue::PercentageOff(Percentage::from(f64::from(self.value) / 100.0))
            }
            CouponKind::Fixed => {
                CouponValue::AmountOff(Money::from_minor(i64::from(self.value), STORE_CURRENCY))
            }
        }
    }
}

/// New Coupon Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub kind: CouponKind,
    pub value: u32,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub max_uses: Option<u32>,
    pub minimum_order: Option<u64>,
}

/// A coupon read for redemption, with the assignment facts needed to
/// decide applicability for one shopper.
#[derive(Debug, Clone)]
pub struct RedeemableCoupon {
    pub coupon: Coupon,
    /// The coupon has at least one assignment row, so it is reserved.
    pub assigned_only: bool,
    /// The acting shopper's email is among the assignments.
    pub assigned_to_user: bool,
}
