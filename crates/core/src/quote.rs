//! Checkout Quotes
//!
//! A quote composes the coupon and loyalty-point discounts over a
//! merchandise subtotal. The same computation backs the cart preview and
//! order placement, so the number a shopper previews is the number they
//! are charged.
//!
//! Discounts apply to the merchandise subtotal only; shipping is added
//! after discounting and is never reduced.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::discounts::{CouponValue, DiscountError, coupon_discount};

/// Minor units per loyalty point: one point is worth one major currency unit.
const POINT_VALUE_MINOR: i64 = 100;

/// Errors raised while computing a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Shipping priced in a different currency than the subtotal.
    #[error("shipping has currency {0}, but the subtotal has currency {1}")]
    ShippingCurrencyMismatch(&'static str, &'static str),

    /// The requested points do not fit in minor units.
    #[error("points value overflows the representable amount")]
    PointsOverflow,

    /// Errors bubbled up from coupon discount calculation.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// The priced breakdown of a checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote<'a> {
    /// Merchandise subtotal before any discount.
    pub subtotal: Money<'a, Currency>,

    /// Shipping cost, never discounted.
    pub shipping: Money<'a, Currency>,

    /// Discount contributed by the coupon, clamped to the subtotal.
    pub coupon_discount: Money<'a, Currency>,

    /// Discount contributed by redeemed points, capped by what the coupon
    /// left of the subtotal.
    pub points_discount: Money<'a, Currency>,

    /// Amount payable: `subtotal + shipping − discounts`, floored at zero.
    pub total: Money<'a, Currency>,
}

impl<'a> Quote<'a> {
    /// Composes coupon and points discounts into a payable total.
    ///
    /// The coupon applies first; points then redeem one major currency unit
    /// each against whatever merchandise value the coupon left, so
    /// `coupon_discount + points_discount` never exceeds the subtotal.
    /// Validating the caller's point balance is the service boundary's
    /// concern; this computation only caps against remaining merchandise
    /// value.
    ///
    /// # Errors
    ///
    /// Returns a [`QuoteError`] when the shipping currency differs from the
    /// subtotal currency or an underlying calculation cannot be represented.
    pub fn compute(
        subtotal: Money<'a, Currency>,
        shipping: Money<'a, Currency>,
        coupon: Option<&CouponValue<'a>>,
        points_to_use: u32,
    ) -> Result<Self, QuoteError> {
        let currency = subtotal.currency();

        if shipping.currency() != currency {
            return Err(QuoteError::ShippingCurrencyMismatch(
                shipping.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        let coupon_discount = match coupon {
            Some(value) => coupon_discount(value, &subtotal)?,
            None => Money::from_minor(0, currency),
        };

        let remaining_merchandise = subtotal
            .to_minor_units()
            .saturating_sub(coupon_discount.to_minor_units())
            .max(0);

        let points_minor = i64::from(points_to_use)
            .checked_mul(POINT_VALUE_MINOR)
            .ok_or(QuoteError::PointsOverflow)?;

        let points_discount = Money::from_minor(points_minor.min(remaining_merchandise), currency);

        let total_minor = subtotal
            .to_minor_units()
            .saturating_add(shipping.to_minor_units())
            .saturating_sub(coupon_discount.to_minor_units())
            .saturating_sub(points_discount.to_minor_units())
            .max(0);

        Ok(Self {
            subtotal,
            shipping,
            coupon_discount,
            points_discount,
            total: Money::from_minor(total_minor, currency),
        })
    }
}
