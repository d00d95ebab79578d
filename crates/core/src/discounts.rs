//! Discounts
//!
//! Coupon discount calculation shared by the cart preview and checkout.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// The value carried by a coupon.
#[derive(Debug, Copy, Clone)]
pub enum CouponValue<'a> {
    /// Take a percentage off the merchandise subtotal (e.g. "10% off").
    PercentageOff(Percentage),

    /// Take a fixed amount off the merchandise subtotal (e.g. "$5 off").
    AmountOff(Money<'a, Currency>),
}

/// Calculates the discount a coupon contributes against a subtotal.
///
/// A percentage coupon yields `subtotal × p`, rounded to minor units. A
/// fixed coupon yields its face value clamped to the subtotal, so a coupon
/// can never discount more merchandise value than exists.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] when the percentage product
/// cannot be represented in minor units.
pub fn coupon_discount<'a>(
    value: &CouponValue<'a>,
    subtotal: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, DiscountError> {
    match value {
        CouponValue::PercentageOff(percent) => {
            let minor = percent_of_minor(percent, subtotal.to_minor_units())?;

            Ok(Money::from_minor(minor, subtotal.currency()))
        }
        CouponValue::AmountOff(amount) => {
            if amount.to_minor_units() >= subtotal.to_minor_units() {
                Ok(*subtotal)
            } else {
                Ok(*amount)
            }
        }
    }
}

/// Calculates a percentage of a minor-unit amount, rounded half away from
/// zero at the minor-unit boundary.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] when the calculation
/// overflows or cannot be represented as minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // recover the ratio as a plain Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percentage_coupon_takes_a_share_of_the_subtotal() -> TestResult {
        let value = CouponValue::PercentageOff(Percentage::from(0.1));
        let subtotal = Money::from_minor(1000_00, USD);

        assert_eq!(
            coupon_discount(&value, &subtotal)?,
            Money::from_minor(100_00, USD)
        );

        Ok(())
    }

    #[test]
    fn percentage_discount_rounds_midpoint_away_from_zero() -> TestResult {
        // 10% of $0.05 is half a cent; rounds up to a whole cent.
        let value = CouponValue::PercentageOff(Percentage::from(0.1));
        let subtotal = Money::from_minor(5, USD);

        assert_eq!(coupon_discount(&value, &subtotal)?, Money::from_minor(1, USD));

        Ok(())
    }

    #[test]
    fn fixed_coupon_below_subtotal_applies_in_full() -> TestResult {
        let value = CouponValue::AmountOff(Money::from_minor(5_00, USD));
        let subtotal = Money::from_minor(20_00, USD);

        assert_eq!(coupon_discount(&value, &subtotal)?, Money::from_minor(5_00, USD));

        Ok(())
    }

    #[test]
    fn fixed_coupon_clamps_to_the_subtotal() -> TestResult {
        let value = CouponValue::AmountOff(Money::from_minor(100_00, USD));
        let subtotal = Money::from_minor(50_00, USD);

        assert_eq!(coupon_discount(&value, &subtotal)?, subtotal);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let percent = Percentage::from(2.0);
        let result = percent_of_minor(&percent, i64::MAX);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));
    }

    #[test]
    fn percent_of_minor_calculates_correctly() -> TestResult {
        let percent = Percentage::from(0.25);

        assert_eq!(percent_of_minor(&percent, 200)?, 50);

        Ok(())
    }
}
