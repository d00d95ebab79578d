//! Integration test walking a full checkout pricing flow: cart valuation
//! through discount composition, covering the stacking behaviors the
//! storefront depends on.
//!
//! Walkthrough of the main scenario:
//!
//! 1. Cart: 2 × $12.50 coffee (4-weekly subscription) + 1 × $475.00 brewer
//!    - Subtotal: $500.00 (50000 cents)
//! 2. Coupon `WELCOME20`, 20% off -> $100.00 coupon discount
//! 3. 450 loyalty points requested -> capped to the $400.00 of merchandise
//!    the coupon left
//! 4. Shipping $7.50 is added after discounting and is never reduced
//!
//! Expected total: $0.00 + $7.50 shipping = $7.50 (750 cents)

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use orchard::{
    carts::Cart,
    discounts::CouponValue,
    items::{LineItem, Recurrence},
    quote::Quote,
};

#[test]
fn coupon_and_points_stack_against_merchandise_only() -> TestResult {
    let cart = Cart::with_lines(
        [
            LineItem::recurring(
                Money::from_minor(12_50, USD),
                2,
                Recurrence::every_weeks(4)?,
            )?,
            LineItem::new(Money::from_minor(475_00, USD), 1)?,
        ],
        USD,
    )?;

    let subtotal = cart.subtotal()?;
    assert_eq!(subtotal, Money::from_minor(500_00, USD));

    let coupon = CouponValue::PercentageOff(Percentage::from(0.2));
    let quote = Quote::compute(subtotal, Money::from_minor(7_50, USD), Some(&coupon), 450)?;

    assert_eq!(quote.coupon_discount, Money::from_minor(100_00, USD));
    assert_eq!(quote.points_discount, Money::from_minor(400_00, USD));
    assert_eq!(quote.total, Money::from_minor(7_50, USD));

    Ok(())
}

#[test]
fn ten_percent_off_a_thousand_dollar_cart() -> TestResult {
    let cart = Cart::with_lines([LineItem::new(Money::from_minor(250_00, USD), 4)?], USD)?;

    let coupon = CouponValue::PercentageOff(Percentage::from(0.1));
    let quote = Quote::compute(cart.subtotal()?, Money::from_minor(0, USD), Some(&coupon), 0)?;

    assert_eq!(quote.coupon_discount, Money::from_minor(100_00, USD));
    assert_eq!(quote.total, Money::from_minor(900_00, USD));

    Ok(())
}

#[test]
fn fixed_coupon_larger_than_the_cart_zeroes_the_merchandise() -> TestResult {
    let cart = Cart::with_lines([LineItem::new(Money::from_minor(50_00, USD), 1)?], USD)?;

    let coupon = CouponValue::AmountOff(Money::from_minor(100_00, USD));
    let quote = Quote::compute(cart.subtotal()?, Money::from_minor(4_99, USD), Some(&coupon), 0)?;

    assert_eq!(quote.coupon_discount, Money::from_minor(50_00, USD));
    assert_eq!(quote.total, Money::from_minor(4_99, USD));

    Ok(())
}

#[test]
fn preview_and_checkout_agree_by_construction() -> TestResult {
    // The drawer preview and order placement both call Quote::compute with
    // the same inputs; there is no second formula to drift.
    let coupon = CouponValue::PercentageOff(Percentage::from(0.15));
    let subtotal = Money::from_minor(88_40, USD);
    let shipping = Money::from_minor(5_00, USD);

    let preview = Quote::compute(subtotal, shipping, Some(&coupon), 12)?;
    let checkout = Quote::compute(subtotal, shipping, Some(&coupon), 12)?;

    assert_eq!(preview, checkout);

    Ok(())
}
