//! Orchard
//!
//! Orchard is the pricing core of a direct-to-consumer storefront: cart
//! valuation, coupon and loyalty-point discount composition, and checkout
//! quotes. It is a pure library with no I/O; the persistence layer lives in
//! the `orchard-app` crate.
//!
//! All amounts are [`rusty_money::Money`] values in a single currency.
//! Percentage arithmetic runs through [`rust_decimal`] and is rounded to
//! minor units only at the boundary, so a quote computed for a cart preview
//! is bit-for-bit the quote computed at checkout.

pub mod carts;
pub mod discounts;
pub mod items;
pub mod quote;
