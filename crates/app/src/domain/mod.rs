//! Orchard Domain Concerns

use rusty_money::iso;

/// The storefront trades in a single currency.
pub const STORE_CURRENCY: &iso::Currency = iso::USD;

pub mod carts;
pub mod coupons;
pub mod loyalty;
pub mod messages;
pub mod orders;
pub mod products;
pub mod shipping;
pub mod subscriptions;
pub mod users;
