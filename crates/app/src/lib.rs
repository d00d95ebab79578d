//! Shared application domain and persistence modules for the Orchard
//! storefront: catalog, carts, coupons, loyalty points, orders,
//! subscriptions and back-office messages over PostgreSQL.

pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod uuids;
