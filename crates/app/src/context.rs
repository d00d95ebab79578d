//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        coupons::{CouponsService, PgCouponsService},
        loyalty::{LoyaltyService, PgLoyaltyService},
        messages::{MessagesService, PgMessagesService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        shipping::{PgShippingService, ShippingService},
        subscriptions::{PgSubscriptionsService, SubscriptionsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub coupons: Arc<dyn CouponsService>,
    pub loyalty: Arc<dyn LoyaltyService>,
    pub shipping: Arc<dyn ShippingService>,
    pub messages: Arc<dyn MessagesService>,
    pub subscriptions: Arc<dyn SubscriptionsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// Whether row-level security applies depends on the connecting role:
    /// the storefront deploys with a plain app role, the back office with
    /// the table owner.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            loyalty: Arc::new(PgLoyaltyService::new(db.clone())),
            shipping: Arc::new(PgShippingService::new(db.clone())),
            messages: Arc::new(PgMessagesService::new(db.clone())),
            subscriptions: Arc::new(PgSubscriptionsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db)),
        })
    }
}
