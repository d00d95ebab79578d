//! Seed helpers for service-level tests.

use jiff::Timestamp;

use crate::domain::{
    carts::{
        CartsService, CartsServiceError,
        models::{CartItemUuid, CartUuid, NewCart, NewCartItem},
    },
    coupons::{
        CouponsService, CouponsServiceError,
        models::{CouponKind, CouponUuid, NewCoupon},
    },
    orders::models::ShippingAddress,
    products::{
        ProductsService, ProductsServiceError,
        models::{NewProduct, Product, ProductUuid},
    },
    shipping::{
        ShippingService, ShippingServiceError,
        models::{NewShippingMethod, ShippingMethodUuid},
    },
    subscriptions::{
        PgSubscriptionsRepository, SubscriptionsServiceError,
        models::{NewSubscription, SubscriptionUuid},
        service::delivery_after,
    },
};

use super::TestContext;

impl TestContext {
    /// A complete, valid shipping address.
    pub(crate) fn address(&self) -> ShippingAddress {
        ShippingAddress {
            recipient: "Ada Lovelace".to_string(),
            phone: "555-0100".to_string(),
            line1: "12 Analytical Way".to_string(),
            line2: None,
            city: "Portland".to_string(),
            region: "OR".to_string(),
            postal_code: "97201".to_string(),
        }
    }

    pub(crate) async fn seed_product(
        &self,
        name: &str,
        price: u64,
    ) -> Result<ProductUuid, ProductsServiceError> {
        let product = self
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: name.to_string(),
                price,
            })
            .await?;

        Ok(product.uuid)
    }

    pub(crate) async fn seed_cart(&self) -> Result<CartUuid, CartsServiceError> {
        let cart = self
            .carts
            .create_cart(
                self.user,
                NewCart {
                    uuid: CartUuid::new(),
                },
            )
            .await?;

        Ok(cart.uuid)
    }

    pub(crate) async fn seed_cart_with_item(
        &self,
        product: ProductUuid,
        quantity: u32,
        subscription_weeks: Option<u32>,
    ) -> Result<CartUuid, CartsServiceError> {
        let cart = self.seed_cart().await?;

        self.carts
            .add_item(
                self.user,
                cart,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: product,
                    quantity,
                    subscription_weeks,
                },
            )
            .await?;

        Ok(cart)
    }

    /// A coupon payload with open validity; callers tweak fields before
    /// creating it when a test needs limits.
    pub(crate) fn new_coupon(&self, code: &str, kind: CouponKind, value: u32) -> NewCoupon {
        NewCoupon {
            uuid: CouponUuid::new(),
            code: code.to_string(),
            kind,
            value,
            starts_at: None,
            expires_at: None,
            max_uses: None,
            minimum_order: None,
        }
    }

    pub(crate) async fn seed_coupon(
        &self,
        code: &str,
        kind: CouponKind,
        value: u32,
    ) -> Result<CouponUuid, CouponsServiceError> {
        let coupon = self
            .coupons
            .create_coupon(self.new_coupon(code, kind, value))
            .await?;

        Ok(coupon.uuid)
    }

    pub(crate) async fn seed_shipping_method(
        &self,
        name: &str,
        price: u64,
    ) -> Result<ShippingMethodUuid, ShippingServiceError> {
        let method = self
            .shipping
            .create_method(NewShippingMethod {
                uuid: ShippingMethodUuid::new(),
                name: name.to_string(),
                price,
            })
            .await?;

        Ok(method.uuid)
    }

    /// Seeds an active subscription for the acting shopper directly through
    /// the repository, as order placement would.
    pub(crate) async fn seed_subscription(
        &self,
        product: ProductUuid,
        frequency_weeks: u32,
    ) -> Result<SubscriptionUuid, SubscriptionsServiceError> {
        let mut tx = self.app_db.begin_user_transaction(self.user).await?;

        let next_delivery_at = delivery_after(Timestamp::now(), frequency_weeks)
            .map_err(SubscriptionsServiceError::Schedule)?;

        let subscription = PgSubscriptionsRepository::new()
            .create_subscription(
                &mut tx,
                NewSubscription {
                    uuid: SubscriptionUuid::new(),
                    product_uuid: product,
                    frequency_weeks,
                    next_delivery_at,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(subscription.uuid)
    }

    /// Fetch a product back; convenience for assertions.
    #[allow(dead_code)]
    pub(crate) async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<Product, ProductsServiceError> {
        self.products.get_product(product, Timestamp::now()).await
    }
}
