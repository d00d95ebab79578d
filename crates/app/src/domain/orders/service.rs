//! Orders service.
//!
//! Order placement runs as one transaction spanning the order row, its
//! items, coupon consumption, the points debit and credit, subscription
//! creation and cart clearing. Any failure rolls the whole placement back;
//! an order row can never exist without its bookkeeping.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rusty_money::Money;
use tracing::{Span, info};

use orchard::quote::Quote;

use crate::{
    database::Db,
    domain::{
        STORE_CURRENCY,
        carts::{
            PgCartItemsRepository, PgCartsRepository, models::CartItem,
            service::merchandise_subtotal,
        },
        coupons::{
            PgCouponsRepository,
            errors::CouponRejection,
            models::Coupon,
            service::check_applicability,
        },
        loyalty::PgLoyaltyRepository,
        orders::{
            errors::OrdersServiceError,
            models::{Order, OrderStatus, OrderUuid, PlaceOrder},
            repositories::{OrderTotals, PgOrderItemsRepository, PgOrdersRepository},
        },
        shipping::PgShippingRepository,
        subscriptions::{
            PgSubscriptionsRepository,
            models::{NewSubscription, SubscriptionUuid},
            service::delivery_after,
        },
        users::UserUuid,
    },
};

/// Loyalty points awarded per whole major currency unit paid.
const POINTS_PER_MAJOR_UNIT: u64 = 1;

fn minor_amount(money: &Money<'_, rusty_money::iso::Currency>) -> Result<u64, OrdersServiceError> {
    u64::try_from(money.to_minor_units()).map_err(|_e| OrdersServiceError::InvalidData)
}

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
    coupons_repository: PgCouponsRepository,
    loyalty_repository: PgLoyaltyRepository,
    subscriptions_repository: PgSubscriptionsRepository,
    shipping_repository: PgShippingRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            coupons_repository: PgCouponsRepository::new(),
            loyalty_repository: PgLoyaltyRepository::new(),
            subscriptions_repository: PgSubscriptionsRepository::new(),
            shipping_repository: PgShippingRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            user_uuid = %user,
            order_uuid = tracing::field::Empty,
            cart_uuid = tracing::field::Empty,
            coupon_code = tracing::field::Empty,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn place_order(
        &self,
        user: UserUuid,
        order: PlaceOrder,
    ) -> Result<Order, OrdersServiceError> {
        let span = Span::current();

        span.record("order_uuid", tracing::field::display(order.order_uuid));
        span.record("cart_uuid", tracing::field::display(order.cart));

        if let Some(field) = order.address.missing_field() {
            return Err(OrdersServiceError::MissingAddressField(field));
        }

        let now = Timestamp::now();
        let mut tx = self.db.begin_user_transaction(user).await?;

        // A replayed placement lands on the existing order instead of
        // charging twice; the primary key backs this up under concurrency.
        match self
            .orders_repository
            .get_order(&mut tx, order.order_uuid)
            .await
        {
            Ok(_) => return Err(OrdersServiceError::AlreadyExists),
            Err(sqlx::Error::RowNotFound) => {}
            Err(error) => return Err(error.into()),
        }

        let cart = match self.carts_repository.get_cart(&mut tx, order.cart, now).await {
            Ok(cart) => cart,
            Err(sqlx::Error::RowNotFound) => return Err(OrdersServiceError::InvalidReference),
            Err(error) => return Err(error.into()),
        };

        let items = self
            .cart_items_repository
            .get_cart_items(&mut tx, cart.uuid, now)
            .await?;

        if items.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let subtotal = merchandise_subtotal(&items).map_err(OrdersServiceError::Valuation)?;

        let shipping_method = match self
            .shipping_repository
            .get_method(&mut tx, order.shipping_method)
            .await
        {
            Ok(method) => method,
            Err(sqlx::Error::RowNotFound) => return Err(OrdersServiceError::InvalidReference),
            Err(error) => return Err(error.into()),
        };

        // Re-validate the coupon server-side; preview-time client state is
        // never trusted at placement.
        let coupon = match &order.coupon_code {
            Some(code) => Some(
                self.validate_for_placement(&mut tx, code, &order.user_email, subtotal, now)
                    .await?,
            ),
            None => None,
        };

        if let Some(code) = &order.coupon_code {
            span.record("coupon_code", tracing::field::display(code));
        }

        // An oversized redemption request is a stale or tampered client;
        // reject rather than silently clamp.
        if order.points_to_use > 0 {
            let balance = self
                .loyalty_repository
                .get_account(&mut tx, user)
                .await?
                .map(|account| account.points)
                .unwrap_or_default();

            if u64::from(order.points_to_use) > balance {
                return Err(OrdersServiceError::InsufficientPoints);
            }
        }

        let coupon_value = coupon.as_ref().map(Coupon::discount_value);

        let quote = Quote::compute(
            Money::from_minor(
                i64::try_from(subtotal).map_err(|_e| OrdersServiceError::InvalidData)?,
                STORE_CURRENCY,
            ),
            Money::from_minor(
                i64::try_from(shipping_method.price)
                    .map_err(|_e| OrdersServiceError::InvalidData)?,
                STORE_CURRENCY,
            ),
            coupon_value.as_ref(),
            order.points_to_use,
        )
        .map_err(OrdersServiceError::Pricing)?;

        let totals = OrderTotals {
            subtotal: minor_amount(&quote.subtotal)?,
            shipping: minor_amount(&quote.shipping)?,
            coupon_discount: minor_amount(&quote.coupon_discount)?,
            points_discount: minor_amount(&quote.points_discount)?,
            total: minor_amount(&quote.total)?,
        };

        span.record("total", tracing::field::display(totals.total));

        let mut created = self
            .orders_repository
            .create_order(
                &mut tx,
                order.order_uuid,
                totals,
                coupon.as_ref().map(|coupon| coupon.code.as_str()),
                order.points_to_use,
                shipping_method.uuid,
                &order.address,
            )
            .await?;

        for item in &items {
            let order_item = self
                .items_repository
                .create_order_item(
                    &mut tx,
                    created.uuid,
                    item.product_uuid,
                    item.unit_price,
                    item.quantity,
                    item.subscription_weeks,
                )
                .await?;

            created.items.push(order_item);
        }

        if let Some(coupon) = &coupon {
            let consumed = self
                .coupons_repository
                .consume_coupon(&mut tx, coupon.uuid)
                .await?;

            if consumed == 0 {
                // A concurrent order won the race for the last use.
                return Err(OrdersServiceError::CouponRejected(
                    CouponRejection::Exhausted,
                ));
            }

            self.coupons_repository
                .record_usage(&mut tx, coupon.uuid)
                .await?;
        }

        if order.points_to_use > 0 {
            let debited = self
                .loyalty_repository
                .debit_points(&mut tx, user, order.points_to_use)
                .await?;

            if debited == 0 {
                return Err(OrdersServiceError::InsufficientPoints);
            }
        }

        self.create_subscriptions(&mut tx, &items, now).await?;

        let points_awarded = points_for_total(totals.total);

        if points_awarded > 0 {
            self.loyalty_repository
                .credit_points(&mut tx, user, points_awarded)
                .await?;
        }

        self.carts_repository.clear_cart(&mut tx, cart.uuid).await?;
        self.cart_items_repository
            .clear_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        info!(order_uuid = %created.uuid, total = totals.total, "placed order");

        Ok(created)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut order = self.orders_repository.get_order(&mut tx, order).await?;

        let items = self
            .items_repository
            .get_order_items(&mut tx, order.uuid)
            .await?;

        tx.commit().await?;

        order.items = items;

        Ok(order)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let orders = self.orders_repository.list_orders(&mut tx).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_all_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders_repository.list_orders(&mut tx).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.get_order(&mut tx, order).await?;

        if !current.status.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let updated = self
            .orders_repository
            .set_status(&mut tx, order, status)
            .await?;

        tx.commit().await?;

        info!(order_uuid = %order, status = %status, "updated order status");

        Ok(updated)
    }
}

impl PgOrdersService {
    async fn validate_for_placement(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        code: &str,
        user_email: &str,
        subtotal: u64,
        now: Timestamp,
    ) -> Result<Coupon, OrdersServiceError> {
        let redeemable = self
            .coupons_repository
            .find_for_redemption(tx, code, user_email)
            .await?
            .ok_or(OrdersServiceError::CouponRejected(
                CouponRejection::UnknownCode,
            ))?;

        check_applicability(&redeemable, subtotal, now)
            .map_err(OrdersServiceError::CouponRejected)?;

        Ok(redeemable.coupon)
    }

    async fn create_subscriptions(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        items: &[CartItem],
        now: Timestamp,
    ) -> Result<(), OrdersServiceError> {
        for item in items {
            let Some(weeks) = item.subscription_weeks else {
                continue;
            };

            let next_delivery_at =
                delivery_after(now, weeks).map_err(OrdersServiceError::Schedule)?;

            self.subscriptions_repository
                .create_subscription(
                    tx,
                    NewSubscription {
                        uuid: SubscriptionUuid::new(),
                        product_uuid: item.product_uuid,
                        frequency_weeks: weeks,
                        next_delivery_at,
                    },
                )
                .await?;
        }

        Ok(())
    }
}

/// One point per whole major unit of the paid total.
fn points_for_total(total_minor: u64) -> u32 {
    let points = (total_minor / 100) * POINTS_PER_MAJOR_UNIT;

    u32::try_from(points).unwrap_or(u32::MAX)
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Finalise a cart into an order, atomically.
    async fn place_order(
        &self,
        user: UserUuid,
        order: PlaceOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieve one of the acting shopper's orders, with items.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// The acting shopper's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Every order in the store, newest first. Back office only.
    async fn list_all_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Move an order through fulfilment, enforcing the transition table.
    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}
