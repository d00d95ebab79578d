//! Carts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rusty_money::Money;

use orchard::{
    carts::{Cart as PricedCart, CartError},
    items::{LineItem, LineItemError, Recurrence},
};

use crate::{
    database::Db,
    domain::{
        STORE_CURRENCY,
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartItem, CartItemUuid, CartUuid, NewCart, NewCartItem},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        users::UserUuid,
    },
};

/// Values a cart's items through the pricing core.
///
/// The items came from `BIGINT` columns with non-negativity checks, so the
/// conversions only guard against corruption, not expected inputs.
pub(crate) fn merchandise_subtotal(items: &[CartItem]) -> Result<u64, CartError> {
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        let minor = i64::try_from(item.unit_price)
            .map_err(|_e| CartError::LineItem(LineItemError::Overflow))?;

        let unit_price = Money::from_minor(minor, STORE_CURRENCY);

        let line = match item.subscription_weeks {
            Some(weeks) => {
                LineItem::recurring(unit_price, item.quantity, Recurrence::every_weeks(weeks)?)?
            }
            None => LineItem::new(unit_price, item.quantity)?,
        };

        lines.push(line);
    }

    let cart = PricedCart::with_lines(lines, STORE_CURRENCY)?;
    let subtotal = cart.subtotal()?;

    u64::try_from(subtotal.to_minor_units())
        .map_err(|_e| CartError::LineItem(LineItemError::Overflow))
}

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(
        &self,
        user: UserUuid,
        cart: CartUuid,
        point_in_time: Timestamp,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut cart = self
            .carts_repository
            .get_cart(&mut tx, cart, point_in_time)
            .await?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid, point_in_time)
            .await?;

        tx.commit().await?;

        cart.items.extend(items);
        cart.subtotal =
            merchandise_subtotal(&cart.items).map_err(CartsServiceError::Valuation)?;

        Ok(cart)
    }

    async fn create_cart(&self, user: UserUuid, cart: NewCart) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let created = self
            .carts_repository
            .create_cart(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn add_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        if item.quantity == 0 || item.subscription_weeks == Some(0) {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_user_transaction(user).await?;

        // The cart row is read first so an unknown cart surfaces as
        // NotFound rather than a foreign-key violation from the insert.
        self.carts_repository
            .get_cart(&mut tx, cart, Timestamp::now())
            .await?;

        let item = self
            .items_repository
            .create_cart_item(&mut tx, cart, item)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn update_item_quantity(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_user_transaction(user).await?;

        let item = self
            .items_repository
            .update_item_quantity(&mut tx, cart, item, quantity)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, cart, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn clear_cart(&self, user: UserUuid, cart: CartUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let rows_affected = self.carts_repository.clear_cart(&mut tx, cart).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        self.items_repository.clear_cart_items(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a cart with its items, valued by the pricing core.
    async fn get_cart(
        &self,
        user: UserUuid,
        cart: CartUuid,
        point_in_time: Timestamp,
    ) -> Result<Cart, CartsServiceError>;

    /// Creates a new cart for the acting user.
    async fn create_cart(&self, user: UserUuid, cart: NewCart) -> Result<Cart, CartsServiceError>;

    /// Add an item to the given cart, capturing the product's current price.
    async fn add_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Replace a line's quantity.
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError>;

    /// Remove a single line from the cart.
    async fn remove_item(
        &self,
        user: UserUuid,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError>;

    /// Soft-delete the cart and all of its lines.
    async fn clear_cart(&self, user: UserUuid, cart: CartUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{domain::products::ProductsService, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn create_cart_returns_correct_uuid() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = CartUuid::new();

        let cart = ctx.carts.create_cart(ctx.user, NewCart { uuid }).await?;

        assert_eq!(cart.uuid, uuid);
        assert_eq!(cart.subtotal, 0);
        assert!(cart.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_values_items_through_the_pricing_core() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.seed_product("Beans", 12_50).await?;
        let cart = ctx.seed_cart().await?;

        ctx.carts
            .add_item(
                ctx.user,
                cart,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: product,
                    quantity: 2,
                    subscription_weeks: None,
                },
            )
            .await?;

        let cart = ctx.carts.get_cart(ctx.user, cart, Timestamp::now()).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.subtotal, 25_00);

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .get_cart(ctx.user, CartUuid::new(), Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn adding_item_captures_the_product_price() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.seed_product("Brewer", 80_00).await?;
        let cart = ctx.seed_cart().await?;

        let item = ctx
            .carts
            .add_item(
                ctx.user,
                cart,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: product,
                    quantity: 1,
                    subscription_weeks: None,
                },
            )
            .await?;

        assert_eq!(item.unit_price, 80_00);
        assert_eq!(item.product_uuid, product);

        // A later price change must not reprice the captured line.
        ctx.products.update_product_price(product, 90_00).await?;

        let cart = ctx.carts.get_cart(ctx.user, cart, Timestamp::now()).await?;

        assert_eq!(cart.subtotal, 80_00);

        Ok(())
    }

    #[tokio::test]
    async fn adding_item_with_unknown_product_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.seed_cart().await?;

        let result = ctx
            .carts
            .add_item(
                ctx.user,
                cart,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: crate::domain::products::models::ProductUuid::new(),
                    quantity: 1,
                    subscription_weeks: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound for unknown product, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_before_any_write() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.seed_product("Beans", 10_00).await?;
        let cart = ctx.seed_cart().await?;

        let result = ctx
            .carts
            .add_item(
                ctx.user,
                cart,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: product,
                    quantity: 0,
                    subscription_weeks: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removed_item_no_longer_counts_toward_the_subtotal() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.seed_product("Beans", 10_00).await?;
        let cart = ctx.seed_cart().await?;

        let item = ctx
            .carts
            .add_item(
                ctx.user,
                cart,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: product,
                    quantity: 3,
                    subscription_weeks: None,
                },
            )
            .await?;

        ctx.carts.remove_item(ctx.user, cart, item.uuid).await?;

        let cart = ctx.carts.get_cart(ctx.user, cart, Timestamp::now()).await?;

        assert_eq!(cart.items.len(), 0);
        assert_eq!(cart.subtotal, 0);

        Ok(())
    }

    #[tokio::test]
    async fn cart_not_visible_to_another_user() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.seed_cart().await?;
        let other_user = UserUuid::new();

        let result = ctx.carts.get_cart(other_user, cart, Timestamp::now()).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound for cross-user access, got {result:?}"
        );

        Ok(())
    }
}
