//! Cart Items Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    carts::models::{CartItem, CartItemUuid, CartUuid, NewCartItem},
    products::models::ProductUuid,
    products::repository::try_get_amount,
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("../sql/create_cart_item.sql");
const UPDATE_ITEM_QUANTITY_SQL: &str = include_str!("../sql/update_item_quantity.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const CLEAR_CART_ITEMS_SQL: &str = include_str!("../sql/clear_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    /// Inserts a cart line, capturing the product's current price.
    ///
    /// The insert selects from `products`, so an unknown or deleted product
    /// yields no row and surfaces as `RowNotFound`.
    pub(crate) async fn create_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(CREATE_CART_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(cart.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(i32::try_from(item.quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            })?)
            .bind(
                item.subscription_weeks
                    .map(|weeks| {
                        i32::try_from(weeks).map_err(|e| sqlx::Error::ColumnDecode {
                            index: "subscription_weeks".to_string(),
                            source: Box::new(e),
                        })
                    })
                    .transpose()?,
            )
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_item_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(UPDATE_ITEM_QUANTITY_SQL)
            .bind(cart.into_uuid())
            .bind(item.into_uuid())
            .bind(i32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            })?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(item.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        let quantity = u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        let subscription_weeks = row
            .try_get::<Option<i32>, _>("subscription_weeks")?
            .map(|weeks| {
                u32::try_from(weeks).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "subscription_weeks".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            unit_price: try_get_amount(row, "unit_price")?,
            quantity,
            subscription_weeks,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
