//! Order Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    orders::models::{OrderItem, OrderItemUuid, OrderUuid},
    products::models::ProductUuid,
    products::repository::{into_amount, try_get_amount},
};

const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        product: ProductUuid,
        unit_price: u64,
        quantity: u32,
        subscription_weeks: Option<u32>,
    ) -> Result<OrderItem, sqlx::Error> {
        query_as::<Postgres, OrderItem>(CREATE_ORDER_ITEM_SQL)
            .bind(OrderItemUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(product.into_uuid())
            .bind(into_amount(unit_price, "unit_price")?)
            .bind(i32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            })?)
            .bind(
                subscription_weeks
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
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
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
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            unit_price: try_get_amount(row, "unit_price")?,
            quantity,
            subscription_weeks,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
