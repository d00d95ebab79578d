//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    orders::models::{Order, OrderStatus, OrderUuid, ShippingAddress},
    products::repository::{into_amount, try_get_amount},
    shipping::models::ShippingMethodUuid,
    users::UserUuid,
};

const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const SET_STATUS_SQL: &str = include_str!("../sql/set_status.sql");

/// Financial snapshot written onto a new order row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderTotals {
    pub subtotal: u64,
    pub shipping: u64,
    pub coupon_discount: u64,
    pub points_discount: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    #[expect(clippy::too_many_arguments, reason = "one bind per snapshot column")]
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        totals: OrderTotals,
        coupon_code: Option<&str>,
        points_redeemed: u32,
        shipping_method: ShippingMethodUuid,
        address: &ShippingAddress,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(into_amount(totals.subtotal, "subtotal")?)
            .bind(into_amount(totals.shipping, "shipping")?)
            .bind(into_amount(totals.coupon_discount, "coupon_discount")?)
            .bind(into_amount(totals.points_discount, "points_discount")?)
            .bind(into_amount(totals.total, "total")?)
            .bind(coupon_code)
            .bind(i64::from(points_redeemed))
            .bind(shipping_method.into_uuid())
            .bind(&address.recipient)
            .bind(&address.phone)
            .bind(&address.line1)
            .bind(address.line2.as_deref())
            .bind(&address.city)
            .bind(&address.region)
            .bind(&address.postal_code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(SET_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = OrderStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown order status {status:?}").into(),
        })?;

        let points_redeemed: i64 = row.try_get("points_redeemed")?;

        let points_redeemed =
            u32::try_from(points_redeemed).map_err(|e| sqlx::Error::ColumnDecode {
                index: "points_redeemed".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            subtotal: try_get_amount(row, "subtotal")?,
            shipping: try_get_amount(row, "shipping")?,
            coupon_discount: try_get_amount(row, "coupon_discount")?,
            points_discount: try_get_amount(row, "points_discount")?,
            total: try_get_amount(row, "total")?,
            coupon_code: row.try_get("coupon_code")?,
            points_redeemed,
            shipping_method_uuid: ShippingMethodUuid::from_uuid(
                row.try_get("shipping_method_uuid")?,
            ),
            address: ShippingAddress {
                recipient: row.try_get("recipient")?,
                phone: row.try_get("phone")?,
                line1: row.try_get("line1")?,
                line2: row.try_get("line2")?,
                city: row.try_get("city")?,
                region: row.try_get("region")?,
                postal_code: row.try_get("postal_code")?,
            },
            status,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
