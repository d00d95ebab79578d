//! Shipping Methods Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    products::repository::{into_amount, try_get_amount},
    shipping::models::{NewShippingMethod, ShippingMethod, ShippingMethodUuid},
};

const LIST_METHODS_SQL: &str = include_str!("sql/list_methods.sql");
const GET_METHOD_SQL: &str = include_str!("sql/get_method.sql");
const CREATE_METHOD_SQL: &str = include_str!("sql/create_method.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgShippingRepository;

impl PgShippingRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_methods(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ShippingMethod>, sqlx::Error> {
        query_as::<Postgres, ShippingMethod>(LIST_METHODS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_method(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        method: ShippingMethodUuid,
    ) -> Result<ShippingMethod, sqlx::Error> {
        query_as::<Postgres, ShippingMethod>(GET_METHOD_SQL)
            .bind(method.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_method(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        method: NewShippingMethod,
    ) -> Result<ShippingMethod, sqlx::Error> {
        query_as::<Postgres, ShippingMethod>(CREATE_METHOD_SQL)
            .bind(method.uuid.into_uuid())
            .bind(&method.name)
            .bind(into_amount(method.price, "price")?)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ShippingMethod {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ShippingMethodUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
