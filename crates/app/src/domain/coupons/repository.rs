//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    coupons::models::{Coupon, CouponKind, CouponUuid, NewCoupon, RedeemableCoupon},
    products::repository::into_amount,
};

const LIST_COUPONS_SQL: &str = include_str!("sql/list_coupons.sql");
const FIND_FOR_REDEMPTION_SQL: &str = include_str!("sql/find_for_redemption.sql");
const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const ASSIGN_COUPON_SQL: &str = include_str!("sql/assign_coupon.sql");
const DEACTIVATE_COUPON_SQL: &str = include_str!("sql/deactivate_coupon.sql");
const CONSUME_COUPON_SQL: &str = include_str!("sql/consume_coupon.sql");
const RECORD_USAGE_SQL: &str = include_str!("sql/record_usage.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Coupon>, sqlx::Error> {
        query_as::<Postgres, Coupon>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_for_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        user_email: &str,
    ) -> Result<Option<RedeemableCoupon>, sqlx::Error> {
        query_as::<Postgres, RedeemableCoupon>(FIND_FOR_REDEMPTION_SQL)
            .bind(code)
            .bind(user_email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: NewCoupon,
    ) -> Result<Coupon, sqlx::Error> {
        query_as::<Postgres, Coupon>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(&coupon.code)
            .bind(coupon.kind.as_str())
            .bind(i64::from(coupon.value))
            .bind(coupon.starts_at.map(SqlxTimestamp::from))
            .bind(coupon.expires_at.map(SqlxTimestamp::from))
            .bind(coupon.max_uses.map(i64::from))
            .bind(
                coupon
                    .minimum_order
                    .map(|minimum| into_amount(minimum, "minimum_order"))
                    .transpose()?,
            )
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn assign_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        user_email: &str,
    ) -> Result<(), sqlx::Error> {
        query(ASSIGN_COUPON_SQL)
            .bind(coupon.into_uuid())
            .bind(user_email)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn deactivate_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DEACTIVATE_COUPON_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Check-and-increment of `used_count`.
    ///
    /// Returns the number of rows affected: zero means a concurrent order
    /// exhausted the coupon between validation and consumption.
    pub(crate) async fn consume_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CONSUME_COUPON_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Upsert the acting user's usage counter for the coupon.
    pub(crate) async fn record_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<(), sqlx::Error> {
        query(RECORD_USAGE_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

fn try_get_count(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let count_i64: i64 = row.try_get(col)?;

    u32::try_from(count_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Coupon {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        let kind = CouponKind::parse(&kind).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "kind".to_string(),
            source: format!("unknown coupon kind {kind:?}").into(),
        })?;

        let max_uses = row
            .try_get::<Option<i64>, _>("max_uses")?
            .map(|max| {
                u32::try_from(max).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "max_uses".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        let minimum_order = row
            .try_get::<Option<i64>, _>("minimum_order")?
            .map(|minimum| {
                u64::try_from(minimum).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "minimum_order".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            kind,
            value: try_get_count(row, "value")?,
            starts_at: row
                .try_get::<Option<SqlxTimestamp>, _>("starts_at")?
                .map(SqlxTimestamp::to_jiff),
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            max_uses,
            used_count: try_get_count(row, "used_count")?,
            minimum_order,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for RedeemableCoupon {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            coupon: Coupon::from_row(row)?,
            assigned_only: row.try_get("assigned_only")?,
            assigned_to_user: row.try_get("assigned_to_user")?,
        })
    }
}
