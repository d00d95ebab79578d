//! Loyalty Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    loyalty::models::LoyaltyAccount, products::repository::try_get_amount, users::UserUuid,
};

const GET_ACCOUNT_SQL: &str = include_str!("sql/get_account.sql");
const CREDIT_POINTS_SQL: &str = include_str!("sql/credit_points.sql");
const DEBIT_POINTS_SQL: &str = include_str!("sql/debit_points.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLoyaltyRepository;

impl PgLoyaltyRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<LoyaltyAccount>, sqlx::Error> {
        query_as::<Postgres, LoyaltyAccount>(GET_ACCOUNT_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn credit_points(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        points: u32,
    ) -> Result<LoyaltyAccount, sqlx::Error> {
        query_as::<Postgres, LoyaltyAccount>(CREDIT_POINTS_SQL)
            .bind(user.into_uuid())
            .bind(i64::from(points))
            .fetch_one(&mut **tx)
            .await
    }

    /// Conditional debit.
    ///
    /// Returns the number of rows affected: zero means the balance was
    /// short, including when a concurrent redemption drained it first.
    pub(crate) async fn debit_points(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        points: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DEBIT_POINTS_SQL)
            .bind(user.into_uuid())
            .bind(i64::from(points))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for LoyaltyAccount {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            points: try_get_amount(row, "points")?,
            points_spent: try_get_amount(row, "points_spent")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
