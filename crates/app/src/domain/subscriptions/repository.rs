//! Subscriptions Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    products::models::ProductUuid,
    subscriptions::models::{
        NewSubscription, Subscription, SubscriptionStatus, SubscriptionUuid,
    },
};

const LIST_SUBSCRIPTIONS_SQL: &str = include_str!("sql/list_subscriptions.sql");
const GET_SUBSCRIPTION_SQL: &str = include_str!("sql/get_subscription.sql");
const GET_SKIPS_SQL: &str = include_str!("sql/get_skips.sql");
const CREATE_SUBSCRIPTION_SQL: &str = include_str!("sql/create_subscription.sql");
const PAUSE_SUBSCRIPTION_SQL: &str = include_str!("sql/pause_subscription.sql");
const RESUME_SUBSCRIPTION_SQL: &str = include_str!("sql/resume_subscription.sql");
const CANCEL_SUBSCRIPTION_SQL: &str = include_str!("sql/cancel_subscription.sql");
const SKIP_NEXT_SQL: &str = include_str!("sql/skip_next.sql");
const RECORD_SKIP_SQL: &str = include_str!("sql/record_skip.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSubscriptionsRepository;

impl PgSubscriptionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_subscriptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        query_as::<Postgres, Subscription>(LIST_SUBSCRIPTIONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_subscription(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        subscription: SubscriptionUuid,
    ) -> Result<Subscription, sqlx::Error> {
        query_as::<Postgres, Subscription>(GET_SUBSCRIPTION_SQL)
            .bind(subscription.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_skips(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        subscription: SubscriptionUuid,
    ) -> Result<Vec<Timestamp>, sqlx::Error> {
        let skips: Vec<SqlxTimestamp> = query_scalar(GET_SKIPS_SQL)
            .bind(subscription.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(skips.into_iter().map(SqlxTimestamp::to_jiff).collect())
    }

    pub(crate) async fn create_subscription(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        subscription: NewSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        query_as::<Postgres, Subscription>(CREATE_SUBSCRIPTION_SQL)
            .bind(subscription.uuid.into_uuid())
            .bind(subscription.product_uuid.into_uuid())
            .bind(i32::try_from(subscription.frequency_weeks).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "frequency_weeks".to_string(),
                    source: Box::new(e),
                }
            })?)
            .bind(SqlxTimestamp::from(subscription.next_delivery_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn pause_subscription(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        subscription: SubscriptionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(PAUSE_SUBSCRIPTION_SQL)
            .bind(subscription.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn resume_subscription(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        subscription: SubscriptionUuid,
        next_delivery_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RESUME_SUBSCRIPTION_SQL)
            .bind(subscription.into_uuid())
            .bind(SqlxTimestamp::from(next_delivery_at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn cancel_subscription(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        subscription: SubscriptionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CANCEL_SUBSCRIPTION_SQL)
            .bind(subscription.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Advances `next_delivery_at` by one full cycle. Only touches active
    /// subscriptions; zero rows affected means the state guard failed.
    pub(crate) async fn skip_next(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        subscription: SubscriptionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SKIP_NEXT_SQL)
            .bind(subscription.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn record_skip(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        subscription: SubscriptionUuid,
        skipped_delivery_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(RECORD_SKIP_SQL)
            .bind(subscription.into_uuid())
            .bind(SqlxTimestamp::from(skipped_delivery_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for Subscription {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status =
            SubscriptionStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: format!("unknown subscription status {status:?}").into(),
            })?;

        let frequency_weeks: i32 = row.try_get("frequency_weeks")?;

        let frequency_weeks =
            u32::try_from(frequency_weeks).map_err(|e| sqlx::Error::ColumnDecode {
                index: "frequency_weeks".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: SubscriptionUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            frequency_weeks,
            status,
            next_delivery_at: row
                .try_get::<SqlxTimestamp, _>("next_delivery_at")?
                .to_jiff(),
            skipped_deliveries: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
