//! Subscriptions service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        subscriptions::{
            errors::SubscriptionsServiceError,
            models::{Subscription, SubscriptionStatus, SubscriptionUuid},
            repository::PgSubscriptionsRepository,
        },
        users::UserUuid,
    },
};

/// The delivery following `start` for a given weekly cadence.
pub(crate) fn delivery_after(
    start: Timestamp,
    frequency_weeks: u32,
) -> Result<Timestamp, jiff::Error> {
    let cycle = SignedDuration::from_hours(i64::from(frequency_weeks) * 7 * 24);

    start.checked_add(cycle)
}

#[derive(Debug, Clone)]
pub struct PgSubscriptionsService {
    db: Db,
    repository: PgSubscriptionsRepository,
}

impl PgSubscriptionsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSubscriptionsRepository::new(),
        }
    }
}

#[async_trait]
impl SubscriptionsService for PgSubscriptionsService {
    async fn list_subscriptions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Subscription>, SubscriptionsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let subscriptions = self.repository.list_subscriptions(&mut tx).await?;

        tx.commit().await?;

        Ok(subscriptions)
    }

    async fn get_subscription(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<Subscription, SubscriptionsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut subscription = self
            .repository
            .get_subscription(&mut tx, subscription)
            .await?;

        let skips = self.repository.get_skips(&mut tx, subscription.uuid).await?;

        tx.commit().await?;

        subscription.skipped_deliveries = skips;

        Ok(subscription)
    }

    async fn pause_subscription(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<(), SubscriptionsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let rows_affected = self
            .repository
            .pause_subscription(&mut tx, subscription)
            .await?;

        if rows_affected == 0 {
            // Distinguish a missing subscription from a state guard failure.
            self.repository
                .get_subscription(&mut tx, subscription)
                .await?;

            return Err(SubscriptionsServiceError::NotActive);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn resume_subscription(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<Subscription, SubscriptionsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let current = self
            .repository
            .get_subscription(&mut tx, subscription)
            .await?;

        if current.status != SubscriptionStatus::Paused {
            return Err(SubscriptionsServiceError::NotPaused);
        }

        // A resumed schedule restarts from today, not the paused-over date.
        let next_delivery_at = delivery_after(Timestamp::now(), current.frequency_weeks)
            .map_err(SubscriptionsServiceError::Schedule)?;

        let rows_affected = self
            .repository
            .resume_subscription(&mut tx, subscription, next_delivery_at)
            .await?;

        if rows_affected == 0 {
            return Err(SubscriptionsServiceError::NotPaused);
        }

        let resumed = self
            .repository
            .get_subscription(&mut tx, subscription)
            .await?;

        tx.commit().await?;

        Ok(resumed)
    }

    async fn cancel_subscription(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<(), SubscriptionsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let rows_affected = self
            .repository
            .cancel_subscription(&mut tx, subscription)
            .await?;

        if rows_affected == 0 {
            self.repository
                .get_subscription(&mut tx, subscription)
                .await?;

            return Err(SubscriptionsServiceError::AlreadyCancelled);
        }

        tx.commit().await?;

        info!(subscription_uuid = %subscription, "cancelled subscription");

        Ok(())
    }

    async fn skip_next_delivery(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<Subscription, SubscriptionsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let current = self
            .repository
            .get_subscription(&mut tx, subscription)
            .await?;

        if current.status != SubscriptionStatus::Active {
            return Err(SubscriptionsServiceError::NotActive);
        }

        self.repository
            .record_skip(&mut tx, subscription, current.next_delivery_at)
            .await?;

        let rows_affected = self.repository.skip_next(&mut tx, subscription).await?;

        if rows_affected == 0 {
            return Err(SubscriptionsServiceError::NotActive);
        }

        let mut skipped = self
            .repository
            .get_subscription(&mut tx, subscription)
            .await?;

        skipped.skipped_deliveries = self.repository.get_skips(&mut tx, subscription).await?;

        tx.commit().await?;

        Ok(skipped)
    }
}

#[automock]
#[async_trait]
pub trait SubscriptionsService: Send + Sync {
    /// The acting shopper's subscriptions, oldest first.
    async fn list_subscriptions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Subscription>, SubscriptionsServiceError>;

    /// Retrieve one subscription with its skip history.
    async fn get_subscription(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<Subscription, SubscriptionsServiceError>;

    /// Suspend deliveries. Only active subscriptions can pause.
    async fn pause_subscription(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<(), SubscriptionsServiceError>;

    /// Resume a paused subscription, scheduling the next delivery one full
    /// cycle from now.
    async fn resume_subscription(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<Subscription, SubscriptionsServiceError>;

    /// Cancel permanently.
    async fn cancel_subscription(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<(), SubscriptionsServiceError>;

    /// Skip the upcoming delivery, recording the skipped date and advancing
    /// the schedule by one cycle.
    async fn skip_next_delivery(
        &self,
        user: UserUuid,
        subscription: SubscriptionUuid,
    ) -> Result<Subscription, SubscriptionsServiceError>;
}
