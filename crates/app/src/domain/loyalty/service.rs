//! Loyalty service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        loyalty::{errors::LoyaltyServiceError, repository::PgLoyaltyRepository},
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgLoyaltyService {
    db: Db,
    repository: PgLoyaltyRepository,
}

impl PgLoyaltyService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgLoyaltyRepository::new(),
        }
    }
}

#[async_trait]
impl LoyaltyService for PgLoyaltyService {
    async fn balance(&self, user: UserUuid) -> Result<u64, LoyaltyServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let account = self.repository.get_account(&mut tx, user).await?;

        tx.commit().await?;

        Ok(account.map(|account| account.points).unwrap_or_default())
    }

    async fn credit_points(
        &self,
        user: UserUuid,
        points: u32,
    ) -> Result<u64, LoyaltyServiceError> {
        if points == 0 {
            return Err(LoyaltyServiceError::InvalidData);
        }

        let mut tx = self.db.begin_user_transaction(user).await?;

        let account = self.repository.credit_points(&mut tx, user, points).await?;

        tx.commit().await?;

        Ok(account.points)
    }
}

#[automock]
#[async_trait]
pub trait LoyaltyService: Send + Sync {
    /// Current redeemable balance; a shopper without an account has zero.
    async fn balance(&self, user: UserUuid) -> Result<u64, LoyaltyServiceError>;

    /// Adds points to a shopper's balance and returns the new balance.
    async fn credit_points(&self, user: UserUuid, points: u32)
    -> Result<u64, LoyaltyServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn missing_account_reads_as_zero_balance() -> TestResult {
        let ctx = TestContext::new().await;

        assert_eq!(ctx.loyalty.balance(ctx.user).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn credits_accumulate() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.loyalty.credit_points(ctx.user, 100).await?;
        let balance = ctx.loyalty.credit_points(ctx.user, 50).await?;

        assert_eq!(balance, 150);
        assert_eq!(ctx.loyalty.balance(ctx.user).await?, 150);

        Ok(())
    }

    #[tokio::test]
    async fn zero_point_credit_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx.loyalty.credit_points(ctx.user, 0).await;

        assert!(
            matches!(result, Err(LoyaltyServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn balances_are_scoped_to_their_user() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.loyalty.credit_points(ctx.user, 100).await?;

        let other_user = UserUuid::new();

        assert_eq!(ctx.loyalty.balance(other_user).await?, 0);

        Ok(())
    }
}
