//! Coupons service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::coupons::{
        errors::{CouponRejection, CouponsServiceError},
        models::{Coupon, CouponUuid, NewCoupon, RedeemableCoupon},
        repository::PgCouponsRepository,
    },
};

/// Decides whether a redeemable coupon applies to the given order.
///
/// Pure so preview and checkout cannot diverge; callers supply the clock.
pub(crate) fn check_applicability(
    redeemable: &RedeemableCoupon,
    subtotal: u64,
    now: Timestamp,
) -> Result<(), CouponRejection> {
    let coupon = &redeemable.coupon;

    if coupon.starts_at.is_some_and(|starts| starts > now) {
        return Err(CouponRejection::NotYetActive);
    }

    if coupon.expires_at.is_some_and(|expires| expires <= now) {
        return Err(CouponRejection::Expired);
    }

    if coupon.max_uses.is_some_and(|max| coupon.used_count >= max) {
        return Err(CouponRejection::Exhausted);
    }

    if coupon.minimum_order.is_some_and(|minimum| subtotal < minimum) {
        return Err(CouponRejection::BelowMinimumOrder);
    }

    if redeemable.assigned_only && !redeemable.assigned_to_user {
        return Err(CouponRejection::NotAssignedToUser);
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn validate_coupon(
        &self,
        code: &str,
        user_email: &str,
        subtotal: u64,
        now: Timestamp,
    ) -> Result<Coupon, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let redeemable = self
            .repository
            .find_for_redemption(&mut tx, code, user_email)
            .await?
            .ok_or(CouponsServiceError::Rejected(CouponRejection::UnknownCode))?;

        tx.commit().await?;

        check_applicability(&redeemable, subtotal, now)
            .map_err(CouponsServiceError::Rejected)?;

        Ok(redeemable.coupon)
    }

    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, CouponsServiceError> {
        if coupon.value == 0 {
            return Err(CouponsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_coupons(&self) -> Result<Vec<Coupon>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupons = self.repository.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(coupons)
    }

    async fn assign_coupon(
        &self,
        coupon: CouponUuid,
        user_email: &str,
    ) -> Result<(), CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository
            .assign_coupon(&mut tx, coupon, user_email)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn deactivate_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.deactivate_coupon(&mut tx, coupon).await?;

        if rows_affected == 0 {
            return Err(CouponsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Check a code against the acting shopper and order, without
    /// consuming anything. Preview-safe.
    async fn validate_coupon(
        &self,
        code: &str,
        user_email: &str,
        subtotal: u64,
        now: Timestamp,
    ) -> Result<Coupon, CouponsServiceError>;

    /// Creates a new coupon.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, CouponsServiceError>;

    /// Lists the coupons that have not been deactivated.
    async fn list_coupons(&self) -> Result<Vec<Coupon>, CouponsServiceError>;

    /// Reserves the coupon for a customer email; a coupon with any
    /// assignment is redeemable only by its assignees.
    async fn assign_coupon(
        &self,
        coupon: CouponUuid,
        user_email: &str,
    ) -> Result<(), CouponsServiceError>;

    /// Soft-deletes a coupon so it can no longer be redeemed.
    async fn deactivate_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError>;
}

#[cfg(test)]
mod applicability_tests {
    use jiff::{Timestamp, ToSpan};
    use testresult::TestResult;

    use crate::domain::coupons::models::CouponKind;

    use super::*;

    fn redeemable(coupon: Coupon) -> RedeemableCoupon {
        RedeemableCoupon {
            coupon,
            assigned_only: false,
            assigned_to_user: false,
        }
    }

    fn percentage_coupon(now: Timestamp) -> Coupon {
        Coupon {
            uuid: CouponUuid::new(),
            code: "WELCOME10".to_string(),
            kind: CouponKind::Percentage,
            value: 10,
            starts_at: None,
            expires_at: None,
            max_uses: None,
            used_count: 0,
            minimum_order: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn open_coupon_applies() {
        let now = Timestamp::UNIX_EPOCH;

        assert_eq!(
            check_applicability(&redeemable(percentage_coupon(now)), 10_00, now),
            Ok(())
        );
    }

    #[test]
    fn future_start_is_not_yet_active() -> TestResult {
        let now = Timestamp::UNIX_EPOCH;

        let mut coupon = percentage_coupon(now);
        coupon.starts_at = Some(now.checked_add(1.hour())?);

        assert_eq!(
            check_applicability(&redeemable(coupon), 10_00, now),
            Err(CouponRejection::NotYetActive)
        );

        Ok(())
    }

    #[test]
    fn past_expiry_is_expired() -> TestResult {
        let now = Timestamp::UNIX_EPOCH;

        let mut coupon = percentage_coupon(now);
        coupon.expires_at = Some(now.checked_sub(1.hour())?);

        assert_eq!(
            check_applicability(&redeemable(coupon), 10_00, now),
            Err(CouponRejection::Expired)
        );

        Ok(())
    }

    #[test]
    fn used_up_coupon_is_exhausted() {
        let now = Timestamp::UNIX_EPOCH;

        let mut coupon = percentage_coupon(now);
        coupon.max_uses = Some(5);
        coupon.used_count = 5;

        assert_eq!(
            check_applicability(&redeemable(coupon), 10_00, now),
            Err(CouponRejection::Exhausted)
        );
    }

    #[test]
    fn small_order_is_below_minimum() {
        let now = Timestamp::UNIX_EPOCH;

        let mut coupon = percentage_coupon(now);
        coupon.minimum_order = Some(50_00);

        assert_eq!(
            check_applicability(&redeemable(coupon.clone()), 49_99, now),
            Err(CouponRejection::BelowMinimumOrder)
        );

        assert_eq!(
            check_applicability(&redeemable(coupon), 50_00, now),
            Ok(())
        );
    }

    #[test]
    fn reserved_coupon_rejects_other_shoppers() {
        let now = Timestamp::UNIX_EPOCH;

        let reserved = RedeemableCoupon {
            coupon: percentage_coupon(now),
            assigned_only: true,
            assigned_to_user: false,
        };

        assert_eq!(
            check_applicability(&reserved, 10_00, now),
            Err(CouponRejection::NotAssignedToUser)
        );

        let assignee = RedeemableCoupon {
            assigned_to_user: true,
            ..reserved
        };

        assert_eq!(check_applicability(&assignee, 10_00, now), Ok(()));
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, ToSpan};
    use testresult::TestResult;

    use crate::{domain::coupons::models::CouponKind, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn created_coupon_validates_for_any_shopper() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.seed_coupon("WELCOME10", CouponKind::Percentage, 10)
            .await?;

        let coupon = ctx
            .coupons
            .validate_coupon("WELCOME10", "shopper@example.com", 10_00, Timestamp::now())
            .await?;

        assert_eq!(coupon.code, "WELCOME10");
        assert_eq!(coupon.value, 10);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_code_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .coupons
            .validate_coupon("NOPE", "shopper@example.com", 10_00, Timestamp::now())
            .await;

        assert!(
            matches!(
                result,
                Err(CouponsServiceError::Rejected(CouponRejection::UnknownCode))
            ),
            "expected UnknownCode, got {result:?}"
        );
    }

    #[tokio::test]
    async fn expired_coupon_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let mut coupon = ctx.new_coupon("SPRING", CouponKind::Fixed, 5_00);
        coupon.expires_at = Some(Timestamp::now().checked_sub(1.hour())?);

        ctx.coupons.create_coupon(coupon).await?;

        let result = ctx
            .coupons
            .validate_coupon("SPRING", "shopper@example.com", 10_00, Timestamp::now())
            .await;

        assert!(
            matches!(
                result,
                Err(CouponsServiceError::Rejected(CouponRejection::Expired))
            ),
            "expected Expired, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_code_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.seed_coupon("DUPE", CouponKind::Percentage, 10).await?;

        let result = ctx
            .coupons
            .create_coupon(ctx.new_coupon("DUPE", CouponKind::Percentage, 20))
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn assignment_reserves_the_coupon() -> TestResult {
        let ctx = TestContext::new().await;

        let coupon = ctx.seed_coupon("VIP20", CouponKind::Percentage, 20).await?;

        ctx.coupons.assign_coupon(coupon, "vip@example.com").await?;

        let result = ctx
            .coupons
            .validate_coupon("VIP20", "shopper@example.com", 10_00, Timestamp::now())
            .await;

        assert!(
            matches!(
                result,
                Err(CouponsServiceError::Rejected(
                    CouponRejection::NotAssignedToUser
                ))
            ),
            "expected NotAssignedToUser, got {result:?}"
        );

        let validated = ctx
            .coupons
            .validate_coupon("VIP20", "vip@example.com", 10_00, Timestamp::now())
            .await?;

        assert_eq!(validated.uuid, coupon);

        Ok(())
    }

    #[tokio::test]
    async fn deactivated_coupon_is_unknown_to_shoppers() -> TestResult {
        let ctx = TestContext::new().await;

        let coupon = ctx.seed_coupon("GONE", CouponKind::Fixed, 5_00).await?;

        ctx.coupons.deactivate_coupon(coupon).await?;

        let result = ctx
            .coupons
            .validate_coupon("GONE", "shopper@example.com", 10_00, Timestamp::now())
            .await;

        assert!(
            matches!(
                result,
                Err(CouponsServiceError::Rejected(CouponRejection::UnknownCode))
            ),
            "expected UnknownCode, got {result:?}"
        );

        Ok(())
    }
}
