//! Shipping service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::shipping::{
        errors::ShippingServiceError,
        models::{NewShippingMethod, ShippingMethod, ShippingMethodUuid},
        repository::PgShippingRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgShippingService {
    db: Db,
    repository: PgShippingRepository,
}

impl PgShippingService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgShippingRepository::new(),
        }
    }
}

#[async_trait]
impl ShippingService for PgShippingService {
    async fn list_methods(&self) -> Result<Vec<ShippingMethod>, ShippingServiceError> {
        let mut tx = self.db.begin().await?;

        let methods = self.repository.list_methods(&mut tx).await?;

        tx.commit().await?;

        Ok(methods)
    }

    async fn get_method(
        &self,
        method: ShippingMethodUuid,
    ) -> Result<ShippingMethod, ShippingServiceError> {
        let mut tx = self.db.begin().await?;

        let method = self.repository.get_method(&mut tx, method).await?;

        tx.commit().await?;

        Ok(method)
    }

    async fn create_method(
        &self,
        method: NewShippingMethod,
    ) -> Result<ShippingMethod, ShippingServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_method(&mut tx, method).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait ShippingService: Send + Sync {
    /// Lists available shipping methods, cheapest first.
    async fn list_methods(&self) -> Result<Vec<ShippingMethod>, ShippingServiceError>;

    /// Retrieve a single shipping method.
    async fn get_method(
        &self,
        method: ShippingMethodUuid,
    ) -> Result<ShippingMethod, ShippingServiceError>;

    /// Creates a new shipping method.
    async fn create_method(
        &self,
        method: NewShippingMethod,
    ) -> Result<ShippingMethod, ShippingServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn methods_list_cheapest_first() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.shipping
            .create_method(NewShippingMethod {
                uuid: ShippingMethodUuid::new(),
                name: "Express".to_string(),
                price: 12_00,
            })
            .await?;

        ctx.shipping
            .create_method(NewShippingMethod {
                uuid: ShippingMethodUuid::new(),
                name: "Standard".to_string(),
                price: 4_99,
            })
            .await?;

        let methods = ctx.shipping.list_methods().await?;

        assert_eq!(methods.len(), 2);
        assert_eq!(methods.first().map(|m| m.name.as_str()), Some("Standard"));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_method_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.shipping.get_method(ShippingMethodUuid::new()).await;

        assert!(
            matches!(result, Err(ShippingServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
