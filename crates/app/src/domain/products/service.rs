//! Products service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self
            .repository
            .list_products(&mut tx, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .repository
            .get_product(&mut tx, product, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_product(&mut tx, product.uuid, &product.name, product.price)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product_price(
        &self,
        product: ProductUuid,
        price: u64,
    ) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product_price(&mut tx, product, price)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// List the catalog as of the given point in time.
    async fn list_products(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(
        &self,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<Product, ProductsServiceError>;

    /// Creates a new catalog product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Replaces a product's price.
    async fn update_product_price(
        &self,
        product: ProductUuid,
        price: u64,
    ) -> Result<Product, ProductsServiceError>;

    /// Soft-deletes a product from the catalog.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_product_round_trips() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(NewProduct {
                uuid,
                name: "Single Origin Beans".to_string(),
                price: 12_50,
            })
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.price, 12_50);
        assert!(product.deleted_at.is_none());

        let fetched = ctx.products.get_product(uuid, Timestamp::now()).await?;

        assert_eq!(fetched.name, "Single Origin Beans");

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_product_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(NewProduct {
                uuid,
                name: "Beans".to_string(),
                price: 10_00,
            })
            .await?;

        let result = ctx
            .products
            .create_product(NewProduct {
                uuid,
                name: "Beans Again".to_string(),
                price: 10_00,
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_disappears_from_listing() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(NewProduct {
                uuid,
                name: "Seasonal Blend".to_string(),
                price: 14_00,
            })
            .await?;

        ctx.products.delete_product(uuid).await?;

        let listing = ctx.products.list_products(Timestamp::now()).await?;

        assert!(
            !listing.iter().any(|p| p.uuid == uuid),
            "deleted product still listed"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.delete_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_price_is_visible_on_fetch() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(NewProduct {
                uuid,
                name: "Drip Brewer".to_string(),
                price: 80_00,
            })
            .await?;

        let updated = ctx.products.update_product_price(uuid, 75_00).await?;

        assert_eq!(updated.price, 75_00);

        Ok(())
    }
}
