//! # Product Repository
//!
//! Database operations for products. Products are created here and never
//! updated or deleted.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::PersistenceResult;
use shoppingcart_core::{NewProduct, Product, ProductId};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let id = repo.save(&NewProduct::new("banana", 1_000, "woowa1.com")).await?;
/// let product = repo.find_by_id(id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product and returns its generated id.
    ///
    /// Names are not unique; saving the same request twice creates two
    /// products with different ids.
    ///
    /// ## Returns
    /// * `Ok(ProductId)` - Id assigned by the database
    /// * `Err(PersistenceError::InvalidInput)` - Request failed validation
    /// * `Err(_)` - The write was rejected
    pub async fn save(&self, product: &NewProduct) -> PersistenceResult<ProductId> {
        product.validate()?;

        debug!(name = %product.name, price = product.price, "Saving product");

        let result = sqlx::query("INSERT INTO product (name, price, image_url) VALUES (?1, ?2, ?3)")
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.image_url)
            .execute(&self.pool)
            .await?;

        let id = ProductId::new(result.last_insert_rowid());

        debug!(id = %id, "Product saved");
        Ok(id)
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn find_by_id(&self, id: ProductId) -> PersistenceResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, image_url FROM product WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists every product in id order.
    pub async fn find_all(&self) -> PersistenceResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, image_url FROM product ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> PersistenceResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::pool::{Database, DbConfig};

    async fn products() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    #[tokio::test]
    async fn test_save_returns_generated_ids() {
        let repo = products().await;

        let banana = repo
            .save(&NewProduct::new("banana", 1_000, "woowa1.com"))
            .await
            .unwrap();
        let apple = repo
            .save(&NewProduct::new("apple", 2_000, "woowa2.com"))
            .await
            .unwrap();

        assert_eq!(banana, ProductId::new(1));
        assert_eq!(apple, ProductId::new(2));
    }

    #[tokio::test]
    async fn test_ids_strictly_increase_and_names_may_repeat() {
        let repo = products().await;
        let request = NewProduct::new("banana", 1_000, "woowa1.com");

        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(repo.save(&request).await.unwrap());
        }

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(repo.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let repo = products().await;
        let request = NewProduct::new("apple", 2_000, "woowa2.com");
        let id = repo.save(&request).await.unwrap();

        let found = repo.find_by_id(id).await.unwrap();
        assert_eq!(found, Some(request.into_product(id)));

        let missing = repo.find_by_id(ProductId::new(99)).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_all_in_id_order() {
        let repo = products().await;
        assert!(repo.find_all().await.unwrap().is_empty());

        repo.save(&NewProduct::new("banana", 1_000, "woowa1.com"))
            .await
            .unwrap();
        repo.save(&NewProduct::new("apple", 2_000, "woowa2.com"))
            .await
            .unwrap();

        let names: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["banana", "apple"]);
    }

    #[tokio::test]
    async fn test_invalid_request_writes_nothing() {
        let repo = products().await;

        let err = repo
            .save(&NewProduct::new("banana", -1, "woowa1.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, PersistenceError::InvalidInput(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_schema_rejects_negative_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err: PersistenceError =
            sqlx::query("INSERT INTO product (name, price, image_url) VALUES ('x', -5, 'y')")
                .execute(db.pool())
                .await
                .unwrap_err()
                .into();

        assert!(matches!(err, PersistenceError::QueryFailed(_)));
    }
}
