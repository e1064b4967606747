//! # Cart Repository
//!
//! Database operations for cart rows.
//!
//! ## Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart                                                                   │
//! │  id │ customer_id │ product_id                                          │
//! │  ───┼─────────────┼───────────                                          │
//! │   1 │      1      │     1        ─┐                                     │
//! │   2 │      1      │     2         ├─ customer 1: ids [1, 2, 4]          │
//! │   3 │      2      │     1         │              products [1, 2, 2]    │
//! │   4 │      1      │     2        ─┘                                     │
//! │                                                                         │
//! │  Every list is ordered by cart id, which is insertion order:           │
//! │  AUTOINCREMENT ids only grow and a deleted id is never handed out      │
//! │  again.                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::config::{CartSettings, DeleteMode};
use crate::error::{PersistenceError, PersistenceResult};
use shoppingcart_core::{CartItem, CartItemId, CustomerId, ProductId};

/// Repository for cart row operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.carts();
///
/// let cart_id = repo.add_cart_item(CustomerId::new(1), ProductId::new(1)).await?;
/// let product_ids = repo.find_product_ids_by_customer_id(CustomerId::new(1)).await?;
/// repo.delete_cart_item(cart_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
    settings: CartSettings,
}

impl CartRepository {
    /// Creates a CartRepository with default settings: lenient deletes and
    /// unchecked product references.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_settings(pool, CartSettings::default())
    }

    /// Creates a CartRepository with explicit settings.
    pub fn with_settings(pool: SqlitePool, settings: CartSettings) -> Self {
        CartRepository { pool, settings }
    }

    /// Returns the settings this repository applies.
    pub fn settings(&self) -> CartSettings {
        self.settings
    }

    /// Adds a product to a customer's cart and returns the new cart id.
    ///
    /// The customer id is stored as given. The product id is only checked
    /// when `enforce_product_reference` is on; the check and the insert are
    /// one statement, so a missing product leaves the table untouched.
    ///
    /// ## Returns
    /// * `Ok(CartItemId)` - Id assigned by the database
    /// * `Err(PersistenceError::ForeignKeyViolation)` - Product missing and
    ///   references are enforced
    pub async fn add_cart_item(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> PersistenceResult<CartItemId> {
        debug!(customer_id = %customer_id, product_id = %product_id, "Adding cart item");

        let result = if self.settings.enforce_product_reference {
            sqlx::query(
                r#"
                INSERT INTO cart (customer_id, product_id)
                SELECT ?1, ?2
                WHERE EXISTS (SELECT 1 FROM product WHERE id = ?2)
                "#,
            )
            .bind(customer_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query("INSERT INTO cart (customer_id, product_id) VALUES (?1, ?2)")
                .bind(customer_id)
                .bind(product_id)
                .execute(&self.pool)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(PersistenceError::ForeignKeyViolation {
                message: format!("product {} does not exist", product_id),
            });
        }

        let id = CartItemId::new(result.last_insert_rowid());

        debug!(id = %id, "Cart item added");
        Ok(id)
    }

    /// Lists the product ids in a customer's cart, in cart id order.
    ///
    /// A product added twice appears twice. A customer with no rows gets an
    /// empty list.
    pub async fn find_product_ids_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> PersistenceResult<Vec<ProductId>> {
        let product_ids = sqlx::query_scalar::<_, ProductId>(
            "SELECT product_id FROM cart WHERE customer_id = ?1 ORDER BY id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(customer_id = %customer_id, count = product_ids.len(), "Listed cart product ids");
        Ok(product_ids)
    }

    /// Lists a customer's cart ids in ascending order.
    pub async fn find_ids_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> PersistenceResult<Vec<CartItemId>> {
        let ids = sqlx::query_scalar::<_, CartItemId>(
            "SELECT id FROM cart WHERE customer_id = ?1 ORDER BY id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(customer_id = %customer_id, count = ids.len(), "Listed cart ids");
        Ok(ids)
    }

    /// Lists a customer's full cart rows in ascending id order.
    pub async fn find_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> PersistenceResult<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(
            "SELECT id, customer_id, product_id FROM cart WHERE customer_id = ?1 ORDER BY id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets the product id stored in one cart row.
    ///
    /// ## Returns
    /// * `Ok(Some(ProductId))` - Row found
    /// * `Ok(None)` - No such cart row
    pub async fn find_product_id_by_id(
        &self,
        id: CartItemId,
    ) -> PersistenceResult<Option<ProductId>> {
        let product_id =
            sqlx::query_scalar::<_, ProductId>("SELECT product_id FROM cart WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(product_id)
    }

    /// Removes a cart row.
    ///
    /// ## Returns
    /// * `Ok(())` - Row removed, or nothing matched in lenient mode
    /// * `Err(PersistenceError::NotFound)` - Nothing matched in strict mode
    pub async fn delete_cart_item(&self, id: CartItemId) -> PersistenceResult<()> {
        debug!(id = %id, "Deleting cart item");

        let result = sqlx::query("DELETE FROM cart WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            match self.settings.delete_mode {
                DeleteMode::Strict => return Err(PersistenceError::not_found("CartItem", id)),
                DeleteMode::Lenient => debug!(id = %id, "No cart item to delete"),
            }
        }

        Ok(())
    }

    /// Counts total cart rows (for diagnostics).
    pub async fn count(&self) -> PersistenceResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
