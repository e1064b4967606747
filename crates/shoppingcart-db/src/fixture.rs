//! # Reference Fixture
//!
//! The sample data used by the `seed` binary: two products and two cart
//! rows for customer 1.
//!
//! ```text
//! product: 1 banana (1000, woowa1.com)   cart: 1 → customer 1, product 1
//!          2 apple  (2000, woowa2.com)         2 → customer 1, product 2
//! ```
//!
//! Cart rows are written with plain SQL, the same way an external loader
//! would, so the fixture does not depend on the cart store. Loading only
//! happens on an empty database; the ids above hold only then.

use tracing::{info, warn};

use crate::error::PersistenceResult;
use crate::pool::Database;
use shoppingcart_core::{CartItem, CustomerId, NewProduct};

/// Customer owning every fixture cart row.
pub const FIXTURE_CUSTOMER: CustomerId = CustomerId::new(1);

/// Products saved by the fixture, in insertion order.
pub fn fixture_products() -> [NewProduct; 2] {
    [
        NewProduct::new("banana", 1_000, "woowa1.com"),
        NewProduct::new("apple", 2_000, "woowa2.com"),
    ]
}

/// What [`load_reference_fixture`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureOutcome {
    /// The fixture was written; these are the customer's cart rows.
    Loaded(Vec<CartItem>),

    /// The database already held data, nothing was written.
    Skipped { products: i64, cart_rows: i64 },
}

/// Loads the fixture into an empty database.
///
/// A database with any product or cart row is left untouched, so running
/// this twice never duplicates the fixture.
pub async fn load_reference_fixture(db: &Database) -> PersistenceResult<FixtureOutcome> {
    let products = db.products();
    let carts = db.carts();

    let existing_products = products.count().await?;
    let existing_cart_rows = carts.count().await?;
    if existing_products > 0 || existing_cart_rows > 0 {
        warn!(
            products = existing_products,
            cart_rows = existing_cart_rows,
            "Database already has data, skipping fixture"
        );
        return Ok(FixtureOutcome::Skipped {
            products: existing_products,
            cart_rows: existing_cart_rows,
        });
    }

    let mut product_ids = Vec::new();
    for product in fixture_products() {
        product_ids.push(products.save(&product).await?);
    }

    for product_id in &product_ids {
        sqlx::query("INSERT INTO cart (customer_id, product_id) VALUES (?1, ?2)")
            .bind(FIXTURE_CUSTOMER)
            .bind(*product_id)
            .execute(db.pool())
            .await?;
    }

    let items = carts.find_by_customer_id(FIXTURE_CUSTOMER).await?;

    info!(
        products = product_ids.len(),
        cart_rows = items.len(),
        "Fixture loaded"
    );

    Ok(FixtureOutcome::Loaded(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use shoppingcart_core::{CartItemId, ProductId};

    fn reference_rows() -> Vec<CartItem> {
        vec![
            CartItem {
                id: CartItemId::new(1),
                customer_id: FIXTURE_CUSTOMER,
                product_id: ProductId::new(1),
            },
            CartItem {
                id: CartItemId::new(2),
                customer_id: FIXTURE_CUSTOMER,
                product_id: ProductId::new(2),
            },
        ]
    }

    #[tokio::test]
    async fn test_loads_reference_ids() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let outcome = load_reference_fixture(&db).await.unwrap();

        assert_eq!(outcome, FixtureOutcome::Loaded(reference_rows()));
        let names: Vec<String> = db
            .products()
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["banana", "apple"]);
    }

    #[tokio::test]
    async fn test_second_load_leaves_fixture_unchanged() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        load_reference_fixture(&db).await.unwrap();

        let outcome = load_reference_fixture(&db).await.unwrap();

        assert_eq!(
            outcome,
            FixtureOutcome::Skipped {
                products: 2,
                cart_rows: 2,
            }
        );
        assert_eq!(db.products().count().await.unwrap(), 2);
        assert_eq!(
            db.carts().find_by_customer_id(FIXTURE_CUSTOMER).await.unwrap(),
            reference_rows()
        );
    }

    #[tokio::test]
    async fn test_cart_rows_alone_block_loading() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.carts()
            .add_cart_item(CustomerId::new(7), ProductId::new(1))
            .await
            .unwrap();

        let outcome = load_reference_fixture(&db).await.unwrap();

        assert_eq!(
            outcome,
            FixtureOutcome::Skipped {
                products: 0,
                cart_rows: 1,
            }
        );
        assert_eq!(db.products().count().await.unwrap(), 0);
    }
}
