//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD with input validation
//! - Partial updates via [`ProductPatch`]
//! - `in_stock` derived from quantity on every write
//!
//! ## Patch Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Patch Updates Work                               │
//! │                                                                         │
//! │  update("prod-1", { price_cents: 300, quantity: 0 })                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Load current row inside a transaction                                 │
//! │       │                                                                 │
//! │       ├── Row missing? → Ok(None), nothing written                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Apply supplied fields, recompute in_stock (0 → false)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Write full row back, bump updated_at, commit                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(Some(updated_product))                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use hyperspin_core::{validation, NewProduct, Product, ProductPatch};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.add(&new_product).await?;
/// let found = repo.get(&product.id).await?;
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

    /// Adds a new product to the catalog.
    ///
    /// The repository assigns the ID and timestamps and derives
    /// `in_stock` from the initial quantity.
    ///
    /// ## Arguments
    /// * `new_product` - Name, pricing, and initial stock
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product, ID and timestamps filled in
    /// * `Err(DbError::InvalidInput)` - Empty name, negative price/cost/quantity
    pub async fn add(&self, new_product: &NewProduct) -> DbResult<Product> {
        validation::validate_product_name(&new_product.name)?;
        validation::validate_category(new_product.category.as_deref())?;
        validation::validate_price_cents(new_product.price_cents)?;
        validation::validate_cost_cents(new_product.cost_price_cents)?;
        validation::validate_stock_quantity(new_product.quantity)?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: new_product.name.trim().to_string(),
            category: new_product.category.clone(),
            description: new_product.description.clone(),
            price_cents: new_product.price_cents,
            cost_price_cents: new_product.cost_price_cents,
            quantity: new_product.quantity,
            in_stock: new_product.quantity > 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, description,
                price_cents, cost_price_cents, quantity, in_stock,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.quantity)
        .bind(product.in_stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, description,
                   price_cents, cost_price_cents, quantity, in_stock,
                   created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all products, sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, description,
                   price_cents, cost_price_cents, quantity, in_stock,
                   created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Applies a partial update to a product.
    ///
    /// A missing product is not an error: the call returns `Ok(None)` and
    /// writes nothing, so callers can treat "update something that is
    /// already gone" as a no-op.
    ///
    /// ## Arguments
    /// * `id` - Product UUID
    /// * `patch` - Fields to change; `None` fields stay as they are
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - The updated product
    /// * `Ok(None)` - No product with this ID
    /// * `Err(DbError::InvalidInput)` - A supplied field failed validation
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Option<Product>> {
        if let Some(name) = &patch.name {
            validation::validate_product_name(name)?;
        }
        if let Some(category) = &patch.category {
            validation::validate_category(category.as_deref())?;
        }
        if let Some(price_cents) = patch.price_cents {
            validation::validate_price_cents(price_cents)?;
        }
        if let Some(cost_price_cents) = patch.cost_price_cents {
            validation::validate_cost_cents(cost_price_cents)?;
        }
        if let Some(quantity) = patch.quantity {
            validation::validate_stock_quantity(quantity)?;
        }

        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, description,
                   price_cents, cost_price_cents, quantity, in_stock,
                   created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut product = match current {
            Some(product) => product,
            None => {
                debug!(id = %id, "Update target not found, nothing to do");
                return Ok(None);
            }
        };

        patch.apply_to(&mut product);
        product.updated_at = Utc::now();

        debug!(id = %product.id, "Updating product");

        sqlx::query(
            r#"
            UPDATE products SET
                name = ?,
                category = ?,
                description = ?,
                price_cents = ?,
                cost_price_cents = ?,
                quantity = ?,
                in_stock = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.quantity)
        .bind(product.in_stock)
        .bind(product.updated_at)
        .bind(&product.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(product))
    }

    /// Removes a product from the catalog.
    ///
    /// Historical sale lines that referenced this product keep their
    /// snapshots; the foreign key detaches them (product_id becomes NULL).
    ///
    /// ## Returns
    /// * `Ok(true)` - Product existed and was deleted
    /// * `Ok(false)` - No product with this ID
    pub async fn remove(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Removing product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use hyperspin_core::ValidationError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn cola(quantity: i64) -> NewProduct {
        NewProduct {
            name: "Cola 330ml".to_string(),
            category: Some("Beverages".to_string()),
            description: None,
            price_cents: 250,
            cost_price_cents: 120,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.add(&cola(10)).await.unwrap();
        assert_eq!(product.name, "Cola 330ml");
        assert_eq!(product.quantity, 10);
        assert!(product.in_stock);

        let found = repo.get(&product.id).await.unwrap().unwrap();
        assert_eq!(found.id, product.id);
        assert_eq!(found.price_cents, 250);
        assert_eq!(found.category.as_deref(), Some("Beverages"));

        assert!(repo.get("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_zero_quantity_is_out_of_stock() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.add(&cola(0)).await.unwrap();
        assert_eq!(product.quantity, 0);
        assert!(!product.in_stock);

        let found = repo.get(&product.id).await.unwrap().unwrap();
        assert!(!found.in_stock);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input() {
        let db = test_db().await;
        let repo = db.products();

        let mut bad = cola(5);
        bad.price_cents = -1;
        let err = repo.add(&bad).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidInput(ValidationError::MustBeNonNegative { .. })
        ));

        let mut bad = cola(5);
        bad.quantity = -3;
        assert!(matches!(
            repo.add(&bad).await.unwrap_err(),
            DbError::InvalidInput(_)
        ));

        let mut bad = cola(5);
        bad.name = "   ".to_string();
        assert!(matches!(
            repo.add(&bad).await.unwrap_err(),
            DbError::InvalidInput(ValidationError::Required { .. })
        ));

        // Nothing slipped through
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = test_db().await;
        let repo = db.products();

        let mut zebra = cola(1);
        zebra.name = "Zebra Cakes".to_string();
        repo.add(&zebra).await.unwrap();

        let mut apple = cola(1);
        apple.name = "Apple Juice".to_string();
        repo.add(&apple).await.unwrap();

        let products = repo.list().await.unwrap();
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Apple Juice", "Zebra Cakes"]);
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.add(&cola(10)).await.unwrap();

        let patch = ProductPatch {
            price_cents: Some(300),
            quantity: Some(0),
            ..Default::default()
        };
        let updated = repo.update(&product.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.price_cents, 300);
        assert_eq!(updated.quantity, 0);
        assert!(!updated.in_stock);

        // Persisted, not just returned
        let found = repo.get(&product.id).await.unwrap().unwrap();
        assert_eq!(found.price_cents, 300);
        assert!(!found.in_stock);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_silent() {
        let db = test_db().await;
        let repo = db.products();

        let patch = ProductPatch {
            price_cents: Some(300),
            ..Default::default()
        };
        let result = repo.update("no-such-id", &patch).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_patch() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.add(&cola(10)).await.unwrap();

        let patch = ProductPatch {
            quantity: Some(-5),
            ..Default::default()
        };
        assert!(matches!(
            repo.update(&product.id, &patch).await.unwrap_err(),
            DbError::InvalidInput(_)
        ));

        // Original row untouched
        let found = repo.get(&product.id).await.unwrap().unwrap();
        assert_eq!(found.quantity, 10);
    }

    #[tokio::test]
    async fn test_remove() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.add(&cola(10)).await.unwrap();

        assert!(repo.remove(&product.id).await.unwrap());
        assert!(repo.get(&product.id).await.unwrap().is_none());

        // Second delete reports false
        assert!(!repo.remove(&product.id).await.unwrap());
    }
}
