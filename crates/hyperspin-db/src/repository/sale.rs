//! # Sale Repository
//!
//! Read access to sales and their line items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CHECKOUT (single transaction, see checkout.rs)                     │
//! │     └── Sale + SaleItems + Payment written together                    │
//! │                                                                         │
//! │  2. READ (this repository)                                             │
//! │     └── get() / items() → receipt details                              │
//! │     └── list() → history, newest first                                 │
//! │     └── list_recent() → completed sales for the dashboard              │
//! │                                                                         │
//! │  Sales are immutable once written. There is no update path here.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;

use crate::error::DbResult;
use hyperspin_core::{Sale, SaleItem, SaleStatus};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Sale))` - Sale found
    /// * `Ok(None)` - Sale not found
    pub async fn get(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_amount_cents, tax_cents, discount_cents,
                   status, created_at
            FROM sales
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets the line items for a sale, in the order they were rung up.
    pub async fn items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name_snapshot,
                   quantity, unit_price_cents, cost_price_cents
            FROM sale_items
            WHERE sale_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists all sales, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_amount_cents, tax_cents, discount_cents,
                   status, created_at
            FROM sales
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the most recent completed sales, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_amount_cents, tax_cents, discount_cents,
                   status, created_at
            FROM sales
            WHERE status = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Counts total sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
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
    use crate::pool::{Database, DbConfig};
    use hyperspin_core::{Money, NewProduct, PaymentMethod, SaleLine};
    use std::time::Duration;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn sell_one(db: &Database, product_id: &str, quantity: i64) -> Sale {
        db.checkout()
            .process_sale(
                &[SaleLine::new(product_id, quantity)],
                PaymentMethod::Cash,
                Some(Money::from_cents(100_000)),
            )
            .await
            .unwrap()
            .sale
    }

    #[tokio::test]
    async fn test_get_and_items() {
        let db = test_db().await;
        let product = db
            .products()
            .add(&NewProduct {
                name: "Cola 330ml".to_string(),
                category: Some("Beverages".to_string()),
                description: None,
                price_cents: 250,
                cost_price_cents: 120,
                quantity: 10,
            })
            .await
            .unwrap();

        let sale = sell_one(&db, &product.id, 2).await;

        let found = db.sales().get(&sale.id).await.unwrap().unwrap();
        assert_eq!(found.total_amount_cents, 500);
        assert_eq!(found.status, SaleStatus::Completed);

        let items = db.sales().items(&sale.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name_snapshot, "Cola 330ml");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit_price_cents, 250);

        assert!(db.sales().get("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = test_db().await;
        let product = db
            .products()
            .add(&NewProduct {
                name: "Cola 330ml".to_string(),
                category: None,
                description: None,
                price_cents: 250,
                cost_price_cents: 120,
                quantity: 100,
            })
            .await
            .unwrap();

        let first = sell_one(&db, &product.id, 1).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = sell_one(&db, &product.id, 1).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let third = sell_one(&db, &product.id, 1).await;

        let sales = db.sales().list().await.unwrap();
        let ids: Vec<&str> = sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]
        );

        let recent = db.sales().list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, third.id);
        assert_eq!(recent[1].id, second.id);

        assert_eq!(db.sales().count().await.unwrap(), 3);
    }
}
