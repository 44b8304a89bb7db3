//! # Payment Repository
//!
//! Read access to payment records.
//!
//! Payments are written by the checkout engine in the same transaction
//! as their sale, so this repository only reads. Every query returns
//! payments newest first, matching how the payment history screen
//! displays them.

use sqlx::SqlitePool;

use crate::error::DbResult;
use hyperspin_core::Payment;

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Gets a payment by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Payment))` - Payment found
    /// * `Ok(None)` - Payment not found
    pub async fn get(&self, id: &str) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, amount_cents, currency, method, status,
                   transaction_id, created_at, updated_at
            FROM payments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Lists all payments, newest first.
    pub async fn list(&self) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, amount_cents, currency, method, status,
                   transaction_id, created_at, updated_at
            FROM payments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Lists the payments attached to one sale, newest first.
    pub async fn list_for_sale(&self, sale_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, amount_cents, currency, method, status,
                   transaction_id, created_at, updated_at
            FROM payments
            WHERE sale_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Counts total payments (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
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
    use hyperspin_core::{Money, NewProduct, PaymentMethod, PaymentStatus, SaleLine};
    use std::time::Duration;

    async fn test_db_with_product() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
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
        (db, product.id)
    }

    #[tokio::test]
    async fn test_get_payment() {
        let (db, product_id) = test_db_with_product().await;

        let receipt = db
            .checkout()
            .process_sale(
                &[SaleLine::new(&product_id, 2)],
                PaymentMethod::CreditCard,
                None,
            )
            .await
            .unwrap();

        let payment = db
            .payments()
            .get(&receipt.payment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.amount_cents, 500);
        assert_eq!(payment.method, PaymentMethod::CreditCard);
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.currency, "USD");
        assert_eq!(payment.sale_id.as_deref(), Some(receipt.sale.id.as_str()));

        assert!(db.payments().get("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (db, product_id) = test_db_with_product().await;

        let first = db
            .checkout()
            .process_sale(&[SaleLine::new(&product_id, 1)], PaymentMethod::Paypal, None)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = db
            .checkout()
            .process_sale(
                &[SaleLine::new(&product_id, 1)],
                PaymentMethod::Cash,
                Some(Money::from_cents(250)),
            )
            .await
            .unwrap();

        let payments = db.payments().list().await.unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].id, second.payment.id);
        assert_eq!(payments[1].id, first.payment.id);

        let for_sale = db.payments().list_for_sale(&first.sale.id).await.unwrap();
        assert_eq!(for_sale.len(), 1);
        assert_eq!(for_sale[0].id, first.payment.id);

        assert_eq!(db.payments().count().await.unwrap(), 2);
    }
}
