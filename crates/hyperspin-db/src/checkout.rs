//! # Checkout Engine
//!
//! Processes a sale as one atomic transaction.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     process_sale() Flow                                 │
//! │                                                                         │
//! │  Validate input (line count, quantities, cash tender present)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  For each line:                                                        │
//! │    ├── Load product (cached per sale)   → ProductNotFound?             │
//! │    ├── available = quantity − reserved  → InsufficientStock?           │
//! │    ├── total += price × qty                                            │
//! │    └── snapshot name / price / cost                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cash? tendered >= total                → InsufficientPayment?         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  For each product: guarded decrement                                   │
//! │    UPDATE ... WHERE id = ? AND quantity >= ?                           │
//! │    └── 0 rows? stock moved under us     → ConcurrentStockConflict      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT sale, sale_items, payment                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ── any error above drops the transaction → full rollback       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! The sale row, its line items, the stock decrements, and the payment
//! are all writes of the same transaction. A failure at any step leaves
//! the database exactly as it was before the call. Change due is computed
//! and returned on the receipt but never persisted.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CheckoutError, DbResult};
use hyperspin_core::{
    validation, CoreError, Money, Payment, PaymentMethod, PaymentStatus, Product, Sale, SaleItem,
    SaleLine, SaleReceipt, SaleStatus, ValidationError, DEFAULT_CURRENCY,
};

/// A line priced and snapshotted, waiting for its INSERT.
struct PendingLine {
    product_id: String,
    name_snapshot: String,
    quantity: i64,
    unit_price_cents: i64,
    cost_price_cents: i64,
}

/// Engine that turns a list of requested lines into a committed sale.
///
/// ## Usage
/// ```rust,ignore
/// let engine = CheckoutEngine::new(pool);
///
/// let receipt = engine
///     .process_sale(
///         &[SaleLine::new(product_id, 3)],
///         PaymentMethod::Cash,
///         Some(Money::from_cents(3000)),
///     )
///     .await?;
///
/// println!("change due: {}", receipt.change());
/// ```
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    /// Creates a new CheckoutEngine.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Processes a sale: checks stock, decrements it, and records the
    /// sale, its line items, and the payment in one transaction.
    ///
    /// Duplicate lines for the same product are kept as separate line
    /// items, but availability is checked against the quantity left
    /// after earlier lines of this sale reserved theirs.
    ///
    /// ## Arguments
    /// * `lines` - Requested products and quantities (1..=100 lines)
    /// * `method` - How the customer pays
    /// * `tendered` - Cash handed over; required for cash, ignored otherwise
    ///
    /// ## Returns
    /// * `Ok(SaleReceipt)` - Committed sale with items, payment, change due
    /// * `Err(CheckoutError)` - Nothing was written; see the variant for why
    pub async fn process_sale(
        &self,
        lines: &[SaleLine],
        method: PaymentMethod,
        tendered: Option<Money>,
    ) -> Result<SaleReceipt, CheckoutError> {
        validation::validate_line_count(lines.len())?;
        for line in lines {
            validation::validate_line_quantity(line.quantity)?;
        }
        if method.requires_tender() && tendered.is_none() {
            return Err(ValidationError::Required {
                field: "amount_tendered".to_string(),
            }
            .into());
        }

        debug!(lines = lines.len(), method = ?method, "Starting checkout");

        let mut tx = self.pool.begin().await?;

        // Phase 1: resolve products, reserve stock line by line, price
        // each line from the current catalog price.
        let mut catalog: HashMap<String, Product> = HashMap::new();
        let mut reserved: HashMap<String, i64> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        let mut pending: Vec<PendingLine> = Vec::new();
        let mut total = Money::zero();

        for line in lines {
            if !catalog.contains_key(&line.product_id) {
                let product = Self::fetch_product(&mut tx, &line.product_id)
                    .await?
                    .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

                debug!(
                    id = %product.id,
                    quantity = product.quantity,
                    "Loaded product for sale"
                );
                order.push(line.product_id.clone());
                catalog.insert(line.product_id.clone(), product);
            }

            let product = &catalog[&line.product_id];
            let already_reserved = reserved.get(&line.product_id).copied().unwrap_or(0);
            let available = product.quantity - already_reserved;

            if !product.in_stock || available < line.quantity {
                return Err(CoreError::InsufficientStock {
                    name: product.name.clone(),
                    available,
                    requested: line.quantity,
                }
                .into());
            }

            total += product.price().multiply_quantity(line.quantity);
            pending.push(PendingLine {
                product_id: product.id.clone(),
                name_snapshot: product.name.clone(),
                quantity: line.quantity,
                unit_price_cents: product.price_cents,
                cost_price_cents: product.cost_price_cents,
            });
            *reserved.entry(line.product_id.clone()).or_insert(0) += line.quantity;
        }

        // Phase 2: cash must cover the total. Change is reported on the
        // receipt only.
        let change = match tendered {
            Some(t) if method.requires_tender() => {
                if t < total {
                    return Err(CoreError::InsufficientPayment {
                        required: total,
                        tendered: t,
                    }
                    .into());
                }
                t - total
            }
            _ => Money::zero(),
        };

        // Phase 3: guarded decrements. The WHERE clause re-checks stock,
        // so a concurrent sale that took the units first shows up as zero
        // affected rows here.
        for product_id in &order {
            let take = reserved[product_id];
            let updated = Self::decrement_stock(&mut tx, product_id, take).await?;

            if !updated {
                let name = catalog[product_id].name.clone();
                debug!(id = %product_id, take, "Stock recheck failed, aborting sale");
                return Err(CoreError::ConcurrentStockConflict { name }.into());
            }
        }

        // Phase 4: record sale, line items, payment.
        let now = Utc::now();

        let sale = Sale {
            id: generate_id(),
            total_amount_cents: total.cents(),
            tax_cents: 0,
            discount_cents: 0,
            status: SaleStatus::Completed,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, total_amount_cents, tax_cents, discount_cents,
                status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.total_amount_cents)
        .bind(sale.tax_cents)
        .bind(sale.discount_cents)
        .bind(sale.status)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(pending.len());
        for line in pending {
            let item = SaleItem {
                id: generate_id(),
                sale_id: sale.id.clone(),
                product_id: Some(line.product_id),
                name_snapshot: line.name_snapshot,
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                cost_price_cents: line.cost_price_cents,
            };

            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, name_snapshot,
                    quantity, unit_price_cents, cost_price_cents
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.cost_price_cents)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        let payment = Payment {
            id: generate_id(),
            sale_id: Some(sale.id.clone()),
            amount_cents: total.cents(),
            currency: DEFAULT_CURRENCY.to_string(),
            method,
            status: PaymentStatus::Completed,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, sale_id, amount_cents, currency, method, status,
                transaction_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.sale_id)
        .bind(payment.amount_cents)
        .bind(&payment.currency)
        .bind(payment.method)
        .bind(payment.status)
        .bind(&payment.transaction_id)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            total = %total,
            lines = items.len(),
            method = ?method,
            "Sale completed"
        );

        Ok(SaleReceipt {
            sale,
            items,
            payment,
            change_cents: change.cents(),
        })
    }

    /// Loads a product inside the sale transaction.
    async fn fetch_product(
        tx: &mut Transaction<'_, Sqlite>,
        product_id: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, description,
                   price_cents, cost_price_cents, quantity, in_stock,
                   created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(product)
    }

    /// Decrements stock with a quantity recheck in the WHERE clause.
    ///
    /// Returns `false` when the row no longer has `take` units, which
    /// means another writer got there between our availability check and
    /// this statement.
    async fn decrement_stock(
        tx: &mut Transaction<'_, Sqlite>,
        product_id: &str,
        take: i64,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - ?,
                in_stock = CASE WHEN quantity - ? > 0 THEN 1 ELSE 0 END,
                updated_at = ?
            WHERE id = ? AND quantity >= ?
            "#,
        )
        .bind(take)
        .bind(take)
        .bind(now)
        .bind(product_id)
        .bind(take)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Helper to generate IDs for sales, items, and payments.
fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
