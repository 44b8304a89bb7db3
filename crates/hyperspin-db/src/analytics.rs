//! # Analytics Engine
//!
//! Read-only aggregations over products, sales, and payments.
//!
//! ## Metric Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Analytics Reads                                  │
//! │                                                                         │
//! │   products ──────► inventory_value     (live price × quantity)         │
//! │            ──────► low_stock_count     (quantity strictly below N)     │
//! │            ──────► stock_distribution  (top N by quantity)             │
//! │            ──────► category_distribution                               │
//! │                                                                         │
//! │   sales ─────────► revenue, recent_sales, sales_trend                  │
//! │   sale_items ────► profit              (frozen price snapshots)        │
//! │   payments ──────► payment_method_distribution                         │
//! │                                                                         │
//! │   dashboard_snapshot() reads all of the above inside one               │
//! │   transaction, so every number describes the same moment.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Only completed sales and completed payments count towards revenue,
//!   profit, trends, and method breakdowns.
//! - Profit reads the price snapshots on sale lines, never the catalog,
//!   so later price edits and deletions don't rewrite history.
//! - Nothing here writes. Every failure surfaces as
//!   [`AnalyticsUnavailable`] with the storage cause attached.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{AnalyticsUnavailable, DbResult};
use hyperspin_core::{
    CategorySlice, DashboardParams, DashboardSnapshot, Granularity, MethodBreakdown, Money,
    PaymentStatus, Sale, SaleStatus, StockLevel, TimeWindow, TrendPoint, LOW_STOCK_THRESHOLD,
};

/// Engine answering reporting questions about the store.
///
/// ## Usage
/// ```rust,ignore
/// let analytics = AnalyticsEngine::new(pool);
///
/// let value = analytics.inventory_value().await?;
/// let margin = analytics.margin(TimeWindow::unbounded()).await?;
/// println!("stock worth {}, margin {:.1}%", value, margin);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    pool: SqlitePool,
}

impl AnalyticsEngine {
    /// Creates a new AnalyticsEngine.
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsEngine { pool }
    }

    /// Current inventory value: Σ selling price × quantity over the live
    /// catalog.
    pub async fn inventory_value(&self) -> Result<Money, AnalyticsUnavailable> {
        let mut conn = self.pool.acquire().await?;
        let cents = Self::inventory_value_on(&mut conn).await?;
        Ok(Money::from_cents(cents))
    }

    /// Number of products with quantity strictly below the threshold.
    ///
    /// `None` uses the default threshold of 5. Out-of-stock products
    /// count too.
    pub async fn low_stock_count(
        &self,
        threshold: Option<i64>,
    ) -> Result<i64, AnalyticsUnavailable> {
        let threshold = threshold.unwrap_or(LOW_STOCK_THRESHOLD);
        let mut conn = self.pool.acquire().await?;
        let count = Self::low_stock_count_on(&mut conn, threshold).await?;
        Ok(count)
    }

    /// Revenue from completed sales inside the window, bounds inclusive.
    pub async fn revenue(&self, window: TimeWindow) -> Result<Money, AnalyticsUnavailable> {
        let mut conn = self.pool.acquire().await?;
        let cents = Self::revenue_on(&mut conn, window).await?;
        Ok(Money::from_cents(cents))
    }

    /// Profit from completed sales inside the window, computed from the
    /// price snapshots frozen on each sale line.
    pub async fn profit(&self, window: TimeWindow) -> Result<Money, AnalyticsUnavailable> {
        let mut conn = self.pool.acquire().await?;
        let cents = Self::profit_on(&mut conn, window).await?;
        Ok(Money::from_cents(cents))
    }

    /// Profit as a percentage of revenue over the window.
    ///
    /// Both numbers are read in one transaction so they describe the same
    /// set of sales. Returns 0.0 when there is no revenue.
    pub async fn margin(&self, window: TimeWindow) -> Result<f64, AnalyticsUnavailable> {
        let mut tx = self.pool.begin().await?;
        let revenue = Self::revenue_on(&mut tx, window).await?;
        let profit = Self::profit_on(&mut tx, window).await?;
        tx.commit().await?;

        Ok(margin_percent(revenue, profit))
    }

    /// The `top_n` products by quantity on hand, descending and with ties
    /// broken by id. Out-of-stock products are excluded.
    pub async fn stock_distribution(
        &self,
        top_n: i64,
    ) -> Result<Vec<StockLevel>, AnalyticsUnavailable> {
        let mut conn = self.pool.acquire().await?;
        let levels = Self::stock_distribution_on(&mut conn, top_n).await?;
        Ok(levels)
    }

    /// Product counts per category, largest first. Products without a
    /// category are grouped under "Uncategorized".
    pub async fn category_distribution(&self) -> Result<Vec<CategorySlice>, AnalyticsUnavailable> {
        let mut conn = self.pool.acquire().await?;
        let slices = Self::category_distribution_on(&mut conn).await?;
        Ok(slices)
    }

    /// The most recent completed sales, newest first.
    pub async fn recent_sales(&self, limit: i64) -> Result<Vec<Sale>, AnalyticsUnavailable> {
        let mut conn = self.pool.acquire().await?;
        let sales = Self::recent_sales_on(&mut conn, limit).await?;
        Ok(sales)
    }

    /// Revenue and sale counts bucketed by day, week, or month, oldest
    /// bucket first. Buckets without sales are not emitted.
    ///
    /// An unbounded window defaults to the 30 days ending now; a missing
    /// start defaults to 30 days before the end.
    pub async fn sales_trend(
        &self,
        granularity: Granularity,
        window: TimeWindow,
    ) -> Result<Vec<TrendPoint>, AnalyticsUnavailable> {
        let mut conn = self.pool.acquire().await?;
        let points = Self::sales_trend_on(&mut conn, granularity, window).await?;
        Ok(points)
    }

    /// Count and settled amount per payment method inside the window.
    /// Only completed payments count.
    pub async fn payment_method_distribution(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<MethodBreakdown>, AnalyticsUnavailable> {
        let mut conn = self.pool.acquire().await?;
        let breakdown = Self::payment_methods_on(&mut conn, window).await?;
        Ok(breakdown)
    }

    /// Collects every dashboard metric in one transaction.
    ///
    /// A sale committing halfway through the reads cannot skew the result:
    /// either all metrics see it or none do.
    ///
    /// ## Arguments
    /// * `params` - Thresholds, limits, trend granularity, and the window
    ///   applied to revenue, profit, trend, and payment metrics
    pub async fn dashboard_snapshot(
        &self,
        params: &DashboardParams,
    ) -> Result<DashboardSnapshot, AnalyticsUnavailable> {
        debug!(?params, "Building dashboard snapshot");

        let mut tx = self.pool.begin().await?;

        let inventory_value_cents = Self::inventory_value_on(&mut tx).await?;
        let low_stock_count =
            Self::low_stock_count_on(&mut tx, params.low_stock_threshold).await?;
        let total_revenue_cents = Self::revenue_on(&mut tx, params.window).await?;
        let total_profit_cents = Self::profit_on(&mut tx, params.window).await?;
        let stock_distribution =
            Self::stock_distribution_on(&mut tx, params.top_products).await?;
        let categories = Self::category_distribution_on(&mut tx).await?;
        let recent_sales = Self::recent_sales_on(&mut tx, params.recent_limit).await?;
        let sales_trend =
            Self::sales_trend_on(&mut tx, params.granularity, params.window).await?;
        let payment_methods = Self::payment_methods_on(&mut tx, params.window).await?;

        tx.commit().await?;

        Ok(DashboardSnapshot {
            inventory_value_cents,
            total_revenue_cents,
            total_profit_cents,
            margin: margin_percent(total_revenue_cents, total_profit_cents),
            low_stock_count,
            stock_distribution,
            categories,
            recent_sales,
            sales_trend,
            payment_methods,
        })
    }

    // ===== Connection-level reads, shared by the single ops and the =====
    // ===== dashboard transaction.                                   =====

    async fn inventory_value_on(conn: &mut SqliteConnection) -> DbResult<i64> {
        let cents = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(price_cents * quantity), 0) FROM products",
        )
        .fetch_one(conn)
        .await?;

        Ok(cents)
    }

    async fn low_stock_count_on(conn: &mut SqliteConnection, threshold: i64) -> DbResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM products WHERE quantity < ?")
                .bind(threshold)
                .fetch_one(conn)
                .await?;

        Ok(count)
    }

    async fn revenue_on(conn: &mut SqliteConnection, window: TimeWindow) -> DbResult<i64> {
        let cents = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(total_amount_cents), 0)
            FROM sales
            WHERE status = ?
              AND (? IS NULL OR created_at >= ?)
              AND (? IS NULL OR created_at <= ?)
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(window.start)
        .bind(window.start)
        .bind(window.end)
        .bind(window.end)
        .fetch_one(conn)
        .await?;

        Ok(cents)
    }

    async fn profit_on(conn: &mut SqliteConnection, window: TimeWindow) -> DbResult<i64> {
        let cents = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM((si.unit_price_cents - si.cost_price_cents) * si.quantity), 0)
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            WHERE s.status = ?
              AND (? IS NULL OR s.created_at >= ?)
              AND (? IS NULL OR s.created_at <= ?)
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(window.start)
        .bind(window.start)
        .bind(window.end)
        .bind(window.end)
        .fetch_one(conn)
        .await?;

        Ok(cents)
    }

    async fn stock_distribution_on(
        conn: &mut SqliteConnection,
        top_n: i64,
    ) -> DbResult<Vec<StockLevel>> {
        let levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id AS product_id, name, quantity
            FROM products
            WHERE quantity > 0
            ORDER BY quantity DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(top_n)
        .fetch_all(conn)
        .await?;

        Ok(levels)
    }

    async fn category_distribution_on(conn: &mut SqliteConnection) -> DbResult<Vec<CategorySlice>> {
        let slices = sqlx::query_as::<_, CategorySlice>(
            r#"
            SELECT COALESCE(category, 'Uncategorized') AS category,
                   COUNT(id) AS product_count
            FROM products
            GROUP BY 1
            ORDER BY product_count DESC, 1 ASC
            "#,
        )
        .fetch_all(conn)
        .await?;

        Ok(slices)
    }

    async fn recent_sales_on(conn: &mut SqliteConnection, limit: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_amount_cents, tax_cents, discount_cents, status, created_at
            FROM sales
            WHERE status = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(limit)
        .fetch_all(conn)
        .await?;

        Ok(sales)
    }

    async fn sales_trend_on(
        conn: &mut SqliteConnection,
        granularity: Granularity,
        window: TimeWindow,
    ) -> DbResult<Vec<TrendPoint>> {
        let end = window.end.unwrap_or_else(Utc::now);
        let start = window.start.unwrap_or_else(|| end - Duration::days(30));

        let sales = Self::completed_sales_in_on(conn, start, end).await?;

        // BTreeMap keys are the bucket labels, which sort chronologically
        // as strings, so iteration comes out oldest first.
        let mut buckets: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for sale in &sales {
            let label = granularity.bucket_label(&sale.created_at);
            let entry = buckets.entry(label).or_insert((0, 0));
            entry.0 += sale.total_amount_cents;
            entry.1 += 1;
        }

        Ok(buckets
            .into_iter()
            .map(|(period, (revenue_cents, sales))| TrendPoint {
                period,
                revenue_cents,
                sales,
            })
            .collect())
    }

    async fn completed_sales_in_on(
        conn: &mut SqliteConnection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_amount_cents, tax_cents, discount_cents, status, created_at
            FROM sales
            WHERE status = ? AND created_at >= ? AND created_at <= ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(start)
        .bind(end)
        .fetch_all(conn)
        .await?;

        Ok(sales)
    }

    async fn payment_methods_on(
        conn: &mut SqliteConnection,
        window: TimeWindow,
    ) -> DbResult<Vec<MethodBreakdown>> {
        let breakdown = sqlx::query_as::<_, MethodBreakdown>(
            r#"
            SELECT method,
                   COUNT(id) AS count,
                   COALESCE(SUM(amount_cents), 0) AS amount_cents
            FROM payments
            WHERE status = ?
              AND (? IS NULL OR created_at >= ?)
              AND (? IS NULL OR created_at <= ?)
            GROUP BY method
            ORDER BY method ASC
            "#,
        )
        .bind(PaymentStatus::Completed)
        .bind(window.start)
        .bind(window.start)
        .bind(window.end)
        .bind(window.end)
        .fetch_all(conn)
        .await?;

        Ok(breakdown)
    }
}

/// Profit over revenue as a percentage, 0.0 when there is no revenue.
fn margin_percent(revenue_cents: i64, profit_cents: i64) -> f64 {
    if revenue_cents == 0 {
        return 0.0;
    }
    profit_cents as f64 / revenue_cents as f64 * 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use hyperspin_core::{NewProduct, PaymentMethod, ProductPatch, SaleLine};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_product(
        db: &Database,
        name: &str,
        category: Option<&str>,
        price: i64,
        cost: i64,
        qty: i64,
    ) -> hyperspin_core::Product {
        db.products()
            .add(&NewProduct {
                name: name.to_string(),
                category: category.map(|c| c.to_string()),
                description: None,
                price_cents: price,
                cost_price_cents: cost,
                quantity: qty,
            })
            .await
            .unwrap()
    }

    /// Inserts a sale with one line directly, bypassing checkout, so the
    /// timestamp and status can be chosen freely.
    async fn seed_sale(
        db: &Database,
        id: &str,
        total: i64,
        profit: i64,
        at: DateTime<Utc>,
        status: SaleStatus,
    ) {
        sqlx::query(
            r#"
            INSERT INTO sales (id, total_amount_cents, tax_cents, discount_cents, status, created_at)
            VALUES (?, ?, 0, 0, ?, ?)
            "#,
        )
        .bind(id)
        .bind(total)
        .bind(status)
        .bind(at)
        .execute(db.pool())
        .await
        .unwrap();

        // One line of quantity 1 carrying the whole profit
        sqlx::query(
            r#"
            INSERT INTO sale_items (id, sale_id, product_id, name_snapshot, quantity, unit_price_cents, cost_price_cents)
            VALUES (?, ?, NULL, 'Seeded Line', 1, ?, ?)
            "#,
        )
        .bind(format!("{}-line", id))
        .bind(id)
        .bind(total)
        .bind(total - profit)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[test]
    fn test_margin_percent_math() {
        assert_eq!(margin_percent(0, 0), 0.0);
        assert_eq!(margin_percent(0, 500), 0.0);
        assert_eq!(margin_percent(10_000, 2500), 25.0);
        assert_eq!(margin_percent(7000, 1750), 25.0);
    }

    #[tokio::test]
    async fn test_empty_database_reads_zero() {
        let db = test_db().await;
        let analytics = db.analytics();

        assert_eq!(analytics.inventory_value().await.unwrap(), Money::zero());
        assert_eq!(analytics.low_stock_count(None).await.unwrap(), 0);
        assert_eq!(
            analytics.revenue(TimeWindow::unbounded()).await.unwrap(),
            Money::zero()
        );
        assert_eq!(
            analytics.profit(TimeWindow::unbounded()).await.unwrap(),
            Money::zero()
        );
        assert_eq!(analytics.margin(TimeWindow::unbounded()).await.unwrap(), 0.0);
        assert!(analytics.stock_distribution(5).await.unwrap().is_empty());
        assert!(analytics
            .sales_trend(Granularity::Day, TimeWindow::unbounded())
            .await
            .unwrap()
            .is_empty());
        assert!(analytics
            .payment_method_distribution(TimeWindow::unbounded())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_inventory_value_tracks_catalog() {
        let db = test_db().await;
        let analytics = db.analytics();

        add_product(&db, "Cola 330ml", Some("Beverages"), 250, 120, 10).await;
        let beans = add_product(&db, "Espresso Beans", None, 1000, 600, 2).await;

        // 250 × 10 + 1000 × 2
        assert_eq!(
            analytics.inventory_value().await.unwrap(),
            Money::from_cents(4500)
        );

        // Live view: stock edits show up immediately
        let patch = ProductPatch {
            quantity: Some(0),
            ..Default::default()
        };
        db.products().update(&beans.id, &patch).await.unwrap();

        assert_eq!(
            analytics.inventory_value().await.unwrap(),
            Money::from_cents(2500)
        );
    }

    #[tokio::test]
    async fn test_low_stock_uses_strict_threshold() {
        let db = test_db().await;
        let analytics = db.analytics();

        add_product(&db, "Empty Shelf", None, 100, 50, 0).await;
        add_product(&db, "Almost Gone", None, 100, 50, 2).await;
        add_product(&db, "At Threshold", None, 100, 50, 5).await;
        add_product(&db, "Plenty", None, 100, 50, 7).await;

        // Default threshold 5, strictly below: quantity 5 is NOT low
        assert_eq!(analytics.low_stock_count(None).await.unwrap(), 2);
        assert_eq!(analytics.low_stock_count(Some(6)).await.unwrap(), 3);
        assert_eq!(analytics.low_stock_count(Some(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_revenue_and_profit_windows() {
        let db = test_db().await;
        let analytics = db.analytics();

        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let t5 = t0 + Duration::days(5);
        let t10 = t0 + Duration::days(10);

        seed_sale(&db, "sale-a", 1000, 250, t0, SaleStatus::Completed).await;
        seed_sale(&db, "sale-b", 2000, 500, t5, SaleStatus::Completed).await;
        seed_sale(&db, "sale-c", 4000, 1000, t10, SaleStatus::Completed).await;
        // Voided sales never count, however large
        seed_sale(&db, "sale-void", 99_999, 50_000, t5, SaleStatus::Voided).await;

        let all = TimeWindow::unbounded();
        assert_eq!(analytics.revenue(all).await.unwrap(), Money::from_cents(7000));
        assert_eq!(analytics.profit(all).await.unwrap(), Money::from_cents(1750));
        assert_eq!(analytics.margin(all).await.unwrap(), 25.0);

        // Both bounds are inclusive
        let mid = TimeWindow::between(t0 + Duration::days(3), t10);
        assert_eq!(analytics.revenue(mid).await.unwrap(), Money::from_cents(6000));

        let short = TimeWindow::between(t0 + Duration::days(3), t0 + Duration::days(9));
        assert_eq!(
            analytics.revenue(short).await.unwrap(),
            Money::from_cents(2000)
        );

        let exact = TimeWindow::between(t5, t5);
        assert_eq!(
            analytics.revenue(exact).await.unwrap(),
            Money::from_cents(2000)
        );
        assert_eq!(analytics.profit(exact).await.unwrap(), Money::from_cents(500));

        let tail = TimeWindow::since(t0 + Duration::days(6));
        assert_eq!(analytics.revenue(tail).await.unwrap(), Money::from_cents(4000));

        let head = TimeWindow::until(t0 + Duration::days(4));
        assert_eq!(analytics.revenue(head).await.unwrap(), Money::from_cents(1000));

        // A window with no sales has no revenue, so margin is defined as 0
        let empty = TimeWindow::between(t0 - Duration::days(10), t0 - Duration::days(1));
        assert_eq!(analytics.revenue(empty).await.unwrap(), Money::zero());
        assert_eq!(analytics.margin(empty).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_profit_reads_snapshots_not_catalog() {
        let db = test_db().await;
        let analytics = db.analytics();

        let product = add_product(&db, "Espresso Beans", None, 1000, 600, 5).await;
        db.checkout()
            .process_sale(
                &[SaleLine::new(&product.id, 3)],
                PaymentMethod::Cash,
                Some(Money::from_cents(3000)),
            )
            .await
            .unwrap();

        // (1000 − 600) × 3
        let all = TimeWindow::unbounded();
        assert_eq!(analytics.profit(all).await.unwrap(), Money::from_cents(1200));

        // Repricing the product must not move historical profit
        let patch = ProductPatch {
            price_cents: Some(9999),
            cost_price_cents: Some(1),
            ..Default::default()
        };
        db.products().update(&product.id, &patch).await.unwrap();
        assert_eq!(analytics.profit(all).await.unwrap(), Money::from_cents(1200));

        // Neither must deleting it
        db.products().remove(&product.id).await.unwrap();
        assert_eq!(analytics.profit(all).await.unwrap(), Money::from_cents(1200));
        assert_eq!(analytics.revenue(all).await.unwrap(), Money::from_cents(3000));
    }

    #[tokio::test]
    async fn test_stock_distribution_orders_and_limits() {
        let db = test_db().await;
        let analytics = db.analytics();

        let top = add_product(&db, "Plenty", None, 100, 50, 7).await;
        let tie_a = add_product(&db, "Tie One", None, 100, 50, 5).await;
        let tie_b = add_product(&db, "Tie Two", None, 100, 50, 5).await;
        let low = add_product(&db, "Almost Gone", None, 100, 50, 3).await;
        add_product(&db, "Empty Shelf", None, 100, 50, 0).await;

        let levels = analytics.stock_distribution(10).await.unwrap();

        // Zero-quantity products are not part of the distribution
        assert_eq!(levels.len(), 4);
        assert_eq!(levels[0].product_id, top.id);
        assert_eq!(levels[0].quantity, 7);

        // Equal quantities order by id
        let (first_tie, second_tie) = if tie_a.id < tie_b.id {
            (&tie_a, &tie_b)
        } else {
            (&tie_b, &tie_a)
        };
        assert_eq!(levels[1].product_id, first_tie.id);
        assert_eq!(levels[2].product_id, second_tie.id);
        assert_eq!(levels[3].product_id, low.id);

        let top_two = analytics.stock_distribution(2).await.unwrap();
        assert_eq!(top_two.len(), 2);
        assert_eq!(top_two[0].product_id, top.id);
    }

    #[tokio::test]
    async fn test_category_distribution_groups_uncategorized() {
        let db = test_db().await;
        let analytics = db.analytics();

        add_product(&db, "Cola 330ml", Some("Beverages"), 250, 120, 10).await;
        add_product(&db, "Orange Juice", Some("Beverages"), 300, 150, 8).await;
        add_product(&db, "Crisps", Some("Snacks"), 180, 90, 12).await;
        add_product(&db, "Mystery Item", None, 500, 250, 1).await;

        let slices = analytics.category_distribution().await.unwrap();

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].category, "Beverages");
        assert_eq!(slices[0].product_count, 2);
        // Ties order alphabetically
        assert_eq!(slices[1].category, "Snacks");
        assert_eq!(slices[1].product_count, 1);
        assert_eq!(slices[2].category, "Uncategorized");
        assert_eq!(slices[2].product_count, 1);
    }

    #[tokio::test]
    async fn test_sales_trend_buckets() {
        let db = test_db().await;
        let analytics = db.analytics();

        let morning = Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 1, 3, 18, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 1, 4, 9, 0, 0).unwrap();
        let next_month = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();

        seed_sale(&db, "sale-a", 100, 10, morning, SaleStatus::Completed).await;
        seed_sale(&db, "sale-b", 200, 20, evening, SaleStatus::Completed).await;
        seed_sale(&db, "sale-c", 400, 40, next_day, SaleStatus::Completed).await;
        seed_sale(&db, "sale-d", 800, 80, next_month, SaleStatus::Completed).await;

        let window = TimeWindow::between(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        );

        let daily = analytics
            .sales_trend(Granularity::Day, window)
            .await
            .unwrap();
        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0].period, "2024-01-03");
        assert_eq!(daily[0].revenue_cents, 300);
        assert_eq!(daily[0].sales, 2);
        assert_eq!(daily[1].period, "2024-01-04");
        assert_eq!(daily[1].revenue_cents, 400);
        assert_eq!(daily[2].period, "2024-02-10");

        let monthly = analytics
            .sales_trend(Granularity::Month, window)
            .await
            .unwrap();
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].period, "2024-01");
        assert_eq!(monthly[0].revenue_cents, 700);
        assert_eq!(monthly[0].sales, 3);
        assert_eq!(monthly[1].period, "2024-02");
        assert_eq!(monthly[1].revenue_cents, 800);

        let weekly = analytics
            .sales_trend(Granularity::Week, window)
            .await
            .unwrap();
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].period, "2024-01");
        assert_eq!(weekly[0].sales, 3);
        assert_eq!(weekly[1].period, "2024-06");
        assert_eq!(weekly[1].sales, 1);
    }

    #[tokio::test]
    async fn test_sales_trend_default_window_is_thirty_days() {
        let db = test_db().await;
        let analytics = db.analytics();

        let now = Utc::now();
        seed_sale(
            &db,
            "sale-old",
            5000,
            500,
            now - Duration::days(40),
            SaleStatus::Completed,
        )
        .await;
        seed_sale(
            &db,
            "sale-new",
            700,
            70,
            now - Duration::days(1),
            SaleStatus::Completed,
        )
        .await;

        let trend = analytics
            .sales_trend(Granularity::Day, TimeWindow::unbounded())
            .await
            .unwrap();

        // The 40-day-old sale falls outside the default window
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].revenue_cents, 700);
        assert_eq!(trend[0].sales, 1);
    }

    #[tokio::test]
    async fn test_payment_method_distribution() {
        let db = test_db().await;
        let analytics = db.analytics();

        let product = add_product(&db, "Cola 330ml", None, 250, 120, 20).await;
        let checkout = db.checkout();

        checkout
            .process_sale(
                &[SaleLine::new(&product.id, 2)],
                PaymentMethod::Cash,
                Some(Money::from_cents(1000)),
            )
            .await
            .unwrap();
        checkout
            .process_sale(
                &[SaleLine::new(&product.id, 1)],
                PaymentMethod::Cash,
                Some(Money::from_cents(250)),
            )
            .await
            .unwrap();
        checkout
            .process_sale(&[SaleLine::new(&product.id, 1)], PaymentMethod::CreditCard, None)
            .await
            .unwrap();

        // A failed payment must not contribute
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO payments (id, sale_id, amount_cents, currency, method, status, transaction_id, created_at, updated_at)
            VALUES (?, NULL, 99999, 'USD', ?, ?, NULL, ?, ?)
            "#,
        )
        .bind("pay-failed")
        .bind(PaymentMethod::Paypal)
        .bind(PaymentStatus::Failed)
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        let breakdown = analytics
            .payment_method_distribution(TimeWindow::unbounded())
            .await
            .unwrap();

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].method, PaymentMethod::Cash);
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[0].amount_cents, 750);
        assert_eq!(breakdown[1].method, PaymentMethod::CreditCard);
        assert_eq!(breakdown[1].count, 1);
        assert_eq!(breakdown[1].amount_cents, 250);
    }

    #[tokio::test]
    async fn test_dashboard_snapshot_composes() {
        let db = test_db().await;
        let analytics = db.analytics();

        let cola = add_product(&db, "Cola 330ml", Some("Beverages"), 250, 120, 7).await;
        add_product(&db, "Espresso Beans", None, 1000, 600, 6).await;
        add_product(&db, "Crisps", Some("Snacks"), 300, 100, 2).await;

        db.checkout()
            .process_sale(
                &[SaleLine::new(&cola.id, 2)],
                PaymentMethod::Cash,
                Some(Money::from_cents(500)),
            )
            .await
            .unwrap();

        let snapshot = analytics
            .dashboard_snapshot(&DashboardParams::default())
            .await
            .unwrap();

        // 250 × 5 + 1000 × 6 + 300 × 2, after the sale took two colas
        assert_eq!(snapshot.inventory_value_cents, 7850);
        assert_eq!(snapshot.total_revenue_cents, 500);
        assert_eq!(snapshot.total_profit_cents, 260);
        assert!((snapshot.margin - 52.0).abs() < 1e-9);
        assert_eq!(snapshot.low_stock_count, 1);

        assert_eq!(snapshot.stock_distribution.len(), 3);
        assert_eq!(snapshot.stock_distribution[0].quantity, 6);

        assert_eq!(snapshot.categories.len(), 3);
        assert_eq!(snapshot.categories[0].category, "Beverages");

        assert_eq!(snapshot.recent_sales.len(), 1);
        assert_eq!(snapshot.recent_sales[0].total_amount_cents, 500);

        assert_eq!(snapshot.sales_trend.len(), 1);
        assert_eq!(snapshot.sales_trend[0].revenue_cents, 500);

        assert_eq!(snapshot.payment_methods.len(), 1);
        assert_eq!(snapshot.payment_methods[0].method, PaymentMethod::Cash);

        // The Money accessors mirror the cents fields
        assert_eq!(snapshot.inventory_value(), Money::from_cents(7850));
        assert_eq!(snapshot.total_revenue(), Money::from_cents(500));
        assert_eq!(snapshot.total_profit(), Money::from_cents(260));
    }
}
