//! # Domain Types
//!
//! Core domain types used throughout HyperSpin.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  status         │   │  sale_id (FK)   │       │
//! │  │  price_cents    │   │  total_amount   │   │  method         │       │
//! │  │  quantity       │   │  created_at     │   │  amount_cents   │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │ 1:N                                   │
//! │                        ┌────────▼────────┐                              │
//! │                        │    SaleItem     │                              │
//! │                        │  ─────────────  │                              │
//! │                        │  name_snapshot  │  ◄── frozen at sale time     │
//! │                        │  unit_price     │                              │
//! │                        │  cost_price     │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `SaleItem` copies the product's name, unit price, and cost price at the
//! moment of sale. Later price edits or product deletions never rewrite
//! history: profit reports stay stable because they read only snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on receipts.
    pub name: String,

    /// Optional category for grouping ("Beverages", "Snacks", ...).
    pub category: Option<String>,

    /// Optional free-form description.
    pub description: Option<String>,

    /// Selling price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Acquisition cost in cents (for profit calculations).
    pub cost_price_cents: i64,

    /// Current stock level. Never negative.
    pub quantity: i64,

    /// Availability flag, always equal to `quantity > 0`.
    ///
    /// Stored redundantly so listings can filter on it directly. Every
    /// write path recomputes it from the quantity.
    pub in_stock: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the acquisition cost as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Checks whether the product can cover the requested quantity.
    pub fn can_fill(&self, requested: i64) -> bool {
        self.in_stock && self.quantity >= requested
    }
}

/// Input for creating a product. IDs and timestamps are assigned by the
/// repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price_cents: i64,
    pub cost_price_cents: i64,
    pub quantity: i64,
}

/// Partial update for a product. `None` fields are left untouched.
///
/// `category` and `description` are doubly optional: the outer `None`
/// means "keep as is", `Some(None)` means "clear the field".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    pub cost_price_cents: Option<i64>,
    pub quantity: Option<i64>,
}

impl ProductPatch {
    /// Applies the patch to a product in place.
    ///
    /// `in_stock` is always recomputed from the resulting quantity, so the
    /// `in_stock == (quantity > 0)` invariant holds no matter which fields
    /// the patch touched.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price_cents) = self.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(cost_price_cents) = self.cost_price_cents {
            product.cost_price_cents = cost_price_cents;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        product.in_stock = product.quantity > 0;
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale has been paid and finalized.
    Completed,
    /// Sale was cancelled after the fact.
    Voided,
}

impl SaleStatus {
    /// Returns the lowercase storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Completed => "completed",
            SaleStatus::Voided => "voided",
        }
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Completed
    }
}

// =============================================================================
// Payment Method / Status
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    CreditCard,
    /// PayPal transfer.
    Paypal,
    /// Direct bank transfer.
    BankTransfer,
}

impl PaymentMethod {
    /// Cash is the only method where the customer hands over an amount
    /// that may exceed the total, so it is the only one requiring a
    /// tendered amount at checkout.
    #[inline]
    pub const fn requires_tender(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }

    /// Returns the snake_case storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Recorded but not yet settled.
    Pending,
    /// Settled. Only completed payments count towards revenue.
    Completed,
    /// Settlement failed.
    Failed,
    /// Settled, then returned to the customer.
    Refunded,
}

impl PaymentStatus {
    /// Returns the lowercase storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A finalized sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub total_amount_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    /// Product this line came from. `None` once the product is deleted;
    /// the snapshots below keep the history meaningful.
    pub product_id: Option<String>,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit selling price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Unit acquisition cost in cents at time of sale (frozen).
    pub cost_price_cents: i64,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the unit cost as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Line profit ((unit price − unit cost) × quantity), from the frozen
    /// snapshots.
    #[inline]
    pub fn line_profit(&self) -> Money {
        (self.unit_price() - self.cost_price()).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A payment record attached to a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    /// Sale this payment settles. Kept even if the sale is later removed,
    /// so the field is nullable in storage.
    pub sale_id: Option<String>,
    /// Amount paid in cents. Equals the sale total for completed payments.
    pub amount_cents: i64,
    /// ISO currency code ("USD").
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// External processor reference, if any.
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Checkout Input / Output
// =============================================================================

/// One requested line of a sale: which product, how many.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
}

impl SaleLine {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        SaleLine {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Everything produced by a successful checkout, in one place.
///
/// `change_cents` is derived (tendered − total) and reported to the caller
/// only; it is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    pub payment: Payment,
    pub change_cents: i64,
}

impl SaleReceipt {
    /// Returns the change due as Money.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

// =============================================================================
// Analytics Types
// =============================================================================

/// Optional time window for revenue, profit, and trend queries.
///
/// Both bounds are inclusive. A `None` bound means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// No bounds on either side.
    pub const fn unbounded() -> Self {
        TimeWindow {
            start: None,
            end: None,
        }
    }

    /// Everything at or after `start`.
    pub const fn since(start: DateTime<Utc>) -> Self {
        TimeWindow {
            start: Some(start),
            end: None,
        }
    }

    /// Everything at or before `end`.
    pub const fn until(end: DateTime<Utc>) -> Self {
        TimeWindow {
            start: None,
            end: Some(end),
        }
    }

    /// Everything in `[start, end]`.
    pub const fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeWindow {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Bucket size for sales trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Returns the bucket label for a timestamp.
    ///
    /// Labels sort chronologically as plain strings, which is what the
    /// trend builder relies on:
    ///
    /// - Day: `2024-03-09`
    /// - Week: `2024-10` (ISO year + Monday-based week number)
    /// - Month: `2024-03`
    pub fn bucket_label(&self, at: &DateTime<Utc>) -> String {
        let fmt = match self {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Week => "%Y-%W",
            Granularity::Month => "%Y-%m",
        };
        at.format(fmt).to_string()
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Day
    }
}

/// One product's stock level, for the stock distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockLevel {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
}

/// Product count per category. Uncategorized products are grouped under
/// the literal label "Uncategorized".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CategorySlice {
    pub category: String,
    pub product_count: i64,
}

/// Revenue and sale count for one trend bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Bucket label, e.g. "2024-03-09" for daily granularity.
    pub period: String,
    pub revenue_cents: i64,
    pub sales: i64,
}

impl TrendPoint {
    /// Returns the bucket revenue as Money.
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// Count and settled amount for one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MethodBreakdown {
    pub method: PaymentMethod,
    pub count: i64,
    pub amount_cents: i64,
}

impl MethodBreakdown {
    /// Returns the settled amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Knobs for assembling a dashboard snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardParams {
    /// Products with quantity strictly below this count as low stock.
    pub low_stock_threshold: i64,
    /// How many products the stock distribution includes.
    pub top_products: i64,
    /// How many recent sales to include.
    pub recent_limit: i64,
    pub granularity: Granularity,
    pub window: TimeWindow,
}

impl Default for DashboardParams {
    fn default() -> Self {
        DashboardParams {
            low_stock_threshold: 5,
            top_products: 5,
            recent_limit: 5,
            granularity: Granularity::Day,
            window: TimeWindow::unbounded(),
        }
    }
}

/// Every dashboard metric, collected in a single consistent read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub inventory_value_cents: i64,
    pub total_revenue_cents: i64,
    pub total_profit_cents: i64,
    /// Profit as a percentage of revenue. 0.0 when there is no revenue.
    pub margin: f64,
    pub low_stock_count: i64,
    pub stock_distribution: Vec<StockLevel>,
    pub categories: Vec<CategorySlice>,
    pub recent_sales: Vec<Sale>,
    pub sales_trend: Vec<TrendPoint>,
    pub payment_methods: Vec<MethodBreakdown>,
}

impl DashboardSnapshot {
    /// Returns the live inventory value as Money.
    #[inline]
    pub fn inventory_value(&self) -> Money {
        Money::from_cents(self.inventory_value_cents)
    }

    /// Returns total settled revenue as Money.
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }

    /// Returns total profit as Money.
    #[inline]
    pub fn total_profit(&self) -> Money {
        Money::from_cents(self.total_profit_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
