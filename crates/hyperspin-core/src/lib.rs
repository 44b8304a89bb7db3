//! # hyperspin-core: Pure Business Logic for HyperSpin
//!
//! This crate is the **heart** of HyperSpin. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       HyperSpin Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     UI / CLI (external)                         │   │
//! │  │    Inventory forms ──► Checkout ──► Dashboard ──► Reports       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ hyperspin-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │ validation│  │  report   │   │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │  │ CSV rows  │   │   │
//! │  │   │   Sale    │  │ line math │  │  checks   │  │ headers   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 hyperspin-db (Database Layer)                   │   │
//! │  │     SQLite repositories, checkout engine, analytics engine      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleItem, Payment, analytics results)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`report`] - CSV rows for the export surface
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use hyperspin_core::money::Money;
//!
//! // Create money from cents (never from floats!)
//! let unit_price = Money::from_cents(1000); // $10.00
//!
//! // Line total for 3 units
//! let total = unit_price.multiply_quantity(3);
//! assert_eq!(total.cents(), 3000);
//!
//! // Change for a $35.00 cash tender
//! let change = Money::from_cents(3500) - total;
//! assert_eq!(change.to_decimal_string(), "5.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use hyperspin_core::Money` instead of
// `use hyperspin_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency code recorded on every payment.
///
/// v0.1 is single-currency. Payments still carry the code so historical
/// records stay unambiguous if more currencies are added later.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default threshold for the low-stock count (strict less-than).
///
/// A product with quantity 4 counts as low stock, a product with
/// quantity 5 does not.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum line items allowed in a single sale request.
///
/// Prevents runaway requests and keeps transaction sizes reasonable.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
