//! # hyperspin-db: Database Layer for HyperSpin
//!
//! This crate provides database access for the HyperSpin system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       HyperSpin Data Flow                               │
//! │                                                                         │
//! │  Caller (UI / CLI / seed binary)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   hyperspin-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Engines    │  │   │
//! │  │   │   (pool.rs)   │    │ (product.rs)  │    │              │  │   │
//! │  │   │               │    │               │    │ Checkout     │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ (one atomic  │  │   │
//! │  │   │ Connection    │    │ SaleRepo      │    │  sale tx)    │  │   │
//! │  │   │ Management    │    │ PaymentRepo   │    │ Analytics    │  │   │
//! │  │   │ Migrations    │    │               │    │ (read-only)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │           hyperspin.db (WAL mode, foreign keys on)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, sale, payment)
//! - [`checkout`] - The sale transaction engine
//! - [`analytics`] - Read-only aggregation over committed state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hyperspin_core::{PaymentMethod, Money, SaleLine};
//! use hyperspin_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let db = Database::new(DbConfig::new("hyperspin.db")).await?;
//!
//! // Sell 3 units of a product for cash
//! let receipt = db
//!     .checkout()
//!     .process_sale(
//!         &[SaleLine::new(product_id, 3)],
//!         PaymentMethod::Cash,
//!         Some(Money::from_cents(3000)),
//!     )
//!     .await?;
//!
//! // Dashboard in one consistent read
//! let snapshot = db.analytics().dashboard_snapshot(&Default::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{AnalyticsUnavailable, CheckoutError, DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use analytics::AnalyticsEngine;
pub use checkout::CheckoutEngine;

// Repository re-exports for convenience
pub use repository::payment::PaymentRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
