//! # Repository Module
//!
//! Database repository implementations for HyperSpin.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │                                                                 │
//! │       │  db.products().get("prod-1")                                   │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── add(&self, new_product)                                           │
//! │  ├── get(&self, id)                                                    │
//! │  ├── list(&self)                                                       │
//! │  ├── update(&self, id, patch)                                          │
//! │  └── remove(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD
//! - [`sale::SaleRepository`] - Read access to sales and their line items
//! - [`payment::PaymentRepository`] - Read access to payment records
//!
//! Sales and payments are only ever written by the checkout engine, so
//! their repositories expose no insert methods.

pub mod payment;
pub mod product;
pub mod sale;
