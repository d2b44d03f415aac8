//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the heart of Stockbook. It contains the domain model and
//! every pure computation: money arithmetic, input validation, the reporting
//! aggregator and the year-to-date CSV export.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockbook Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             stockbook-engine (consistency engine)               │   │
//! │  │        record_sale, amend_sale, delete_sale, reconcile          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockbook-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  report   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ dashboard │  │   rules   │  │   │
//! │  │   │   Sale    │  │  (cents)  │  │ low stock │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                stockbook-store (gateway layer)                  │   │
//! │  │            StoreGateway trait, memory + SQLite stores           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Business rule validation
//! - [`report`] - Reporting aggregator (totals, low stock, top sellers)
//! - [`export`] - Year-to-date CSV export
//! - [`format`] - Currency/date display helpers
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; "now" is always a parameter
//! 2. **No I/O**: database, network and file system access are forbidden here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod export;
pub mod format;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use types::{Product, Sale};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity accepted for a single sale line.
///
/// Prevents accidental over-ordering (e.g. typing 10000 instead of 10).
pub const MAX_SALE_QUANTITY: i64 = 999_999;

/// Maximum length accepted for product names and categories.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum price or cost accepted, in cents (one billion dollars).
///
/// Together with [`MAX_SALE_QUANTITY`] this bounds any
/// `amount x quantity` product well inside `i64`, so sale totals and
/// profits can never overflow.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;
