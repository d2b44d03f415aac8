//! # Domain Types
//!
//! Core domain types for Stockbook.
//!
//! ## Type Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │      Product        │          │        Sale         │              │
//! │  │  ─────────────────  │  soft    │  ─────────────────  │              │
//! │  │  id (UUID)          │◄─── ref ─│  product_id         │              │
//! │  │  user_id (owner)    │          │  user_id (owner)    │              │
//! │  │  price_cents        │          │  product_name ★     │              │
//! │  │  cost_cents         │          │  unit_cost_cents ★  │              │
//! │  │  stock_quantity     │          │  total_cents        │              │
//! │  │  reorder_level      │          │  profit_cents       │              │
//! │  └─────────────────────┘          │  sale_date          │              │
//! │                                   └─────────────────────┘              │
//! │                                                                         │
//! │  ★ = snapshot fields, frozen at sale time. A sale is a historical      │
//! │      record: later edits to the product never touch it.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The Sale → Product link is a reference by id, not ownership. A product
//! holds no collection of its sales; the reporting aggregator groups the full
//! sales list on demand.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product owned by a single user.
///
/// `stock_quantity` is a denormalized counter: it must equal the quantity
/// originally stocked minus the net quantity sold across all non-deleted
/// sales referencing this product. The consistency engine upholds that
/// invariant; nothing in this type enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning user. Every store read and write is scoped to this.
    pub user_id: String,

    /// Display name.
    pub name: String,

    /// Free-form category label (case-sensitive in reports).
    pub category: String,

    /// Unit selling price in cents (>= 1).
    pub price_cents: i64,

    /// Unit cost in cents (>= 1), used for profit and inventory value.
    pub cost_cents: i64,

    /// Units currently available (>= 0).
    pub stock_quantity: i64,

    /// Threshold at or below which the product is flagged low-stock (>= 1).
    pub reorder_level: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the unit cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Whether the product sits at or below its reorder level.
    ///
    /// Non-strict on the boundary: `stock_quantity == reorder_level` counts
    /// as low stock.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.reorder_level
    }

    /// Value of the units on hand, at cost.
    #[inline]
    pub fn inventory_value(&self) -> Money {
        self.cost().multiply_quantity(self.stock_quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction.
///
/// ## Snapshot Pattern
/// `product_name` and `unit_cost_cents` are copied from the product at sale
/// time and intentionally never kept in sync with later product edits. The
/// sale is a historical record; re-joining to live product data would
/// rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning user.
    pub user_id: String,

    /// Referenced product (by id; the product may be edited or gone).
    pub product_id: String,

    /// Product name at sale time (frozen).
    pub product_name: String,

    /// Unit cost at sale time (frozen), in cents.
    pub unit_cost_cents: i64,

    /// Units sold (> 0).
    pub quantity: i64,

    /// Unit price x quantity at sale time, in cents.
    pub total_cents: i64,

    /// total - unit cost x quantity at sale time, in cents.
    pub profit_cents: i64,

    /// Calendar date of the sale (no time component).
    pub sale_date: NaiveDate,

    /// When the sale row was created.
    pub created_at: DateTime<Utc>,

    /// When the sale row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total amount as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the profit as Money.
    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }

    /// Unit price derived from the recorded total. Display only; the store
    /// never persists a unit price on the sale row.
    pub fn unit_price(&self) -> f64 {
        if self.quantity == 0 {
            return 0.0;
        }
        self.total_cents as f64 / self.quantity as f64 / 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
