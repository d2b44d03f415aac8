//! # Stockbook Engine
//!
//! The consistency engine between the sales ledger and product stock, plus
//! catalog rules and report wiring.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      stockbook-engine                           │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐        │
//! │  │  SalesLedger │   │   Catalog    │   │   Reports    │        │
//! │  │ record/amend │   │ product CRUD │   │ dashboard /  │        │
//! │  │ delete sale, │   │ + restrict   │   │ top sellers /│        │
//! │  │ reconcile    │   │   delete     │   │ CSV export   │        │
//! │  └──────┬───────┘   └──────┬───────┘   └──────┬───────┘        │
//! │         └──────────────────┼──────────────────┘                │
//! │                            ▼                                    │
//! │                   StoreGateway (trait)                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store offers no multi-row transactions, so every sale mutation is a
//! two-call sequence whose second (stock) write can fail on its own. That
//! partial outcome is first-class here: see [`ledger::StockWrite`].

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod reports;

pub use catalog::{Catalog, NewProduct, UpdateProduct};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{
    AmendSale, LedgerOutcome, ReconcileOutcome, RecordSale, SalesLedger, StockWrite,
};
pub use reports::Reports;
