//! Engine error types.
//!
//! An error here means the operation was refused or could not complete its
//! primary write. A failed follow-up stock write is NOT an error; it comes
//! back inside the outcome as [`crate::ledger::StockWrite::Failed`].

use thiserror::Error;

use stockbook_core::export::ExportError;
use stockbook_core::ValidationError;
use stockbook_store::StoreError;

/// Errors from ledger and catalog operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced product does not exist (or belongs to another user).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The referenced sale does not exist (or belongs to another user).
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Advisory stock check refused the sale before anything was written.
    #[error("Insufficient stock for '{name}': {available} available, {requested} requested")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// The product still has sales referencing it and cannot be deleted.
    #[error("Product has {count} recorded sale(s) and cannot be deleted")]
    ProductHasSales { count: usize },

    /// The CSV writer failed while rendering a report.
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// Input failed a business rule.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store refused or failed the primary write.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for engine results.
pub type LedgerResult<T> = Result<T, LedgerError>;
