//! # Sales Ledger
//!
//! Records, amends and deletes sales while keeping product stock in step.
//!
//! ## The Two-Call Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale                                                            │
//! │                                                                         │
//! │   1. fetch product ──► advisory stock check (refuse if short)          │
//! │   2. insert sale row        (primary write; failure = error)           │
//! │   3. write new stock level  (follow-up write; failure = PARTIAL)       │
//! │                                                                         │
//! │  The store has no multi-row transactions, so step 3 can fail after     │
//! │  step 2 succeeded. That outcome is NOT an error: the sale stands, the  │
//! │  caller gets StockWrite::Failed, and reconcile_stock repairs the       │
//! │  drift later.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock math is absolute, not relative: each operation reads the product's
//! current stock and writes the computed new value. Two concurrent writers
//! can therefore lose an update; acceptable for a single-owner dashboard.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use stockbook_core::{validation, Product, Sale};
use stockbook_store::{SaleFilter, SaleOrder, StoreError, StoreGateway, UserContext};

use crate::error::{LedgerError, LedgerResult};

// =============================================================================
// Requests & Outcomes
// =============================================================================

/// Input for [`SalesLedger::record_sale`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RecordSale {
    pub product_id: String,
    pub quantity: i64,
    pub sale_date: NaiveDate,
}

/// Input for [`SalesLedger::amend_sale`]. Carries the full target state,
/// including the (possibly different) product the sale should point at.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AmendSale {
    pub product_id: String,
    pub quantity: i64,
    pub sale_date: NaiveDate,
}

/// Result of the follow-up stock write.
#[derive(Debug)]
pub enum StockWrite {
    /// The stock level was written; this is the value now in the store.
    Applied { new_stock: i64 },
    /// The sale write succeeded but the stock write did not. Stock has
    /// drifted from the ledger until `reconcile_stock` runs.
    Failed { reason: StoreError },
}

impl StockWrite {
    pub fn is_applied(&self) -> bool {
        matches!(self, StockWrite::Applied { .. })
    }
}

/// What a ledger mutation produced: the sale row as written, plus the fate
/// of the follow-up stock write.
#[derive(Debug)]
pub struct LedgerOutcome {
    pub sale: Sale,
    pub stock: StockWrite,
}

/// Result of [`SalesLedger::reconcile_stock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Units sold across every sale referencing the product.
    pub units_sold: i64,
    /// The stock level written: baseline minus units sold.
    pub new_stock: i64,
}

// =============================================================================
// Ledger
// =============================================================================

/// The consistency engine over a [`StoreGateway`].
pub struct SalesLedger<G> {
    gateway: Arc<G>,
}

impl<G> SalesLedger<G>
where
    G: StoreGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        SalesLedger { gateway }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Sales owned by the caller, most recent first.
    pub async fn list_sales(&self, ctx: &UserContext) -> LedgerResult<Vec<Sale>> {
        Ok(self
            .gateway
            .list_sales(ctx, &SaleFilter::all(), SaleOrder::DateDesc)
            .await?)
    }

    /// A single sale, or `SaleNotFound`.
    pub async fn get_sale(&self, ctx: &UserContext, id: &str) -> LedgerResult<Sale> {
        self.gateway
            .get_sale(ctx, id)
            .await?
            .ok_or_else(|| LedgerError::SaleNotFound(id.to_string()))
    }

    // -------------------------------------------------------------------------
    // record_sale
    // -------------------------------------------------------------------------

    /// Records a sale against a product and decrements its stock.
    ///
    /// Prices and costs are snapshotted from the product at the moment of
    /// sale; later catalog edits never rewrite history.
    pub async fn record_sale(
        &self,
        ctx: &UserContext,
        request: RecordSale,
    ) -> LedgerResult<LedgerOutcome> {
        validation::validate_quantity(request.quantity)?;

        let product = self.fetch_product(ctx, &request.product_id).await?;
        self.check_stock(&product, product.stock_quantity, request.quantity)?;

        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            user_id: ctx.user_id.clone(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_cost_cents: product.cost_cents,
            quantity: request.quantity,
            total_cents: product.price_cents * request.quantity,
            profit_cents: (product.price_cents - product.cost_cents) * request.quantity,
            sale_date: request.sale_date,
            created_at: now,
            updated_at: now,
        };

        // Primary write. A failure here is a clean failure: nothing changed.
        self.gateway.insert_sale(ctx, &sale).await?;
        info!(sale_id = %sale.id, product_id = %product.id, quantity = %sale.quantity,
              "Sale recorded");

        let stock = self
            .write_stock(ctx, &product.id, product.stock_quantity - request.quantity)
            .await;

        Ok(LedgerOutcome { sale, stock })
    }

    // -------------------------------------------------------------------------
    // amend_sale
    // -------------------------------------------------------------------------

    /// Rewrites an existing sale and adjusts stock by the quantity delta.
    ///
    /// When the amendment points the sale at a DIFFERENT product, the new
    /// product's stock is decremented by the full new quantity. The original
    /// product's stock is not restored; `reconcile_stock` on the original
    /// product repairs the ledger afterwards.
    pub async fn amend_sale(
        &self,
        ctx: &UserContext,
        sale_id: &str,
        request: AmendSale,
    ) -> LedgerResult<LedgerOutcome> {
        validation::validate_quantity(request.quantity)?;

        let existing = self.get_sale(ctx, sale_id).await?;
        let product = self.fetch_product(ctx, &request.product_id).await?;

        let same_product = existing.product_id == product.id;
        let new_stock = if same_product {
            let delta = request.quantity - existing.quantity;
            if delta > 0 {
                self.check_stock(&product, product.stock_quantity, delta)?;
            }
            product.stock_quantity - delta
        } else {
            self.check_stock(&product, product.stock_quantity, request.quantity)?;
            product.stock_quantity - request.quantity
        };

        let sale = Sale {
            id: existing.id.clone(),
            user_id: existing.user_id.clone(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_cost_cents: product.cost_cents,
            quantity: request.quantity,
            total_cents: product.price_cents * request.quantity,
            profit_cents: (product.price_cents - product.cost_cents) * request.quantity,
            sale_date: request.sale_date,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.gateway.update_sale(ctx, &sale).await?;
        info!(sale_id = %sale.id, product_id = %product.id,
              old_quantity = %existing.quantity, new_quantity = %sale.quantity,
              switched_product = %!same_product, "Sale amended");

        let stock = self.write_stock(ctx, &product.id, new_stock).await;

        Ok(LedgerOutcome { sale, stock })
    }

    // -------------------------------------------------------------------------
    // delete_sale
    // -------------------------------------------------------------------------

    /// Deletes a sale and returns its quantity to the product's stock.
    pub async fn delete_sale(&self, ctx: &UserContext, sale_id: &str) -> LedgerResult<StockWrite> {
        let existing = self.get_sale(ctx, sale_id).await?;

        self.gateway.delete_sale(ctx, sale_id).await?;
        info!(sale_id = %sale_id, product_id = %existing.product_id, "Sale deleted");

        // The product may have been deleted since the sale was recorded;
        // the sale deletion stands either way.
        let stock = match self.gateway.get_product(ctx, &existing.product_id).await {
            Ok(Some(product)) => {
                self.write_stock(ctx, &product.id, product.stock_quantity + existing.quantity)
                    .await
            }
            Ok(None) => {
                warn!(product_id = %existing.product_id,
                      "Stock restore skipped: product no longer exists");
                StockWrite::Failed {
                    reason: StoreError::not_found("Product", &existing.product_id),
                }
            }
            Err(e) => {
                warn!(product_id = %existing.product_id, error = %e,
                      "Stock restore failed after sale deletion");
                StockWrite::Failed { reason: e }
            }
        };

        Ok(stock)
    }

    // -------------------------------------------------------------------------
    // reconcile_stock
    // -------------------------------------------------------------------------

    /// Repairs stock drift: sets a product's stock to `baseline` minus the
    /// units sold across every sale that references it.
    ///
    /// `baseline` is the physically counted (or originally stocked) level
    /// the ledger should be replayed against.
    pub async fn reconcile_stock(
        &self,
        ctx: &UserContext,
        product_id: &str,
        baseline: i64,
    ) -> LedgerResult<ReconcileOutcome> {
        validation::validate_stock_quantity(baseline)?;
        let product = self.fetch_product(ctx, product_id).await?;

        let sales = self
            .gateway
            .list_sales(ctx, &SaleFilter::for_product(product_id), SaleOrder::DateAsc)
            .await?;
        let units_sold: i64 = sales.iter().map(|s| s.quantity).sum();
        let new_stock = baseline - units_sold;

        self.gateway
            .update_product_stock(ctx, &product.id, new_stock)
            .await?;
        info!(product_id = %product_id, baseline = %baseline, units_sold = %units_sold,
              new_stock = %new_stock, "Stock reconciled");

        Ok(ReconcileOutcome {
            units_sold,
            new_stock,
        })
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    async fn fetch_product(&self, ctx: &UserContext, id: &str) -> LedgerResult<Product> {
        self.gateway
            .get_product(ctx, id)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(id.to_string()))
    }

    /// Advisory check: refuses the operation while nothing has been written.
    /// It reads a possibly stale stock level, so it narrows the overselling
    /// window rather than closing it.
    fn check_stock(&self, product: &Product, available: i64, requested: i64) -> LedgerResult<()> {
        if available < requested {
            return Err(LedgerError::InsufficientStock {
                name: product.name.clone(),
                available,
                requested,
            });
        }
        Ok(())
    }

    /// The follow-up stock write. Failure is demoted to an outcome.
    async fn write_stock(&self, ctx: &UserContext, product_id: &str, new_stock: i64) -> StockWrite {
        debug!(product_id = %product_id, new_stock = %new_stock, "Writing stock level");
        match self
            .gateway
            .update_product_stock(ctx, product_id, new_stock)
            .await
        {
            Ok(()) => StockWrite::Applied { new_stock },
            Err(reason) => {
                warn!(product_id = %product_id, error = %reason,
                      "Stock write failed after sale write; stock has drifted");
                StockWrite::Failed { reason }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
