//! # Reports
//!
//! Thin wiring between the store and the pure aggregators in
//! `stockbook_core::report` / `stockbook_core::export`. Fetches the caller's
//! rows once per call and hands them to the pure functions; "today" is always
//! passed in so the numbers are reproducible in tests.

use chrono::NaiveDate;
use std::sync::Arc;

use stockbook_core::export;
use stockbook_core::report::{
    self, CategorySlice, DashboardSummary, SalesPeriod, TopSeller,
};
use stockbook_core::Product;
use stockbook_store::{ProductOrder, SaleFilter, SaleOrder, StoreGateway, UserContext};

use crate::error::LedgerResult;

pub struct Reports<G> {
    gateway: Arc<G>,
}

impl<G> Reports<G>
where
    G: StoreGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Reports { gateway }
    }

    /// Headline dashboard numbers: stock totals plus year-to-date sales.
    pub async fn dashboard(
        &self,
        ctx: &UserContext,
        today: NaiveDate,
    ) -> LedgerResult<DashboardSummary> {
        let products = self.gateway.list_products(ctx, ProductOrder::Name).await?;
        let sales = self
            .gateway
            .list_sales(ctx, &SaleFilter::all(), SaleOrder::DateDesc)
            .await?;
        Ok(report::dashboard_summary(&products, &sales, today))
    }

    /// Products at or below their reorder level, alphabetical.
    pub async fn low_stock(&self, ctx: &UserContext) -> LedgerResult<Vec<Product>> {
        let products = self.gateway.list_products(ctx, ProductOrder::Name).await?;
        Ok(report::low_stock(&products).into_iter().cloned().collect())
    }

    /// Product counts per category, colored in first-seen order.
    pub async fn category_distribution(
        &self,
        ctx: &UserContext,
    ) -> LedgerResult<Vec<CategorySlice>> {
        let products = self.gateway.list_products(ctx, ProductOrder::Name).await?;
        Ok(report::category_distribution(&products))
    }

    /// Top products by profit within the period, at most ten.
    pub async fn top_sellers(
        &self,
        ctx: &UserContext,
        period: SalesPeriod,
        today: NaiveDate,
    ) -> LedgerResult<Vec<TopSeller>> {
        let sales = self
            .gateway
            .list_sales(ctx, &SaleFilter::all(), SaleOrder::DateDesc)
            .await?;
        Ok(report::top_sellers(&sales, period, today))
    }

    /// The year-to-date sales report as a CSV document.
    pub async fn year_to_date_csv(
        &self,
        ctx: &UserContext,
        today: NaiveDate,
    ) -> LedgerResult<String> {
        let sales = self
            .gateway
            .list_sales(ctx, &SaleFilter::all(), SaleOrder::DateAsc)
            .await?;
        Ok(export::year_to_date_csv(&sales, today)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, NewProduct};
    use crate::ledger::{RecordSale, SalesLedger};
    use stockbook_store::MemoryStore;

    fn ctx() -> UserContext {
        UserContext::new("alice")
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn seeded() -> (Reports<MemoryStore>, UserContext) {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::new(store.clone());
        let ledger = SalesLedger::new(store.clone());

        let beans = catalog
            .create_product(
                &ctx(),
                NewProduct {
                    name: "Espresso Beans".to_string(),
                    category: "Coffee".to_string(),
                    price_cents: 10_000,
                    cost_cents: 6_000,
                    stock_quantity: 10,
                    reorder_level: 5,
                },
            )
            .await
            .unwrap();
        catalog
            .create_product(
                &ctx(),
                NewProduct {
                    name: "Filter Papers".to_string(),
                    category: "Supplies".to_string(),
                    price_cents: 2_000,
                    cost_cents: 500,
                    stock_quantity: 3,
                    reorder_level: 5,
                },
            )
            .await
            .unwrap();

        ledger
            .record_sale(
                &ctx(),
                RecordSale {
                    product_id: beans.id.clone(),
                    quantity: 3,
                    sale_date: d(2024, 6, 1),
                },
            )
            .await
            .unwrap();

        (Reports::new(store), ctx())
    }

    #[tokio::test]
    async fn test_dashboard_reflects_seeded_rows() {
        let (reports, ctx) = seeded().await;
        let summary = reports.dashboard(&ctx, d(2024, 6, 15)).await.unwrap();

        // Beans stock is 7 after the sale, papers still 3.
        assert_eq!(summary.total_stock, 10);
        assert_eq!(summary.ytd_units_sold, 3);
        assert_eq!(summary.ytd_sales.cents(), 30_000);
        assert_eq!(summary.ytd_profit.cents(), 12_000);
    }

    #[tokio::test]
    async fn test_low_stock_and_categories() {
        let (reports, ctx) = seeded().await;

        let low = reports.low_stock(&ctx).await.unwrap();
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Filter Papers"]);

        let slices = reports.category_distribution(&ctx).await.unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].category, "Coffee");
        assert_eq!(slices[0].count, 1);
    }

    #[tokio::test]
    async fn test_csv_export_runs_end_to_end() {
        let (reports, ctx) = seeded().await;
        let csv = reports.year_to_date_csv(&ctx, d(2024, 6, 15)).await.unwrap();

        assert!(csv.starts_with("Date,Product Name,Quantity,Unit Price,Total Amount,Profit"));
        assert!(csv.contains("Espresso Beans"));
        assert!(csv.contains("TOTALS"));
    }
}
