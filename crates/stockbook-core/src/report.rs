//! # Reporting Aggregator
//!
//! Derives dashboard metrics from the in-memory product and sale collections.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Reporting Aggregator                                │
//! │                                                                         │
//! │   products ──┐                                                          │
//! │              ├──► dashboard_summary(products, sales, today)             │
//! │   sales ─────┤         total stock / inventory value / YTD figures      │
//! │              │                                                          │
//! │              ├──► low_stock(products)      stock <= reorder level       │
//! │              │                                                          │
//! │              ├──► category_distribution(products)                       │
//! │              │         counts + palette color per category              │
//! │              │                                                          │
//! │              └──► top_sellers(sales, period, today)                     │
//! │                        top 10 by summed profit in the period            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: the reference date ("today") is always a
//! parameter, never read from a clock. The caller re-fetches collections from
//! the store and recomputes; nothing is cached or stored.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::money::Money;
use crate::types::{Product, Sale};

// =============================================================================
// Constants
// =============================================================================

/// Display colors assigned to categories, cycling in first-seen order.
pub const CATEGORY_PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
];

/// Chart labels are cut to this many characters before grouping.
pub const LABEL_WIDTH: usize = 10;

/// Number of entries returned by [`top_sellers`].
pub const TOP_SELLER_LIMIT: usize = 10;

// =============================================================================
// Dashboard Summary
// =============================================================================

/// Headline dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Sum of stock_quantity over all products.
    pub total_stock: i64,

    /// Sum of cost x stock_quantity over all products.
    pub total_inventory_value: Money,

    /// Total sale amount for the calendar year of `today`.
    pub ytd_sales: Money,

    /// Total profit for the calendar year of `today`.
    pub ytd_profit: Money,

    /// Total units sold for the calendar year of `today`.
    pub ytd_units_sold: i64,
}

/// Computes the headline dashboard figures.
pub fn dashboard_summary(products: &[Product], sales: &[Sale], today: NaiveDate) -> DashboardSummary {
    let ytd: Vec<&Sale> = year_to_date(sales, today).collect();

    DashboardSummary {
        total_stock: products.iter().map(|p| p.stock_quantity).sum(),
        total_inventory_value: products.iter().map(|p| p.inventory_value()).sum(),
        ytd_sales: ytd.iter().map(|s| s.total()).sum(),
        ytd_profit: ytd.iter().map(|s| s.profit()).sum(),
        ytd_units_sold: ytd.iter().map(|s| s.quantity).sum(),
    }
}

/// Sales whose date falls within the calendar year of `today`.
pub fn year_to_date<'a>(
    sales: &'a [Sale],
    today: NaiveDate,
) -> impl Iterator<Item = &'a Sale> + 'a {
    sales
        .iter()
        .filter(move |s| s.sale_date.year() == today.year())
}

// =============================================================================
// Low Stock
// =============================================================================

/// Products at or below their reorder level.
///
/// The boundary is inclusive: `stock_quantity == reorder_level` is low stock.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock()).collect()
}

// =============================================================================
// Category Distribution
// =============================================================================

/// One slice of the category chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub count: usize,
    pub color: &'static str,
}

/// Counts products per category (case-sensitive exact match).
///
/// Slices come back in first-seen order; colors cycle through
/// [`CATEGORY_PALETTE`] in that same order.
pub fn category_distribution(products: &[Product]) -> Vec<CategorySlice> {
    let mut slices: Vec<CategorySlice> = Vec::new();

    for product in products {
        match slices.iter_mut().find(|s| s.category == product.category) {
            Some(slice) => slice.count += 1,
            None => {
                let color = CATEGORY_PALETTE[slices.len() % CATEGORY_PALETTE.len()];
                slices.push(CategorySlice {
                    category: product.category.clone(),
                    count: 1,
                    color,
                });
            }
        }
    }

    slices
}

// =============================================================================
// Top Sellers
// =============================================================================

/// Reporting window for the top-sellers chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesPeriod {
    CurrentMonth,
    CurrentYear,
}

impl SalesPeriod {
    fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            SalesPeriod::CurrentMonth => {
                date.year() == today.year() && date.month() == today.month()
            }
            SalesPeriod::CurrentYear => date.year() == today.year(),
        }
    }
}

/// One bar of the top-sellers chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSeller {
    /// Truncated display label. Also the grouping key, so two products whose
    /// names truncate identically are merged into one bar. That merge is the
    /// recorded behavior of the dashboard, kept as-is.
    pub label: String,
    pub profit: Money,
}

/// Groups the period's sales by truncated product name, sums profit per
/// group and returns the top 10 by profit, descending.
pub fn top_sellers(sales: &[Sale], period: SalesPeriod, today: NaiveDate) -> Vec<TopSeller> {
    let mut groups: Vec<TopSeller> = Vec::new();

    for sale in sales.iter().filter(|s| period.contains(s.sale_date, today)) {
        let label = truncate_label(&sale.product_name);
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.profit += sale.profit(),
            None => groups.push(TopSeller {
                label,
                profit: sale.profit(),
            }),
        }
    }

    // Descending by profit; label as a stable tie-break.
    groups.sort_by(|a, b| b.profit.cmp(&a.profit).then_with(|| a.label.cmp(&b.label)));
    groups.truncate(TOP_SELLER_LIMIT);
    groups
}

/// Cuts a name to [`LABEL_WIDTH`] characters with a trailing ellipsis.
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_WIDTH {
        let cut: String = name.chars().take(LABEL_WIDTH).collect();
        format!("{}...", cut)
    } else {
        name.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
