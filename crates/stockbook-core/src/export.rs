//! # CSV Export
//!
//! Renders the year-to-date sales report as CSV text.
//!
//! ## File Layout
//! ```text
//! Date,Product Name,Quantity,Unit Price,Total Amount,Profit
//! 2024-06-01,Espresso Beans 1kg,3,100.00,300.00,120.00
//!                                  <- blank line
//! TOTALS,,3,,300.00,120.00
//!                                  <- blank line
//! SUMMARY INFORMATION
//! Reporting Period,2024-01-01 to 2024-06-15
//! Total Units Sold,3
//! Total Revenue,300.00
//! Total Profit,120.00
//! Profit Margin,40.00%
//! ```
//!
//! Lines end with `\n` (never CRLF). Monetary fields carry two decimal
//! places; the unit price is derived as total / quantity since the sale row
//! stores no unit price. A zero-revenue export emits a `0.00%` margin rather
//! than letting the division produce a non-numeric value.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::report::year_to_date;
use crate::types::Sale;

/// Column headers of the per-sale section.
pub const CSV_HEADER: [&str; 6] = [
    "Date",
    "Product Name",
    "Quantity",
    "Unit Price",
    "Total Amount",
    "Profit",
];

/// CSV rendering failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Write(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// Renders the year-to-date sales export for the calendar year of `today`.
///
/// One row per year-to-date sale in input order, then a `TOTALS` row, then a
/// summary block. With no year-to-date sales the totals row is
/// `TOTALS,,0,,0.00,0.00` and the margin is `0.00%`.
pub fn year_to_date_csv(sales: &[Sale], today: NaiveDate) -> Result<String, ExportError> {
    let ytd: Vec<&Sale> = year_to_date(sales, today).collect();

    // Each section gets its own writer: the csv crate renders a lone empty
    // field as `""`, so blank separator lines are appended by hand instead.
    let mut table = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    table.write_record(CSV_HEADER)?;

    let mut total_units: i64 = 0;
    let mut total_amount: i64 = 0;
    let mut total_profit: i64 = 0;

    for sale in &ytd {
        total_units += sale.quantity;
        total_amount += sale.total_cents;
        total_profit += sale.profit_cents;

        table.write_record(&[
            sale.sale_date.format("%Y-%m-%d").to_string(),
            sale.product_name.clone(),
            sale.quantity.to_string(),
            format!("{:.2}", sale.unit_price()),
            sale.total().to_decimal_string(),
            sale.profit().to_decimal_string(),
        ])?;
    }

    table.write_record(&[
        "TOTALS".to_string(),
        String::new(),
        total_units.to_string(),
        String::new(),
        cents_to_decimal(total_amount),
        cents_to_decimal(total_profit),
    ])?;

    let mut summary = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    summary.write_record(["SUMMARY INFORMATION"])?;
    summary.write_record(&[
        "Reporting Period".to_string(),
        format!("{}-01-01 to {}", today.year(), today.format("%Y-%m-%d")),
    ])?;
    summary.write_record(&["Total Units Sold".to_string(), total_units.to_string()])?;
    summary.write_record(&["Total Revenue".to_string(), cents_to_decimal(total_amount)])?;
    summary.write_record(&["Total Profit".to_string(), cents_to_decimal(total_profit)])?;
    summary.write_record(&[
        "Profit Margin".to_string(),
        profit_margin(total_profit, total_amount),
    ])?;

    let table = into_string(table)?;
    let summary = into_string(summary)?;

    // The TOTALS row is the last record of the table section; split it off so
    // the blank separator lines land around it.
    let (rows, totals) = match table.trim_end_matches('\n').rsplit_once('\n') {
        Some((rows, totals)) => (rows.to_string(), totals.to_string()),
        // Unreachable in practice: the table always has a header.
        None => (String::new(), table.trim_end_matches('\n').to_string()),
    };

    Ok(format!("{}\n\n{}\n\n{}", rows, totals, summary))
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

/// Profit margin as a percentage string with a literal `%` suffix.
///
/// Guarded: zero revenue yields `0.00%` instead of a division by zero.
fn profit_margin(profit_cents: i64, amount_cents: i64) -> String {
    if amount_cents == 0 {
        return "0.00%".to_string();
    }
    let margin = profit_cents as f64 / amount_cents as f64 * 100.0;
    format!("{:.2}%", margin)
}

fn cents_to_decimal(cents: i64) -> String {
    crate::money::Money::from_cents(cents).to_decimal_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
