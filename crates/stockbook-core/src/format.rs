//! # Display Formatters
//!
//! Currency and date display helpers for the presentation layer. Pure string
//! formatting; no locale handling.

use chrono::NaiveDate;

use crate::money::Money;

/// Formats an amount for display, e.g. `$1234.56`.
pub fn format_amount(amount: Money) -> String {
    amount.to_string()
}

/// Formats a calendar date for display, e.g. `Jun 1, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
