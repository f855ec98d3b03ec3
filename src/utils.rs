//! Utility functions for formatting dashboard values.
//!
//! This module provides shared helpers for currency display and month keys.

use chrono::NaiveDateTime;

/// Format an amount as USD with thousands separators.
///
/// # Arguments
///
/// * `amount` - Amount in dollars
///
/// # Returns
///
/// A string such as `"$1,234,567.89"`; negative amounts render as
/// `"-$12.34"`.
#[must_use]
pub fn format_usd(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    // Group the integer part in threes from the right
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{sign}${grouped}.{fraction:02}")
}

/// Month key (`YYYY-MM`) of a timestamp, used for monthly grouping.
#[must_use]
pub fn month_key(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y-%m").to_string()
}
