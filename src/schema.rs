//! Dataset column schema
//!
//! This module provides constants for the fixed CSV column layout of the
//! order dataset, plus a header check run before any row is parsed.

use crate::error::{DashboardError, Result};

/// Order dataset column names
pub mod columns {
    /// Order identifier column
    pub const ORDER_ID: &str = "order_id";
    /// Order item sequence number column
    pub const ORDER_ITEM_ID: &str = "order_item_id";
    /// Customer identifier column
    pub const CUSTOMER_ID: &str = "customer_id";
    /// Product category name column
    pub const PRODUCT_CATEGORY_NAME: &str = "product_category_name";
    /// Order status column (delivered, invoiced, shipped, ...)
    pub const ORDER_STATUS: &str = "order_status";
    /// Purchase timestamp column
    pub const ORDER_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
    /// Customer delivery timestamp column
    pub const ORDER_DELIVERED_CUSTOMER_DATE: &str = "order_delivered_customer_date";
    /// Payment method column
    pub const PAYMENT_TYPE: &str = "payment_type";
    /// Payment amount column
    pub const PAYMENT_VALUE: &str = "payment_value";
    /// Review score column (1-5)
    pub const REVIEW_SCORE: &str = "review_score";
    /// Delivery time in days column (derived, may be absent)
    pub const DELIVERY_TIME: &str = "delivery_time";
    /// Seller city column
    pub const SELLER_CITY: &str = "seller_city";
    /// Customer city column
    pub const CUSTOMER_CITY: &str = "customer_city";
}

/// Columns that must be present in the CSV header.
///
/// `delivery_time` is not listed: when the pre-cleaning step dropped it, the
/// loader derives it from the two timestamp columns.
pub const REQUIRED_COLUMNS: &[&str] = &[
    columns::ORDER_ID,
    columns::ORDER_ITEM_ID,
    columns::CUSTOMER_ID,
    columns::PRODUCT_CATEGORY_NAME,
    columns::ORDER_STATUS,
    columns::ORDER_PURCHASE_TIMESTAMP,
    columns::ORDER_DELIVERED_CUSTOMER_DATE,
    columns::PAYMENT_TYPE,
    columns::PAYMENT_VALUE,
    columns::REVIEW_SCORE,
    columns::SELLER_CITY,
    columns::CUSTOMER_CITY,
];

/// Check a CSV header record against [`REQUIRED_COLUMNS`].
///
/// Extra columns (index artifacts from the cleaning step, for example) are
/// ignored; a missing required column fails the load before row parsing.
pub fn validate_headers(headers: &csv::StringRecord) -> Result<()> {
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *required) {
            return Err(DashboardError::MissingColumn((*required).to_string()));
        }
    }
    Ok(())
}
