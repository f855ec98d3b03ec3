//! Data models for the order dataset and its derived series
//!
//! This module contains all data structures used throughout the application,
//! including the order-line record, date ranges, and the output rows of each
//! aggregation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// One row of the dataset: a purchased item within an order.
///
/// The dataset is pre-cleaned, so fields are already joined across the
/// original order/payment/review tables. Records are never mutated after
/// load.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    /// Order identifier
    pub order_id: String,
    /// Item sequence number within the order
    pub order_item_id: u32,
    /// Customer identifier
    pub customer_id: String,
    /// Product category name
    pub product_category_name: String,
    /// Order status (delivered, invoiced, shipped, ...)
    pub order_status: String,
    /// Timestamp of the purchase
    #[serde(with = "csv_datetime")]
    pub order_purchase_timestamp: NaiveDateTime,
    /// Timestamp of delivery to the customer, when delivered
    #[serde(with = "csv_opt_datetime")]
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    /// Payment method (credit_card, boleto, voucher, ...)
    pub payment_type: String,
    /// Payment amount in USD
    pub payment_value: f64,
    /// Review score left by the customer (1-5)
    pub review_score: Option<f64>,
    /// Delivery time in days; derived from the timestamps when absent
    #[serde(default)]
    pub delivery_time: Option<f64>,
    /// City of the seller
    pub seller_city: String,
    /// City of the customer
    pub customer_city: String,
}

impl OrderRecord {
    /// Calendar day of the purchase
    #[must_use]
    pub fn purchase_date(&self) -> NaiveDate {
        self.order_purchase_timestamp.date()
    }
}

/// Inclusive date range for filtering orders by purchase timestamp
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DateRange {
    /// Start of the range (inclusive, optional)
    pub start: Option<NaiveDateTime>,
    /// End of the range (inclusive, optional)
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    /// Range covering the whole dataset
    #[must_use]
    pub const fn full() -> Self {
        Self { start: None, end: None }
    }

    /// Parse a range from `YYYY-MM-DD` bounds.
    ///
    /// The start day expands to 00:00:00 and the end day to 23:59:59, so
    /// both days are fully included.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start
            .map(|s| parse_day(s).map(|d| d.and_time(NaiveTime::MIN)))
            .transpose()?;
        let end = end
            .map(|s| {
                parse_day(s).map(|d| {
                    d.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
                })
            })
            .transpose()?;
        Ok(Self { start, end })
    }

    /// True if a purchase timestamp falls within the range
    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start.is_none_or(|start| timestamp >= start)
            && self.end.is_none_or(|end| timestamp <= end)
    }
}

fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DashboardError::InvalidDate(format!("{s} (expected YYYY-MM-DD)")))
}

/// Output format for exported chart data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON document with the full dashboard payload
    Json,
    /// One CSV file per chart
    Csv,
    /// Plain-text summary only
    Txt,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Txt => "txt",
        }
    }
}

/// Total sales for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    /// Calendar day
    pub date: NaiveDate,
    /// Sum of payment values for the day; 0.0 for days without orders
    pub total: f64,
}

/// Purchase count for one (customer, product category) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCount {
    /// Customer identifier
    pub customer_id: String,
    /// Product category name
    pub category: String,
    /// Number of order lines
    pub count: u64,
}

/// Share of one payment method within the trailing window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentShare {
    /// Payment method name
    pub payment_type: String,
    /// Number of order lines using the method
    pub count: u64,
    /// Percentage of all order lines in the window
    pub percentage: f64,
}

/// Month x payment-method count matrix for the trailing window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentTrends {
    /// Month keys (`YYYY-MM`), ascending
    pub months: Vec<String>,
    /// Payment method names, alphabetical
    pub methods: Vec<String>,
    /// `counts[month][method]`, zero-filled
    pub counts: Vec<Vec<u64>>,
}

impl PaymentTrends {
    /// True if the window contained no orders
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Opportunity score for one city
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityOpportunity {
    /// City name
    pub city: String,
    /// Seller order count minus customer order count
    pub opportunity: i64,
}

/// Average review score for one exact delivery-time value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReviewPoint {
    /// Delivery time in days
    pub delivery_time: f64,
    /// Mean review score of orders with that delivery time
    pub review_score: f64,
}

/// Unit sales of one top product category in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonalSales {
    /// Month key (`YYYY-MM`)
    pub month: String,
    /// Product category name
    pub category: String,
    /// Unit-sales proxy: sum of item sequence numbers for the month
    pub units: u64,
}

/// Dataset metadata for initializing the date-range picker
#[derive(Debug, Clone, Serialize)]
pub struct DatasetMeta {
    /// Earliest purchase timestamp
    pub start: NaiveDateTime,
    /// Latest purchase timestamp
    pub end: NaiveDateTime,
    /// Number of order lines loaded
    pub rows: usize,
}

/// Parse a dataset timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` (the export format of the cleaning step),
/// the ISO `T` variant, and bare dates.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let s = raw.trim();
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(DashboardError::InvalidDate(s.to_string()))
}

mod csv_datetime {
    use chrono::NaiveDateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(D::Error::custom)
    }
}

mod csv_opt_datetime {
    use chrono::NaiveDateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_timestamp(s).map(Some).map_err(D::Error::custom),
        }
    }
}
