//! Dataset loading and range filtering
//!
//! This module owns the in-memory order table: it reads the pre-cleaned CSV,
//! parses the timestamp columns, derives the delivery time where the export
//! dropped it, and keeps the rows sorted by purchase timestamp for the
//! process lifetime. Filtering by date range is a binary search over the
//! sorted rows, returning a borrowed contiguous slice.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{DatasetMeta, DateRange, OrderRecord};
use crate::schema;

/// The immutable in-memory order table.
///
/// Rows are sorted ascending by purchase timestamp; that invariant is
/// established once at construction and never re-checked.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<OrderRecord>,
}

impl Dataset {
    /// Load the dataset from a CSV file.
    ///
    /// Validates the header against the fixed column schema before parsing
    /// rows. A malformed purchase timestamp or a missing required column
    /// fails the load; a dataset with zero rows is rejected because the
    /// date-range picker needs a span to initialize from.
    pub fn load(path: &Path) -> Result<Self> {
        let timer = OperationTimer::new("dataset_load");
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        schema::validate_headers(reader.headers()?)?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: OrderRecord = row?;
            records.push(record);
        }

        if records.is_empty() {
            return Err(DashboardError::EmptyDataset(path.display().to_string()));
        }

        let dataset = Self::from_records(records);
        info!(
            rows = dataset.len(),
            path = %path.display(),
            "Loaded order dataset"
        );
        let duration = timer.finish();
        MetricsCollector::default().record_dataset_load(dataset.len(), duration);

        Ok(dataset)
    }

    /// Build a dataset from already-parsed records.
    ///
    /// Fills the derived delivery-time column from the two timestamps where
    /// it is absent, then sorts by purchase timestamp.
    #[must_use]
    pub fn from_records(mut records: Vec<OrderRecord>) -> Self {
        for record in &mut records {
            if record.delivery_time.is_none() {
                if let Some(delivered) = record.order_delivered_customer_date {
                    let elapsed = delivered - record.order_purchase_timestamp;
                    record.delivery_time = Some(elapsed.num_seconds() as f64 / 86_400.0);
                }
            }
        }
        records.sort_by_key(|r| r.order_purchase_timestamp);
        Self { records }
    }

    /// Number of order lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the dataset has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, sorted by purchase timestamp
    #[must_use]
    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    /// First and last purchase timestamps
    #[must_use]
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((
                first.order_purchase_timestamp,
                last.order_purchase_timestamp,
            )),
            _ => None,
        }
    }

    /// Metadata for initializing the date-range picker
    #[must_use]
    pub fn meta(&self) -> Option<DatasetMeta> {
        self.span().map(|(start, end)| DatasetMeta {
            start,
            end,
            rows: self.len(),
        })
    }

    /// Rows whose purchase timestamp falls within the inclusive range.
    ///
    /// Open bounds default to the dataset span. Returns a borrowed slice of
    /// the sorted table, located by binary search.
    #[must_use]
    pub fn filter_range(&self, range: &DateRange) -> &[OrderRecord] {
        let lo = match range.start {
            Some(start) => self
                .records
                .partition_point(|r| r.order_purchase_timestamp < start),
            None => 0,
        };
        let hi = match range.end {
            Some(end) => self
                .records
                .partition_point(|r| r.order_purchase_timestamp <= end),
            None => self.records.len(),
        };
        if lo >= hi {
            &[]
        } else {
            &self.records[lo..hi]
        }
    }
}
