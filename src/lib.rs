//! Order Analytics - E-commerce Dashboard
//!
//! A Rust library for loading a pre-cleaned e-commerce order dataset,
//! filtering it by purchase-date range, and computing the descriptive
//! aggregates behind a fixed set of dashboard charts.
//!
//! # Features
//!
//! - Load order-line records from CSV with schema validation
//! - Filter by an inclusive date range over the sorted table
//! - Seven pure aggregations (daily sales, top products, payment mix and
//!   trends, city opportunity, delivery time vs. review, seasonal sales)
//! - Export chart data to JSON/CSV/TXT or serve it over HTTP

/// Order aggregations
pub mod analytics;
/// Configuration management
pub mod config;
/// Dashboard report assembly
pub mod dashboard;
/// Dataset loading and range filtering
pub mod dataset;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// File export of dashboard data
pub mod report;
/// Dataset column schema
pub mod schema;
/// HTTP surface for the browser dashboard
pub mod server;
/// Formatting helpers
pub mod utils;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use dashboard::{build_report, DashboardReport};
pub use dataset::Dataset;
pub use error::{DashboardError, Result};
pub use models::{DateRange, OrderRecord, OutputFormat};
