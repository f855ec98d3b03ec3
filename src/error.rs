//! Error types for the order-analytics-rust library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use thiserror::Error;

/// Errors that can occur in the order-analytics-rust application.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is missing from the dataset header
    #[error("Missing column in dataset: {0}")]
    MissingColumn(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// The dataset contains no rows
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Other(err.to_string())
    }
}
