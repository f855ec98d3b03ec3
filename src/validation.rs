use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use std::path::Path;

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a `YYYY-MM-DD` date argument
    pub fn validate_date_str(date: &str) -> Result<()> {
        if date.trim().is_empty() {
            return Err(anyhow!("Date cannot be empty"));
        }

        if chrono::NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").is_err() {
            return Err(anyhow!("Invalid date: {} (expected YYYY-MM-DD)", date));
        }

        Ok(())
    }

    /// Validate date range ordering
    pub fn validate_date_range(
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<()> {
        if let (Some(start_date), Some(end_date)) = (start, end) {
            if start_date > end_date {
                return Err(anyhow!(
                    "Start date {} is after end date {}",
                    start_date.format("%Y-%m-%d"),
                    end_date.format("%Y-%m-%d")
                ));
            }
        }

        Ok(())
    }

    /// Validate an output format name
    pub fn validate_output_format(format: &str) -> Result<()> {
        let valid_formats = ["json", "csv", "txt"];
        if !valid_formats.contains(&format.to_lowercase().as_str()) {
            return Err(anyhow!(
                "Invalid output format: {}. Must be one of: {:?}",
                format,
                valid_formats
            ));
        }

        Ok(())
    }

    /// Validate the dataset file path
    pub fn validate_data_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();

        if path_str.is_empty() {
            return Err(anyhow!("Dataset path cannot be empty"));
        }

        if path_str.contains('\0') {
            return Err(anyhow!("Dataset path contains invalid characters"));
        }

        // Check path length
        if path_str.len() > 4096 {
            return Err(anyhow!("Dataset path too long (max 4096 characters)"));
        }

        Ok(())
    }

    /// Validate the output directory path
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();

        if path_str.is_empty() {
            return Err(anyhow!("Output directory cannot be empty"));
        }

        // Check for path traversal attempts
        if path_str.contains("..") {
            return Err(anyhow!(
                "Output directory contains potentially dangerous characters"
            ));
        }

        Ok(())
    }
}
