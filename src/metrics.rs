use anyhow::Result;
use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metrics collection and management
pub struct MetricsCollector {
    // Dataset metrics
    pub dataset_loads_total: &'static str,
    pub dataset_rows_loaded: &'static str,
    pub dataset_load_duration: &'static str,

    // Aggregation metrics
    pub reports_built_total: &'static str,
    pub report_build_duration: &'static str,
    pub report_rows_in_range: &'static str,

    // Export metrics
    pub export_operations_total: &'static str,
    pub export_duration: &'static str,
    pub export_files_created_total: &'static str,

    // HTTP metrics
    pub http_requests_total: &'static str,

    // Error metrics
    pub errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            dataset_loads_total: "order_analytics_dataset_loads_total",
            dataset_rows_loaded: "order_analytics_dataset_rows_loaded",
            dataset_load_duration: "order_analytics_dataset_load_duration_seconds",

            reports_built_total: "order_analytics_reports_built_total",
            report_build_duration: "order_analytics_report_build_duration_seconds",
            report_rows_in_range: "order_analytics_report_rows_in_range",

            export_operations_total: "order_analytics_export_operations_total",
            export_duration: "order_analytics_export_duration_seconds",
            export_files_created_total: "order_analytics_export_files_created_total",

            http_requests_total: "order_analytics_http_requests_total",

            errors_total: "order_analytics_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Initialize metrics collection
    pub fn init() -> Result<()> {
        // Initialize the metrics recorder
        metrics::set_global_recorder(metrics::NoopRecorder)
            .map_err(|e| anyhow::anyhow!("Failed to initialize metrics recorder: {}", e))?;

        Ok(())
    }

    /// Record a dataset load
    pub fn record_dataset_load(&self, rows: usize, duration: Duration) {
        counter!(self.dataset_loads_total).increment(1);
        gauge!(self.dataset_rows_loaded).set(rows as f64);
        histogram!(self.dataset_load_duration).record(duration.as_secs_f64());
    }

    /// Record a dashboard report build
    pub fn record_report_build(&self, rows_in_range: usize, duration: Duration) {
        counter!(self.reports_built_total).increment(1);
        histogram!(self.report_build_duration).record(duration.as_secs_f64());
        histogram!(self.report_rows_in_range).record(rows_in_range as f64);
    }

    /// Record an export operation
    pub fn record_export(&self, format: &str, file_count: usize, duration: Duration) {
        counter!(self.export_operations_total, "format" => format.to_string()).increment(1);
        histogram!(self.export_duration).record(duration.as_secs_f64());
        counter!(self.export_files_created_total).increment(file_count as u64);
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, endpoint: &'static str, success: bool) {
        let status = if success { "success" } else { "error" };
        counter!(self.http_requests_total, "endpoint" => endpoint, "status" => status)
            .increment(1);
    }

    /// Record error metrics
    pub fn record_error(&self, error_type: &str, operation: &str) {
        counter!(
            self.errors_total,
            "type" => error_type.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }
}
