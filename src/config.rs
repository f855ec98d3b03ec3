use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub logging: LoggingConfig,
    pub analytics: AnalyticsConfig,
    pub export: ExportConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub csv_path: String,
    pub assets_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Trailing window for the payment aggregates, in calendar months
    pub trailing_months: u32,
    /// Number of (customer, category) rows in the top-products chart
    pub top_products: usize,
    /// Number of cities in the opportunity chart
    pub top_cities: usize,
    /// Number of categories in the seasonal-sales chart
    pub top_categories: usize,
    /// IQR fence multiplier for delivery-time outlier trimming
    pub iqr_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub default_format: String,
    pub output_directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                csv_path: "data/orders.csv".to_string(),
                assets_dir: Some("assets".to_string()),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            analytics: AnalyticsConfig {
                trailing_months: 12,
                top_products: 5,
                top_cities: 10,
                top_categories: 3,
                iqr_multiplier: 1.5,
            },
            export: ExportConfig {
                default_format: "json".to_string(),
                output_directory: "./output".to_string(),
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&AppConfig::default())
            .map_err(|e| anyhow::anyhow!("Failed to build default configuration: {}", e))?;

        let config = Config::builder()
            // Start with default values
            .add_source(defaults)
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("ORDER_ANALYTICS").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate data config
        if self.data.csv_path.trim().is_empty() {
            return Err(anyhow::anyhow!("csv_path must not be empty"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_log_formats = ["text", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_log_formats
            ));
        }

        // Validate analytics config
        if self.analytics.trailing_months == 0 {
            return Err(anyhow::anyhow!("trailing_months must be greater than 0"));
        }
        if self.analytics.top_products == 0 {
            return Err(anyhow::anyhow!("top_products must be greater than 0"));
        }
        if self.analytics.top_cities == 0 {
            return Err(anyhow::anyhow!("top_cities must be greater than 0"));
        }
        if self.analytics.top_categories == 0 {
            return Err(anyhow::anyhow!("top_categories must be greater than 0"));
        }
        if self.analytics.iqr_multiplier <= 0.0 {
            return Err(anyhow::anyhow!("iqr_multiplier must be greater than 0"));
        }

        // Validate export config
        let valid_formats = ["json", "csv", "txt"];
        if !valid_formats.contains(&self.export.default_format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid export format: {}. Must be one of: {:?}",
                self.export.default_format,
                valid_formats
            ));
        }

        if self.export.output_directory.trim().is_empty() {
            return Err(anyhow::anyhow!("output_directory must not be empty"));
        }

        // Validate server config
        if self.server.host.trim().is_empty() {
            return Err(anyhow::anyhow!("server host must not be empty"));
        }
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("server port must be greater than 0"));
        }

        Ok(())
    }

    /// Get dataset path from environment or config
    pub fn get_csv_path(&self) -> String {
        std::env::var("ORDER_ANALYTICS_CSV").unwrap_or_else(|_| self.data.csv_path.clone())
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
