use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use order_analytics_rust::config::AppConfig;
use order_analytics_rust::dashboard::build_report;
use order_analytics_rust::dataset::Dataset;
use order_analytics_rust::logging::init_logging;
use order_analytics_rust::metrics::MetricsCollector;
use order_analytics_rust::models::{DateRange, OutputFormat};
use order_analytics_rust::report::write_report;
use order_analytics_rust::server::{self, AppState};
use order_analytics_rust::validation::InputValidator;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the dashboard data for a date range to files
    Report {
        /// Path to the order dataset CSV (overrides configuration)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Start date for the range (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<String>,

        /// End date for the range (YYYY-MM-DD)
        #[arg(short, long)]
        end_date: Option<String>,

        /// Output format (json, csv or txt)
        #[arg(short, long)]
        format: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Serve the dashboard API for a browser UI
    Serve {
        /// Path to the order dataset CSV (overrides configuration)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Host address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of static assets (sidebar logo)
        #[arg(long)]
        assets_dir: Option<PathBuf>,
    },
    /// Log the headline metrics for a date range
    Summary {
        /// Path to the order dataset CSV (overrides configuration)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Start date for the range (YYYY-MM-DD)
        #[arg(short, long)]
        start_date: Option<String>,

        /// End date for the range (YYYY-MM-DD)
        #[arg(short, long)]
        end_date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging; the guard must live until exit
    let log_file = config.logging.file_path.clone();
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        log_file.as_deref().map(Path::new),
    )?;

    if let Err(e) = MetricsCollector::init() {
        warn!("Metrics collection disabled: {}", e);
    }

    info!("Starting order-analytics-rust application");

    // Parse command line arguments
    let cli = Cli::parse();

    // Process command
    match &cli.command {
        Commands::Report {
            data,
            start_date,
            end_date,
            format,
            output_dir,
        } => run_report(&config, data, start_date, end_date, format, output_dir)?,
        Commands::Serve {
            data,
            host,
            port,
            assets_dir,
        } => run_serve(&config, data, host, port, assets_dir).await?,
        Commands::Summary {
            data,
            start_date,
            end_date,
        } => run_summary(&config, data, start_date, end_date)?,
    }

    Ok(())
}

/// Export the dashboard data for a date range to files
fn run_report(
    config: &AppConfig,
    data: &Option<PathBuf>,
    start_date: &Option<String>,
    end_date: &Option<String>,
    format: &Option<String>,
    output_dir: &Option<PathBuf>,
) -> Result<()> {
    let dataset = load_dataset(config, data)?;
    let range = parse_date_range(start_date, end_date)?;

    // Parse output format
    let format_name = format
        .clone()
        .unwrap_or_else(|| config.export.default_format.clone());
    let output_format = if InputValidator::validate_output_format(&format_name).is_ok() {
        match format_name.to_lowercase().as_str() {
            "csv" => OutputFormat::Csv,
            "txt" => OutputFormat::Txt,
            _ => OutputFormat::Json,
        }
    } else {
        warn!("Invalid format: {}. Using json as default.", format_name);
        OutputFormat::Json
    };

    // Use configuration output directory if not provided
    let effective_output_dir = output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.export.output_directory));
    InputValidator::validate_output_dir(&effective_output_dir)?;

    info!("Building dashboard report");
    let report = build_report(&dataset, &range, &config.analytics);

    let files = write_report(&report, output_format, &effective_output_dir)?;
    info!("Exported {} files to {}", files.len(), effective_output_dir.display());
    for file in &files {
        info!("  {}", file.display());
    }

    Ok(())
}

/// Serve the dashboard API for a browser UI
async fn run_serve(
    config: &AppConfig,
    data: &Option<PathBuf>,
    host: &Option<String>,
    port: &Option<u16>,
    assets_dir: &Option<PathBuf>,
) -> Result<()> {
    let dataset = load_dataset(config, data)?;

    let mut server_config = config.server.clone();
    if let Some(host) = host {
        server_config.host = host.clone();
    }
    if let Some(port) = port {
        server_config.port = *port;
    }

    // CLI override, then configuration, then no asset route
    let assets = assets_dir
        .clone()
        .or_else(|| config.data.assets_dir.clone().map(PathBuf::from));
    if let Some(dir) = &assets {
        if !dir.is_dir() {
            warn!("Assets directory {} not found; /assets disabled", dir.display());
        }
    }
    let assets = assets.filter(|dir| dir.is_dir());

    let state = Arc::new(AppState {
        dataset: Arc::new(dataset),
        analytics: config.analytics.clone(),
    });

    server::serve(state, &server_config, assets)
        .await
        .context("Dashboard server failed")?;

    Ok(())
}

/// Log the headline metrics for a date range
fn run_summary(
    config: &AppConfig,
    data: &Option<PathBuf>,
    start_date: &Option<String>,
    end_date: &Option<String>,
) -> Result<()> {
    let dataset = load_dataset(config, data)?;
    let range = parse_date_range(start_date, end_date)?;

    let report = build_report(&dataset, &range, &config.analytics);

    info!("Total Sales (USD): {}", report.summary.total_sales_formatted);
    info!(
        "Order lines: {} ({} fulfilled)",
        report.summary.order_lines, report.summary.fulfilled_lines
    );
    if let Some(top) = report.city_opportunity.first() {
        info!("Top opportunity city: {} ({:+})", top.city, top.opportunity);
    }
    if let Some(first) = report.payment_percentages.first() {
        info!(
            "Leading payment method: {} ({:.1}%)",
            first.payment_type, first.percentage
        );
    }

    Ok(())
}

/// Load the dataset from the CLI override or the configured path
fn load_dataset(config: &AppConfig, data: &Option<PathBuf>) -> Result<Dataset> {
    let path = data
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.get_csv_path()));
    InputValidator::validate_data_path(&path)?;

    info!("Loading order dataset from {}", path.display());
    let dataset = Dataset::load(&path)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))?;

    Ok(dataset)
}

/// Parse date range from string options
fn parse_date_range(start_date: &Option<String>, end_date: &Option<String>) -> Result<DateRange> {
    if let Some(start) = start_date {
        InputValidator::validate_date_str(start)?;
    }
    if let Some(end) = end_date {
        InputValidator::validate_date_str(end)?;
    }

    let range = DateRange::parse(start_date.as_deref(), end_date.as_deref())?;
    InputValidator::validate_date_range(range.start, range.end)?;

    Ok(range)
}
