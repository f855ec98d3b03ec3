//! File export of dashboard data.
//!
//! This module provides functions for writing a dashboard report to files in
//! various formats (JSON, CSV, TXT) with consistent naming: one JSON
//! document for the full payload, or one CSV file per chart plus a
//! plain-text summary.

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::dashboard::DashboardReport;
use crate::error::Result;
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::OutputFormat;

/// Write a dashboard report to the output directory.
///
/// # Arguments
///
/// * `report` - The assembled dashboard payload
/// * `format` - Output format (JSON, CSV, or TXT)
/// * `output_dir` - Directory for the created files; created if absent
///
/// # Returns
///
/// Vector of paths to created files
pub fn write_report(
    report: &DashboardReport,
    format: OutputFormat,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let timer = OperationTimer::new("report_export");
    create_dir_all(output_dir)?;

    let files = match format {
        OutputFormat::Json => vec![write_json_report(report, output_dir)?],
        OutputFormat::Csv => {
            let mut files = write_csv_reports(report, output_dir)?;
            files.push(write_summary_txt(report, output_dir)?);
            files
        }
        OutputFormat::Txt => vec![write_summary_txt(report, output_dir)?],
    };

    let duration = timer.finish();
    MetricsCollector::default().record_export(format.extension(), files.len(), duration);

    Ok(files)
}

/// Write the full payload as one pretty-printed JSON document.
fn write_json_report(report: &DashboardReport, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join("dashboard.json");
    let file = File::create(&path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(path)
}

/// Write one CSV file per chart.
fn write_csv_reports(report: &DashboardReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let path = output_dir.join("daily_sales.csv");
    let mut writer = Writer::from_writer(File::create(&path)?);
    writer.write_record(["date", "total_sales"])?;
    for row in &report.daily_sales {
        writer.write_record([row.date.to_string(), format!("{:.2}", row.total)])?;
    }
    writer.flush()?;
    files.push(path);

    let path = output_dir.join("top_products.csv");
    let mut writer = Writer::from_writer(File::create(&path)?);
    writer.write_record(["customer_id", "product_category", "count"])?;
    for row in &report.top_products {
        writer.write_record([
            row.customer_id.clone(),
            row.category.clone(),
            row.count.to_string(),
        ])?;
    }
    writer.flush()?;
    files.push(path);

    let path = output_dir.join("payment_percentages.csv");
    let mut writer = Writer::from_writer(File::create(&path)?);
    writer.write_record(["payment_type", "count", "percentage"])?;
    for row in &report.payment_percentages {
        writer.write_record([
            row.payment_type.clone(),
            row.count.to_string(),
            format!("{:.4}", row.percentage),
        ])?;
    }
    writer.flush()?;
    files.push(path);

    // Wide layout: one month per row, one column per payment method
    let path = output_dir.join("payment_trends.csv");
    let mut writer = Writer::from_writer(File::create(&path)?);
    let mut header = vec!["month".to_string()];
    header.extend(report.payment_trends.methods.iter().cloned());
    writer.write_record(&header)?;
    for (month, counts) in report
        .payment_trends
        .months
        .iter()
        .zip(&report.payment_trends.counts)
    {
        let mut row = vec![month.clone()];
        row.extend(counts.iter().map(ToString::to_string));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    files.push(path);

    let path = output_dir.join("city_opportunity.csv");
    let mut writer = Writer::from_writer(File::create(&path)?);
    writer.write_record(["city", "opportunity"])?;
    for row in &report.city_opportunity {
        writer.write_record([row.city.clone(), row.opportunity.to_string()])?;
    }
    writer.flush()?;
    files.push(path);

    let path = output_dir.join("delivery_review.csv");
    let mut writer = Writer::from_writer(File::create(&path)?);
    writer.write_record(["delivery_time", "review_score"])?;
    for row in &report.delivery_review {
        writer.write_record([
            format!("{}", row.delivery_time),
            format!("{:.4}", row.review_score),
        ])?;
    }
    writer.flush()?;
    files.push(path);

    let path = output_dir.join("seasonal_sales.csv");
    let mut writer = Writer::from_writer(File::create(&path)?);
    writer.write_record(["month", "product_category", "units"])?;
    for row in &report.seasonal_sales {
        writer.write_record([row.month.clone(), row.category.clone(), row.units.to_string()])?;
    }
    writer.flush()?;
    files.push(path);

    Ok(files)
}

/// Write the headline metrics as plain text.
fn write_summary_txt(report: &DashboardReport, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join("summary.txt");
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "Order Analytics Dashboard")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Total Sales (USD): {}",
        report.summary.total_sales_formatted
    )?;
    writeln!(
        writer,
        "Order lines: {} ({} fulfilled)",
        report.summary.order_lines, report.summary.fulfilled_lines
    )?;
    match (report.range.start, report.range.end) {
        (Some(start), Some(end)) => writeln!(
            writer,
            "Range: {} to {}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )?,
        _ => writeln!(writer, "Range: full dataset")?,
    }
    if let Some(top) = report.city_opportunity.first() {
        writeln!(
            writer,
            "Top opportunity city: {} ({:+})",
            top.city, top.opportunity
        )?;
    }

    writer.flush()?;
    Ok(path)
}
