//! Dashboard report assembly
//!
//! Binds the aggregations to one presentable payload: each chart's backing
//! series plus the headline summary metrics. Re-built in full for every
//! interaction; nothing feeds back into the data layer.

use serde::Serialize;

use crate::analytics;
use crate::config::AnalyticsConfig;
use crate::dataset::Dataset;
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{
    CityOpportunity, DailySales, DateRange, DeliveryReviewPoint, PaymentShare, PaymentTrends,
    ProductCount, SeasonalSales,
};
use crate::utils::format_usd;

/// Headline metrics shown above the charts
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Sum of payment values in the range
    pub total_sales: f64,
    /// Total sales formatted as USD currency
    pub total_sales_formatted: String,
    /// Number of order lines in the range
    pub order_lines: usize,
    /// Number of delivered or invoiced order lines in the range
    pub fulfilled_lines: usize,
}

/// The full dashboard payload for one date range
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    /// The requested range (open bounds mean the dataset span)
    pub range: DateRange,
    /// Headline metrics
    pub summary: DashboardSummary,
    /// Daily sales totals, zero-filled
    pub daily_sales: Vec<DailySales>,
    /// Most purchased (customer, category) pairs
    pub top_products: Vec<ProductCount>,
    /// Trailing-window payment-method percentages
    pub payment_percentages: Vec<PaymentShare>,
    /// Trailing-window month x payment-method counts
    pub payment_trends: PaymentTrends,
    /// Cities ranked by opportunity score
    pub city_opportunity: Vec<CityOpportunity>,
    /// Outlier-trimmed delivery time vs. average review score
    pub delivery_review: Vec<DeliveryReviewPoint>,
    /// Monthly unit sales of the top product categories
    pub seasonal_sales: Vec<SeasonalSales>,
}

/// Build the dashboard report for a date range.
///
/// Filters the dataset to the range, runs every aggregation on the filtered
/// slice, and assembles the payload. An empty range produces empty series
/// and zeroed summary metrics.
#[must_use]
pub fn build_report(
    dataset: &Dataset,
    range: &DateRange,
    options: &AnalyticsConfig,
) -> DashboardReport {
    let timer = OperationTimer::new("report_build");
    let slice = dataset.filter_range(range);

    let daily_sales = analytics::daily_sales(slice);
    let fulfilled = analytics::fulfilled_subset(slice);
    let product_counts = analytics::product_purchase_counts(slice);
    let top_products = analytics::top_products(&product_counts, options.top_products);
    let payment_percentages = analytics::payment_percentages(slice, options.trailing_months);
    let payment_trends = analytics::payment_trends(slice, options.trailing_months);
    let mut city_opportunity = analytics::city_opportunity(slice);
    city_opportunity.truncate(options.top_cities);
    let delivery_review = analytics::delivery_time_and_review(slice, options.iqr_multiplier);
    let seasonal_sales = analytics::seasonal_top_products(slice, options.top_categories);

    let total_sales: f64 = slice.iter().map(|r| r.payment_value).sum();
    let summary = DashboardSummary {
        total_sales,
        total_sales_formatted: format_usd(total_sales),
        order_lines: slice.len(),
        fulfilled_lines: fulfilled.len(),
    };

    let report = DashboardReport {
        range: *range,
        summary,
        daily_sales,
        top_products,
        payment_percentages,
        payment_trends,
        city_opportunity,
        delivery_review,
        seasonal_sales,
    };

    let duration = timer.finish();
    MetricsCollector::default().record_report_build(slice.len(), duration);

    report
}
