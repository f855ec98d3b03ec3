//! Order aggregations
//!
//! Seven independent, stateless transforms over a filtered slice of the
//! order table. Each is a pure function: same slice in, same series out.
//! An empty slice yields an empty series, never an error. All functions
//! assume the slice is sorted by purchase timestamp, which the dataset
//! layer guarantees.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Months, NaiveDateTime};

use crate::models::{
    CityOpportunity, DailySales, DeliveryReviewPoint, OrderRecord, PaymentShare, PaymentTrends,
    ProductCount, SeasonalSales,
};
use crate::utils::month_key;

/// Order statuses counted as fulfilled
pub const FULFILLED_STATUSES: [&str; 2] = ["delivered", "invoiced"];

/// Total sales for each calendar day of the slice.
///
/// Buckets run from the first to the last purchase date inclusive; days
/// without orders contribute 0.0, so line charts show the gaps.
#[must_use]
pub fn daily_sales(records: &[OrderRecord]) -> Vec<DailySales> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.purchase_date()).or_insert(0.0) += record.payment_value;
    }

    let (Some(&first), Some(&last)) = (totals.keys().next(), totals.keys().next_back()) else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut day = first;
    while day <= last {
        series.push(DailySales {
            date: day,
            total: totals.get(&day).copied().unwrap_or(0.0),
        });
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    series
}

/// Rows with a fulfilled (delivered or invoiced) order status.
#[must_use]
pub fn fulfilled_subset(records: &[OrderRecord]) -> Vec<&OrderRecord> {
    records
        .iter()
        .filter(|r| FULFILLED_STATUSES.contains(&r.order_status.as_str()))
        .collect()
}

/// Purchase counts per (customer, product category) pair.
///
/// Counts all order lines regardless of status; the fulfilled filter
/// applies to the subset metric, not here.
#[must_use]
pub fn product_purchase_counts(records: &[OrderRecord]) -> Vec<ProductCount> {
    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for record in records {
        *counts
            .entry((
                record.customer_id.as_str(),
                record.product_category_name.as_str(),
            ))
            .or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|((customer_id, category), count)| ProductCount {
            customer_id: customer_id.to_string(),
            category: category.to_string(),
            count,
        })
        .collect()
}

/// The `n` most purchased (customer, category) pairs, by count descending.
#[must_use]
pub fn top_products(counts: &[ProductCount], n: usize) -> Vec<ProductCount> {
    let mut ranked = counts.to_vec();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

/// Payment-method share of the trailing window, ordered by count descending.
///
/// The window covers purchases on or after (latest purchase timestamp in
/// the slice − `trailing_months`). Percentages are of all order lines in
/// the window, so the series sums to 100.
#[must_use]
pub fn payment_percentages(records: &[OrderRecord], trailing_months: u32) -> Vec<PaymentShare> {
    let window = trailing_window(records, trailing_months);
    if window.is_empty() {
        return Vec::new();
    }

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in window {
        *counts.entry(record.payment_type.as_str()).or_insert(0) += 1;
    }

    let total = window.len() as f64;
    let mut shares: Vec<PaymentShare> = counts
        .into_iter()
        .map(|(payment_type, count)| PaymentShare {
            payment_type: payment_type.to_string(),
            count,
            percentage: count as f64 / total * 100.0,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.payment_type.cmp(&b.payment_type))
    });
    shares
}

/// Month x payment-method count matrix for the trailing window.
///
/// Months ascend, methods are alphabetical, and absent (month, method)
/// cells are zero-filled so every series has the same length.
#[must_use]
pub fn payment_trends(records: &[OrderRecord], trailing_months: u32) -> PaymentTrends {
    let window = trailing_window(records, trailing_months);
    if window.is_empty() {
        return PaymentTrends::default();
    }

    let mut months = BTreeSet::new();
    let mut methods = BTreeSet::new();
    let mut cells: HashMap<(String, String), u64> = HashMap::new();
    for record in window {
        let month = month_key(record.order_purchase_timestamp);
        months.insert(month.clone());
        methods.insert(record.payment_type.clone());
        *cells
            .entry((month, record.payment_type.clone()))
            .or_insert(0) += 1;
    }

    let months: Vec<String> = months.into_iter().collect();
    let methods: Vec<String> = methods.into_iter().collect();
    let counts = months
        .iter()
        .map(|month| {
            methods
                .iter()
                .map(|method| {
                    cells
                        .get(&(month.clone(), method.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    PaymentTrends {
        months,
        methods,
        counts,
    }
}

/// Opportunity score per city, sorted descending.
///
/// Score = seller order count − customer order count; a city seen on only
/// one side counts zero on the other, so one-sided cities stay in the
/// ranking. Ties break by city name to keep the order deterministic.
#[must_use]
pub fn city_opportunity(records: &[OrderRecord]) -> Vec<CityOpportunity> {
    let mut scores: BTreeMap<&str, i64> = BTreeMap::new();
    for record in records {
        *scores.entry(record.seller_city.as_str()).or_insert(0) += 1;
        *scores.entry(record.customer_city.as_str()).or_insert(0) -= 1;
    }

    let mut ranking: Vec<CityOpportunity> = scores
        .into_iter()
        .map(|(city, opportunity)| CityOpportunity {
            city: city.to_string(),
            opportunity,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.opportunity
            .cmp(&a.opportunity)
            .then_with(|| a.city.cmp(&b.city))
    });
    ranking
}

/// Average review score per exact delivery-time value, after IQR trimming.
///
/// Rows outside [Q1 − m·IQR, Q3 + m·IQR] of the slice's delivery times are
/// discarded (m is the fence multiplier, 1.5 for the Tukey fence). Rows
/// without a review score count for trimming but not for the averages; a
/// delivery-time group with no scored rows is omitted.
#[must_use]
pub fn delivery_time_and_review(
    records: &[OrderRecord],
    fence_multiplier: f64,
) -> Vec<DeliveryReviewPoint> {
    let mut times: Vec<f64> = records
        .iter()
        .filter_map(|r| r.delivery_time)
        .filter(|t| t.is_finite())
        .collect();
    if times.is_empty() {
        return Vec::new();
    }
    times.sort_by(f64::total_cmp);

    let q1 = quantile(&times, 0.25);
    let q3 = quantile(&times, 0.75);
    let iqr = q3 - q1;
    let lower = q1 - fence_multiplier * iqr;
    let upper = q3 + fence_multiplier * iqr;

    // Group survivors by exact value; f64 keys go through their bit
    // patterns since the trimmed data contains no NaN.
    let mut groups: HashMap<u64, (f64, f64, u64)> = HashMap::new();
    for record in records {
        let Some(time) = record.delivery_time else {
            continue;
        };
        if !time.is_finite() || time < lower || time > upper {
            continue;
        }
        if let Some(score) = record.review_score {
            let entry = groups.entry(time.to_bits()).or_insert((time, 0.0, 0));
            entry.1 += score;
            entry.2 += 1;
        }
    }

    let mut points: Vec<DeliveryReviewPoint> = groups
        .into_values()
        .map(|(delivery_time, sum, n)| DeliveryReviewPoint {
            delivery_time,
            review_score: sum / n as f64,
        })
        .collect();
    points.sort_by(|a, b| a.delivery_time.total_cmp(&b.delivery_time));
    points
}

/// Monthly unit sales of the `top_n` product categories.
///
/// Units are the sum of item sequence numbers per (month, category), the
/// proxy the source dataset uses. The top categories are chosen by their
/// all-range totals, then every month of each winner is kept, ordered by
/// month then category.
#[must_use]
pub fn seasonal_top_products(records: &[OrderRecord], top_n: usize) -> Vec<SeasonalSales> {
    let mut monthly: BTreeMap<(String, &str), u64> = BTreeMap::new();
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        let month = month_key(record.order_purchase_timestamp);
        let category = record.product_category_name.as_str();
        let units = u64::from(record.order_item_id);
        *monthly.entry((month, category)).or_insert(0) += units;
        *totals.entry(category).or_insert(0) += units;
    }

    let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let winners: BTreeSet<&str> = ranked.into_iter().take(top_n).map(|(c, _)| c).collect();

    monthly
        .into_iter()
        .filter(|((_, category), _)| winners.contains(category))
        .map(|((month, category), units)| SeasonalSales {
            month,
            category: category.to_string(),
            units,
        })
        .collect()
}

/// Rows of the trailing window: purchases on or after the latest purchase
/// timestamp minus `months` calendar months. Relies on the sort order, so
/// the window is the tail of the slice.
fn trailing_window(records: &[OrderRecord], months: u32) -> &[OrderRecord] {
    let Some(last) = records.last() else {
        return records;
    };
    let cutoff = last
        .order_purchase_timestamp
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDateTime::MIN);
    let lo = records.partition_point(|r| r.order_purchase_timestamp < cutoff);
    &records[lo..]
}

/// Quantile of sorted values with linear interpolation between ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let position = q * (n - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
