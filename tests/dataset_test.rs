use std::fs;
use std::io::Write;

use proptest::prelude::*;
use tempfile::tempdir;

use order_analytics_rust::analytics::{city_opportunity, daily_sales};
use order_analytics_rust::dataset::Dataset;
use order_analytics_rust::models::{parse_timestamp, DateRange, OrderRecord};

const HEADER: &str = "order_id,order_item_id,customer_id,product_category_name,order_status,\
order_purchase_timestamp,order_delivered_customer_date,payment_type,payment_value,review_score,\
seller_city,customer_city";

fn write_csv(rows: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("orders.csv");
    let mut file = fs::File::create(&path).expect("Failed to create CSV");
    writeln!(file, "{HEADER}").expect("Failed to write header");
    for row in rows {
        writeln!(file, "{row}").expect("Failed to write row");
    }
    (dir, path)
}

#[test]
fn load_sorts_rows_and_derives_delivery_time() {
    // Rows are deliberately out of order; the second has no delivered date.
    let (_dir, path) = write_csv(&[
        "o2,1,c2,garden,delivered,2018-03-05 14:00:00,2018-03-10 14:00:00,boleto,25.50,4.0,\
springfield,shelbyville",
        "o1,1,c1,toys,shipped,2018-01-02 09:30:00,,credit_card,10.00,5.0,ogdenville,springfield",
    ]);

    let dataset = Dataset::load(&path).expect("Failed to load dataset");
    assert_eq!(dataset.len(), 2);

    let records = dataset.records();
    assert_eq!(records[0].order_id, "o1");
    assert_eq!(records[1].order_id, "o2");

    // delivery_time column is absent from the CSV: derived for delivered
    // rows, absent for the undelivered one
    assert_eq!(records[0].delivery_time, None);
    let derived = records[1].delivery_time.expect("derived delivery time");
    assert!((derived - 5.0).abs() < 1e-9);

    let (start, end) = dataset.span().expect("span of non-empty dataset");
    assert_eq!(start, parse_timestamp("2018-01-02 09:30:00").unwrap());
    assert_eq!(end, parse_timestamp("2018-03-05 14:00:00").unwrap());
}

#[test]
fn load_rejects_missing_columns() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("orders.csv");
    let mut file = fs::File::create(&path).expect("Failed to create CSV");
    writeln!(file, "order_id,customer_id").expect("Failed to write header");
    writeln!(file, "o1,c1").expect("Failed to write row");

    let err = Dataset::load(&path).unwrap_err();
    assert!(err.to_string().contains("Missing column"));
}

#[test]
fn load_rejects_empty_dataset() {
    let (_dir, path) = write_csv(&[]);
    let err = Dataset::load(&path).unwrap_err();
    assert!(err.to_string().contains("Empty dataset"));
}

#[test]
fn load_rejects_malformed_purchase_timestamp() {
    let (_dir, path) = write_csv(&[
        "o1,1,c1,toys,delivered,02/01/2018,,credit_card,10.00,5.0,ogdenville,springfield",
    ]);
    assert!(Dataset::load(&path).is_err());
}

#[test]
fn filter_range_bounds_are_inclusive() {
    let (_dir, path) = write_csv(&[
        "o1,1,c1,toys,delivered,2018-01-01 00:00:00,,credit_card,10.00,5.0,a,b",
        "o2,1,c2,toys,delivered,2018-01-15 12:00:00,,credit_card,10.00,5.0,a,b",
        "o3,1,c3,toys,delivered,2018-01-31 23:59:59,,credit_card,10.00,5.0,a,b",
        "o4,1,c4,toys,delivered,2018-02-01 00:00:00,,credit_card,10.00,5.0,a,b",
    ]);
    let dataset = Dataset::load(&path).expect("Failed to load dataset");

    let range = DateRange::parse(Some("2018-01-01"), Some("2018-01-31")).unwrap();
    let slice = dataset.filter_range(&range);
    assert_eq!(slice.len(), 3);
    assert!(slice.iter().all(|r| r.order_id != "o4"));

    // A range before the data is empty, not an error
    let early = DateRange::parse(Some("2016-01-01"), Some("2016-12-31")).unwrap();
    assert!(dataset.filter_range(&early).is_empty());
}

#[test]
fn full_range_filter_reproduces_unfiltered_aggregates() {
    let (_dir, path) = write_csv(&[
        "o1,1,c1,toys,delivered,2018-01-01 08:00:00,,credit_card,12.00,5.0,a,b",
        "o2,2,c2,garden,invoiced,2018-02-10 10:00:00,,boleto,7.50,3.0,b,c",
        "o3,1,c3,toys,shipped,2018-03-20 18:00:00,,voucher,99.99,4.0,c,a",
    ]);
    let dataset = Dataset::load(&path).expect("Failed to load dataset");

    let (start, end) = dataset.span().expect("span");
    let full = DateRange {
        start: Some(start),
        end: Some(end),
    };

    let filtered = dataset.filter_range(&full);
    assert_eq!(filtered.len(), dataset.len());
    assert_eq!(daily_sales(filtered), daily_sales(dataset.records()));
    assert_eq!(city_opportunity(filtered), city_opportunity(dataset.records()));
}

fn arbitrary_record() -> impl Strategy<Value = OrderRecord> {
    (
        0u32..365,
        0u32..86_400,
        0.01f64..500.0,
        prop::sample::select(vec!["credit_card", "boleto", "voucher", "debit_card"]),
        prop::sample::select(vec!["delivered", "invoiced", "shipped", "canceled"]),
    )
        .prop_map(|(day, second, payment_value, payment_type, status)| {
            let base = parse_timestamp("2018-01-01 00:00:00").unwrap();
            let ts = base
                + chrono::Duration::days(i64::from(day))
                + chrono::Duration::seconds(i64::from(second));
            OrderRecord {
                order_id: format!("order-{day}-{second}"),
                order_item_id: 1,
                customer_id: format!("customer-{}", day % 17),
                product_category_name: format!("category-{}", day % 5),
                order_status: status.to_string(),
                order_purchase_timestamp: ts,
                order_delivered_customer_date: None,
                payment_type: payment_type.to_string(),
                payment_value,
                review_score: Some(f64::from(day % 5 + 1)),
                delivery_time: Some(f64::from(day % 20)),
                seller_city: format!("city-{}", day % 11),
                customer_city: format!("city-{}", second % 11),
            }
        })
}

proptest! {
    /// Filtering by the dataset's own min/max span never changes any
    /// aggregate.
    #[test]
    fn prop_full_span_filter_is_identity(records in prop::collection::vec(arbitrary_record(), 1..40)) {
        let dataset = Dataset::from_records(records);
        let (start, end) = dataset.span().expect("non-empty dataset");
        let full = DateRange { start: Some(start), end: Some(end) };

        let filtered = dataset.filter_range(&full);
        prop_assert_eq!(filtered.len(), dataset.len());
        prop_assert_eq!(daily_sales(filtered), daily_sales(dataset.records()));
        prop_assert_eq!(city_opportunity(filtered), city_opportunity(dataset.records()));
    }
}
