use order_analytics_rust::analytics::{
    city_opportunity, daily_sales, delivery_time_and_review, payment_percentages, payment_trends,
    product_purchase_counts, seasonal_top_products, top_products,
};
use order_analytics_rust::models::{parse_timestamp, OrderRecord};

/// Build an order line with sensible defaults; tests overwrite what they
/// care about.
fn order(ts: &str) -> OrderRecord {
    OrderRecord {
        order_id: "order-1".to_string(),
        order_item_id: 1,
        customer_id: "customer-1".to_string(),
        product_category_name: "toys".to_string(),
        order_status: "delivered".to_string(),
        order_purchase_timestamp: parse_timestamp(ts).expect("valid fixture timestamp"),
        order_delivered_customer_date: None,
        payment_type: "credit_card".to_string(),
        payment_value: 10.0,
        review_score: Some(4.0),
        delivery_time: Some(5.0),
        seller_city: "springfield".to_string(),
        customer_city: "shelbyville".to_string(),
    }
}

#[test]
fn aggregators_are_deterministic() {
    let records: Vec<OrderRecord> = (0..50)
        .map(|i| {
            let mut r = order(&format!("2018-03-{:02} 10:00:00", i % 28 + 1));
            r.payment_value = f64::from(i) * 1.5;
            r.payment_type = if i % 3 == 0 { "boleto" } else { "credit_card" }.to_string();
            r.seller_city = format!("city-{}", i % 7);
            r.customer_city = format!("city-{}", i % 5);
            r
        })
        .collect();

    assert_eq!(daily_sales(&records), daily_sales(&records));
    assert_eq!(city_opportunity(&records), city_opportunity(&records));
    assert_eq!(payment_percentages(&records, 12), payment_percentages(&records, 12));
    assert_eq!(payment_trends(&records, 12), payment_trends(&records, 12));
    assert_eq!(
        delivery_time_and_review(&records, 1.5),
        delivery_time_and_review(&records, 1.5)
    );
    assert_eq!(seasonal_top_products(&records, 3), seasonal_top_products(&records, 3));
}

#[test]
fn opportunity_score_is_seller_minus_customer_counts() {
    // springfield: 3 seller lines, 1 customer line -> +2
    // shelbyville: 0 seller lines, 3 customer lines -> -3
    // ogdenville: 1 seller line, 0 customer lines -> +1
    let mut records = Vec::new();
    for _ in 0..3 {
        let mut r = order("2018-01-05 09:00:00");
        r.seller_city = "springfield".to_string();
        r.customer_city = "shelbyville".to_string();
        records.push(r);
    }
    let mut r = order("2018-01-06 09:00:00");
    r.seller_city = "ogdenville".to_string();
    r.customer_city = "springfield".to_string();
    records.push(r);

    let ranking = city_opportunity(&records);
    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking[0].city, "springfield");
    assert_eq!(ranking[0].opportunity, 2);
    assert_eq!(ranking[1].city, "ogdenville");
    assert_eq!(ranking[1].opportunity, 1);
    assert_eq!(ranking[2].city, "shelbyville");
    assert_eq!(ranking[2].opportunity, -3);

    // Sorted descending by score
    for pair in ranking.windows(2) {
        assert!(pair[0].opportunity >= pair[1].opportunity);
    }
}

#[test]
fn payment_percentages_sum_to_100_and_respect_the_window() {
    let mut records = Vec::new();
    // Two years before the latest purchase: outside the trailing window
    let mut stale = order("2016-06-01 12:00:00");
    stale.payment_type = "voucher".to_string();
    records.push(stale);
    for i in 0..6 {
        let mut r = order(&format!("2018-0{}-10 12:00:00", i % 5 + 1));
        r.payment_type = if i % 2 == 0 { "credit_card" } else { "boleto" }.to_string();
        records.push(r);
    }
    records.sort_by_key(|r| r.order_purchase_timestamp);

    let shares = payment_percentages(&records, 12);
    let total: f64 = shares.iter().map(|s| s.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9);

    // The stale voucher row is excluded entirely
    assert!(shares.iter().all(|s| s.payment_type != "voucher"));

    // Ordered by count descending
    for pair in shares.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }
}

#[test]
fn payment_trends_zero_fill_missing_cells() {
    let mut a = order("2018-01-10 12:00:00");
    a.payment_type = "credit_card".to_string();
    let mut b = order("2018-02-10 12:00:00");
    b.payment_type = "boleto".to_string();
    let mut c = order("2018-02-11 12:00:00");
    c.payment_type = "boleto".to_string();

    let trends = payment_trends(&[a, b, c], 12);
    assert_eq!(trends.months, vec!["2018-01", "2018-02"]);
    assert_eq!(trends.methods, vec!["boleto", "credit_card"]);
    // January has no boleto rows, February has no credit_card rows
    assert_eq!(trends.counts, vec![vec![0, 1], vec![2, 0]]);
}

#[test]
fn iqr_trimming_uses_the_tukey_fence() {
    // Delivery times 1..=9 plus one extreme outlier at 100 days.
    // Q1 = 3.25, Q3 = 7.75, IQR = 4.5 -> fence [-3.5, 14.5].
    let mut records = Vec::new();
    for day in 1..=9 {
        let mut r = order(&format!("2018-04-{:02} 08:00:00", day));
        r.delivery_time = Some(f64::from(day));
        r.review_score = Some(5.0);
        records.push(r);
    }
    let mut outlier = order("2018-04-20 08:00:00");
    outlier.delivery_time = Some(100.0);
    outlier.review_score = Some(1.0);
    records.push(outlier);

    let points = delivery_time_and_review(&records, 1.5);
    assert_eq!(points.len(), 9);
    assert!(points.iter().all(|p| p.delivery_time <= 9.0));
    assert!(points.iter().all(|p| (p.review_score - 5.0).abs() < 1e-9));
}

#[test]
fn delivery_groups_average_only_scored_rows() {
    let mut fast_good = order("2018-04-01 08:00:00");
    fast_good.delivery_time = Some(3.0);
    fast_good.review_score = Some(5.0);
    let mut fast_bad = order("2018-04-02 08:00:00");
    fast_bad.delivery_time = Some(3.0);
    fast_bad.review_score = Some(2.0);
    let mut fast_unscored = order("2018-04-03 08:00:00");
    fast_unscored.delivery_time = Some(3.0);
    fast_unscored.review_score = None;
    let mut slow_unscored = order("2018-04-04 08:00:00");
    slow_unscored.delivery_time = Some(9.0);
    slow_unscored.review_score = None;

    let points =
        delivery_time_and_review(&[fast_good, fast_bad, fast_unscored, slow_unscored], 1.5);
    // The all-unscored 9-day group is omitted; the 3-day group averages the
    // two scored rows.
    assert_eq!(points.len(), 1);
    assert!((points[0].delivery_time - 3.0).abs() < 1e-9);
    assert!((points[0].review_score - 3.5).abs() < 1e-9);
}

#[test]
fn daily_sales_total_matches_slice_total() {
    let records: Vec<OrderRecord> = (0..20)
        .map(|i| {
            let mut r = order(&format!("2018-02-{:02} 11:00:00", i % 9 + 1));
            r.payment_value = f64::from(i) + 0.25;
            r
        })
        .collect();

    let series = daily_sales(&records);
    let series_total: f64 = series.iter().map(|d| d.total).sum();
    let slice_total: f64 = records.iter().map(|r| r.payment_value).sum();
    assert!((series_total - slice_total).abs() < 1e-9);
}

#[test]
fn top_products_ranks_customer_category_pairs() {
    let mut records = Vec::new();
    for (customer, category, lines) in [
        ("c1", "toys", 4),
        ("c2", "toys", 2),
        ("c2", "garden", 1),
        ("c3", "housewares", 3),
    ] {
        for _ in 0..lines {
            let mut r = order("2018-05-01 10:00:00");
            r.customer_id = customer.to_string();
            r.product_category_name = category.to_string();
            records.push(r);
        }
    }

    let counts = product_purchase_counts(&records);
    assert_eq!(counts.len(), 4);

    let top = top_products(&counts, 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].customer_id, "c1");
    assert_eq!(top[0].count, 4);
    assert_eq!(top[1].customer_id, "c3");
    assert_eq!(top[1].count, 3);
}

#[test]
fn seasonal_sales_keep_only_the_top_categories() {
    let mut records = Vec::new();
    for (month, category, item_id) in [
        ("01", "toys", 8),
        ("02", "toys", 8),
        ("01", "garden", 5),
        ("02", "garden", 5),
        ("01", "housewares", 3),
        ("01", "books", 1),
    ] {
        let mut r = order(&format!("2018-{month}-15 10:00:00"));
        r.product_category_name = category.to_string();
        r.order_item_id = item_id;
        records.push(r);
    }

    let series = seasonal_top_products(&records, 3);
    let categories: Vec<&str> = series.iter().map(|s| s.category.as_str()).collect();
    assert!(categories.contains(&"toys"));
    assert!(categories.contains(&"garden"));
    assert!(categories.contains(&"housewares"));
    assert!(!categories.contains(&"books"));

    // Monthly units are the per-month sums for each kept category
    let toys_january = series
        .iter()
        .find(|s| s.category == "toys" && s.month == "2018-01")
        .expect("toys January row");
    assert_eq!(toys_january.units, 8);
}

#[test]
fn empty_slice_yields_empty_series() {
    let records: Vec<OrderRecord> = Vec::new();
    assert!(daily_sales(&records).is_empty());
    assert!(product_purchase_counts(&records).is_empty());
    assert!(payment_percentages(&records, 12).is_empty());
    assert!(payment_trends(&records, 12).is_empty());
    assert!(city_opportunity(&records).is_empty());
    assert!(delivery_time_and_review(&records, 1.5).is_empty());
    assert!(seasonal_top_products(&records, 3).is_empty());
}
