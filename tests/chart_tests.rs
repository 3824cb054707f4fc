// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tallybook::chart::{
    BucketPolicy, ChartRange, LabelStyle, compute_buckets, select_policy,
};
use tallybook::models::{Transaction, TxType};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tx(date: &str, kind: TxType, category: &str, amount: i64) -> Transaction {
    Transaction {
        id: 0,
        r#type: kind,
        category: category.to_string(),
        subcategory: None,
        date: d(date),
        amount: Decimal::from(amount),
        note: String::new(),
        timestamp: 0,
    }
}

fn labels(buckets: &[tallybook::chart::Bucket]) -> Vec<String> {
    buckets.iter().map(|b| b.label.clone()).collect()
}

#[test]
fn two_day_custom_range_splits_income_and_expense() {
    let txs = vec![
        tx("2024-01-01", TxType::Expense, "Food", 10),
        tx("2024-01-02", TxType::Income, "Salary", 20),
    ];
    let range = ChartRange::custom(d("2024-01-01"), d("2024-01-02"));
    let buckets = compute_buckets(&txs, &range, d("2030-01-01"));

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].total_expense, Decimal::from(10));
    assert_eq!(buckets[0].total_income, Decimal::ZERO);
    assert_eq!(
        buckets[0].per_category_expense.get("Food"),
        Some(&Decimal::from(10))
    );
    assert_eq!(buckets[1].total_expense, Decimal::ZERO);
    assert_eq!(buckets[1].total_income, Decimal::from(20));
    assert!(buckets[1].per_category_expense.is_empty());
    assert_eq!(labels(&buckets), vec!["01-01", "01-02"]);
}

#[test]
fn twelve_day_window_has_one_bucket_per_day() {
    let buckets = compute_buckets(&[], &ChartRange::LAST_12_DAYS, d("2024-03-15"));
    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets[0].label, "03-04");
    assert_eq!(buckets[11].label, "03-15");
    for b in &buckets {
        assert_eq!(b.start.date(), b.end.date());
        assert_eq!(b.total_income, Decimal::ZERO);
        assert_eq!(b.total_expense, Decimal::ZERO);
        assert!(b.per_category_expense.is_empty());
    }
}

#[test]
fn custom_bucket_counts_follow_duration() {
    let start = d("2024-01-01");
    let count = |days: i64| {
        let range = ChartRange::custom(start, start + Duration::days(days - 1));
        compute_buckets(&[], &range, start).len()
    };
    assert_eq!(count(1), 1);
    assert_eq!(count(5), 5);
    assert_eq!(count(11), 11);
    assert_eq!(count(12), 6);
    assert_eq!(count(20), 10);
    assert_eq!(count(23), 12);
    assert_eq!(count(24), 12);
    assert_eq!(count(30), 12);
    assert_eq!(count(400), 12);
}

#[test]
fn paired_buckets_end_with_single_day_on_odd_duration() {
    let range = ChartRange::custom(d("2024-01-01"), d("2024-01-13"));
    let buckets = compute_buckets(&[], &range, d("2024-01-01"));
    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets[0].label, "01-01 ~ 01-02");
    assert_eq!(buckets[5].label, "01-11 ~ 01-12");
    assert_eq!(buckets[6].label, "01-13");
}

#[test]
fn fractional_buckets_tile_the_range_without_gaps() {
    let range = ChartRange::custom(d("2024-01-01"), d("2024-01-30"));
    let buckets = compute_buckets(&[], &range, d("2024-01-01"));
    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets[0].label, "01-01 ~ 01-03");
    assert_eq!(buckets[0].start, d("2024-01-01").and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(
        buckets[11].end,
        d("2024-01-30").and_hms_milli_opt(23, 59, 59, 999).unwrap()
    );
    for pair in buckets.windows(2) {
        assert_eq!(pair[1].start - pair[0].end, Duration::milliseconds(1));
    }
}

#[test]
fn reversed_custom_bounds_are_swapped() {
    let forward = compute_buckets(
        &[],
        &ChartRange::custom(d("2024-02-01"), d("2024-02-05")),
        d("2024-02-10"),
    );
    let backward = compute_buckets(
        &[],
        &ChartRange::custom(d("2024-02-05"), d("2024-02-01")),
        d("2024-02-10"),
    );
    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 5);
}

#[test]
fn custom_range_missing_a_bound_is_empty() {
    let txs = vec![tx("2024-01-01", TxType::Expense, "Food", 10)];
    let open_end = ChartRange::Custom {
        start: Some(d("2024-01-01")),
        end: None,
    };
    let open_start = ChartRange::Custom {
        start: None,
        end: Some(d("2024-01-01")),
    };
    assert!(compute_buckets(&txs, &open_end, d("2024-01-05")).is_empty());
    assert!(compute_buckets(&txs, &open_start, d("2024-01-05")).is_empty());
}

#[test]
fn policy_table() {
    let custom = ChartRange::custom(d("2024-01-01"), d("2024-01-01"));
    assert_eq!(select_policy(&custom, 1), BucketPolicy::Daily);
    assert_eq!(select_policy(&custom, 11), BucketPolicy::Daily);
    assert_eq!(select_policy(&custom, 12), BucketPolicy::Paired);
    assert_eq!(select_policy(&custom, 23), BucketPolicy::Paired);
    let dates = BucketPolicy::Even {
        count: 12,
        labels: LabelStyle::Dates,
    };
    assert_eq!(select_policy(&custom, 24), dates);
    assert_eq!(select_policy(&ChartRange::LAST_12_DAYS, 12), dates);
    assert_eq!(select_policy(&ChartRange::LAST_3_MONTHS, 92), dates);
    assert_eq!(
        select_policy(&ChartRange::LAST_YEAR, 366),
        BucketPolicy::Even {
            count: 12,
            labels: LabelStyle::Month,
        }
    );
}

#[test]
fn year_range_uses_month_labels() {
    let buckets = compute_buckets(&[], &ChartRange::LAST_YEAR, d("2024-06-15"));
    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets[0].label, "Jun");
    assert_eq!(buckets[0].start, d("2023-06-15").and_hms_opt(0, 0, 0).unwrap());
    assert!(buckets.iter().all(|b| b.label.len() == 3));
}

#[test]
fn three_month_totals_are_conserved() {
    let today = d("2024-03-31");
    let first = d("2023-12-31");
    let mut txs = Vec::new();
    let mut day = first;
    let mut i = 0;
    while day <= today {
        txs.push(tx(&day.to_string(), TxType::Expense, "Food", 2));
        if i % 3 == 0 {
            txs.push(tx(&day.to_string(), TxType::Income, "Salary", 5));
        }
        day += Duration::days(1);
        i += 1;
    }
    // Outside the window: dropped.
    txs.push(tx("2023-12-30", TxType::Expense, "Food", 1000));
    txs.push(tx("2024-04-01", TxType::Income, "Salary", 1000));

    let buckets = compute_buckets(&txs, &ChartRange::LAST_3_MONTHS, today);
    assert_eq!(buckets.len(), 12);

    let expense: Decimal = buckets.iter().map(|b| b.total_expense).sum();
    let income: Decimal = buckets.iter().map(|b| b.total_income).sum();
    let food: Decimal = buckets
        .iter()
        .filter_map(|b| b.per_category_expense.get("Food"))
        .sum();
    assert_eq!(expense, Decimal::from(92 * 2));
    assert_eq!(income, Decimal::from(31 * 5));
    assert_eq!(food, expense);
}

#[test]
fn income_is_not_broken_down_by_category() {
    let txs = vec![
        tx("2024-03-15", TxType::Income, "Salary", 100),
        tx("2024-03-15", TxType::Expense, "Food", 7),
        tx("2024-03-15", TxType::Expense, "Transport", 3),
    ];
    let buckets = compute_buckets(&txs, &ChartRange::LAST_12_DAYS, d("2024-03-15"));
    let last = buckets.last().unwrap();
    assert_eq!(last.total_income, Decimal::from(100));
    assert_eq!(last.total_expense, Decimal::from(10));
    assert_eq!(last.per_category_expense.len(), 2);
    assert!(!last.per_category_expense.contains_key("Salary"));
}

#[test]
fn cli_custom_range_with_blank_bound_yields_no_buckets() {
    use tallybook::commands::chart::{parse_range, query_buckets};

    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    tallybook::db::init_schema(&mut conn).unwrap();
    let matches = tallybook::cli::build_cli().get_matches_from([
        "tallybook", "chart", "--range", "custom", "--from", "2024-01-01", "--to", "",
    ]);
    let Some(("chart", sub)) = matches.subcommand() else {
        panic!("no chart subcommand");
    };
    assert_eq!(
        parse_range(sub).unwrap(),
        ChartRange::Custom {
            start: Some(d("2024-01-01")),
            end: None,
        }
    );
    assert!(query_buckets(&conn, sub, d("2024-01-10")).unwrap().is_empty());
}

#[test]
fn cli_default_range_is_twelve_days() {
    let matches = tallybook::cli::build_cli().get_matches_from(["tallybook", "chart"]);
    let Some(("chart", sub)) = matches.subcommand() else {
        panic!("no chart subcommand");
    };
    assert_eq!(
        tallybook::commands::chart::parse_range(sub).unwrap(),
        ChartRange::LAST_12_DAYS
    );
}

#[test]
fn transactions_land_in_the_bucket_holding_noon_of_their_date() {
    // 30 days over 12 buckets: bucket 1 starts at 2024-01-03 12:00.
    let range = ChartRange::custom(d("2024-01-01"), d("2024-01-30"));
    let txs = vec![tx("2024-01-03", TxType::Expense, "Food", 7)];
    let buckets = compute_buckets(&txs, &range, d("2024-02-01"));

    assert_eq!(buckets[1].start, d("2024-01-03").and_hms_opt(12, 0, 0).unwrap());
    assert!(buckets[0].contains(d("2024-01-03").and_hms_opt(0, 0, 0).unwrap()));
    assert_eq!(buckets[0].total_expense, Decimal::ZERO);
    assert_eq!(buckets[1].total_expense, Decimal::from(7));
    assert_eq!(buckets[1].per_category_expense.get("Food"), Some(&Decimal::from(7)));
}
