// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TxType};

pub const EVEN_BUCKETS: usize = 12;
const DAILY_LIMIT: i64 = 12;
const PAIRED_LIMIT: i64 = 24;
const DAY_MS: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRange {
    Days(u32),
    Months(u32),
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl ChartRange {
    pub const LAST_12_DAYS: ChartRange = ChartRange::Days(12);
    pub const LAST_3_MONTHS: ChartRange = ChartRange::Months(3);
    pub const LAST_YEAR: ChartRange = ChartRange::Months(12);

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        ChartRange::Custom {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Resolves the range to `[start 00:00, end 23:59:59.999]`.
    pub fn resolve(&self, today: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (first, last) = match *self {
            ChartRange::Days(n) => {
                let back = i64::from(n.max(1) - 1);
                (today - Duration::days(back), today)
            }
            ChartRange::Months(n) => (today.checked_sub_months(Months::new(n))?, today),
            ChartRange::Custom { start, end } => {
                let (a, b) = (start?, end?);
                if b < a { (b, a) } else { (a, b) }
            }
        };
        Some((midnight(first)?, end_of_day(last)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Abbreviated month name of the bucket start (`Jan`).
    Month,
    /// `MM-dd`, or `MM-dd ~ MM-dd` when the bucket spans several days.
    Dates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketPolicy {
    Daily,
    Paired,
    Even { count: usize, labels: LabelStyle },
}

pub fn select_policy(range: &ChartRange, duration_days: i64) -> BucketPolicy {
    match range {
        ChartRange::Custom { .. } if duration_days < DAILY_LIMIT => BucketPolicy::Daily,
        ChartRange::Custom { .. } if duration_days < PAIRED_LIMIT => BucketPolicy::Paired,
        ChartRange::Months(n) if *n >= 12 => BucketPolicy::Even {
            count: EVEN_BUCKETS,
            labels: LabelStyle::Month,
        },
        _ => BucketPolicy::Even {
            count: EVEN_BUCKETS,
            labels: LabelStyle::Dates,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime, // inclusive
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub per_category_expense: BTreeMap<String, Decimal>,
}

impl Bucket {
    fn new(label: String, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            label,
            start,
            end,
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            per_category_expense: BTreeMap::new(),
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

pub fn compute_buckets(
    transactions: &[Transaction],
    range: &ChartRange,
    today: NaiveDate,
) -> Vec<Bucket> {
    let Some((start, end)) = range.resolve(today) else {
        return Vec::new();
    };
    let duration_days = (end.date() - start.date()).num_days() + 1;
    let policy = select_policy(range, duration_days);
    let mut buckets = build_buckets(policy, start, end, duration_days);

    for t in transactions {
        let Some(center) = t.date.and_hms_opt(12, 0, 0) else {
            continue;
        };
        if center < start || center > end {
            continue;
        }
        let Some(bucket) = buckets.iter_mut().find(|b| b.contains(center)) else {
            continue;
        };
        match t.r#type {
            TxType::Income => bucket.total_income += t.amount,
            TxType::Expense => {
                bucket.total_expense += t.amount;
                *bucket
                    .per_category_expense
                    .entry(t.category.clone())
                    .or_insert(Decimal::ZERO) += t.amount;
            }
        }
    }
    tracing::debug!(
        ?policy,
        buckets = buckets.len(),
        transactions = transactions.len(),
        "computed chart buckets"
    );
    buckets
}

fn build_buckets(
    policy: BucketPolicy,
    start: NaiveDateTime,
    end: NaiveDateTime,
    duration_days: i64,
) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    match policy {
        BucketPolicy::Daily => {
            for i in 0..duration_days {
                let day = start.date() + Duration::days(i);
                if let (Some(s), Some(e)) = (midnight(day), end_of_day(day)) {
                    buckets.push(Bucket::new(date_label(s, e), s, e));
                }
            }
        }
        BucketPolicy::Paired => {
            let last = end.date();
            let mut current = start.date();
            while current <= last {
                let next = current + Duration::days(1);
                let bucket_end = if next <= last { next } else { current };
                if let (Some(s), Some(e)) = (midnight(current), end_of_day(bucket_end)) {
                    buckets.push(Bucket::new(date_label(s, e), s, e));
                }
                current += Duration::days(2);
            }
        }
        BucketPolicy::Even { count, labels } => {
            let width_ms = duration_days as f64 * DAY_MS / count as f64;
            for i in 0..count {
                let s = start + Duration::milliseconds((i as f64 * width_ms).trunc() as i64);
                let e = start
                    + Duration::milliseconds(((i + 1) as f64 * width_ms - 1.0).trunc() as i64);
                let label = match labels {
                    LabelStyle::Month => s.format("%b").to_string(),
                    LabelStyle::Dates => date_label(s, e),
                };
                buckets.push(Bucket::new(label, s, e));
            }
        }
    }
    buckets
}

fn date_label(start: NaiveDateTime, end: NaiveDateTime) -> String {
    if start.date() == end.date() {
        start.format("%m-%d").to_string()
    } else {
        format!("{} ~ {}", start.format("%m-%d"), end.format("%m-%d"))
    }
}

fn midnight(day: NaiveDate) -> Option<NaiveDateTime> {
    day.and_hms_opt(0, 0, 0)
}

fn end_of_day(day: NaiveDate) -> Option<NaiveDateTime> {
    day.and_hms_milli_opt(23, 59, 59, 999)
}
