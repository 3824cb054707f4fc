// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::chart::{Bucket, ChartRange, compute_buckets};
use crate::commands::transactions::{TransactionFilter, list_transactions};
use crate::utils::{fmt_amount, maybe_print_json, parse_optional_date, pretty_table, today};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let buckets = query_buckets(conn, m, today())?;
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &buckets)? {
        if buckets.is_empty() {
            println!("No buckets: a custom range needs both --from and --to");
            return Ok(());
        }
        println!(
            "{}",
            pretty_table(&["Period", "Income", "Expense", "By category"], rows(&buckets))
        );
    }
    Ok(())
}

pub fn parse_range(m: &clap::ArgMatches) -> Result<ChartRange> {
    let kind = m
        .get_one::<String>("range")
        .map(|s| s.as_str())
        .unwrap_or("12d");
    match kind {
        "12d" => Ok(ChartRange::LAST_12_DAYS),
        "3m" => Ok(ChartRange::LAST_3_MONTHS),
        "1y" => Ok(ChartRange::LAST_YEAR),
        "custom" => Ok(ChartRange::Custom {
            start: parse_optional_date(m.get_one::<String>("from"))?,
            end: parse_optional_date(m.get_one::<String>("to"))?,
        }),
        other => Err(anyhow!("Unknown range '{}' (use 12d|3m|1y|custom)", other)),
    }
}

pub fn query_buckets(
    conn: &Connection,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<Bucket>> {
    let range = parse_range(m)?;
    let transactions = list_transactions(conn, &TransactionFilter::default())?;
    Ok(compute_buckets(&transactions, &range, today))
}

fn rows(buckets: &[Bucket]) -> Vec<Vec<String>> {
    buckets
        .iter()
        .map(|b| {
            let breakdown = b
                .per_category_expense
                .iter()
                .map(|(cat, amt)| format!("{} {}", cat, fmt_amount(amt)))
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                b.label.clone(),
                fmt_amount(&b.total_income),
                fmt_amount(&b.total_expense),
                breakdown,
            ]
        })
        .collect()
}
