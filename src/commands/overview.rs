// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{TransactionFilter, list_transactions};
use crate::config::Settings;
use crate::summary::monthly_overview;
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, settings: &Settings) -> Result<()> {
    let filter = TransactionFilter {
        year: m.get_one::<i32>("year").copied(),
        ..Default::default()
    };
    let transactions = list_transactions(conn, &filter)?;
    let years = monthly_overview(&transactions, settings.language);
    if maybe_print_json(m.get_flag("json"), false, &years)? {
        return Ok(());
    }

    let mut rows = Vec::new();
    for y in &years {
        rows.push(vec![
            y.year.to_string(),
            fmt_amount(&y.income),
            fmt_amount(&y.expense),
            String::new(),
        ]);
        for mo in &y.months {
            let top = mo
                .expense_by_category
                .iter()
                .map(|s| format!("{} {}%", s.category, s.percentage))
                .collect::<Vec<_>>()
                .join(", ");
            rows.push(vec![
                format!("  {}", mo.label),
                fmt_amount(&mo.income),
                fmt_amount(&mo.expense),
                top,
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Period", "Income", "Expense", "Expense share"], rows)
    );
    Ok(())
}
