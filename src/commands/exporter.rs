// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

use crate::commands::categories::list_categories;
use crate::commands::transactions::transaction_from_row;
use crate::config::Settings;
use crate::error::{StoreError, StoreResult};
use crate::models::{Backup, Transaction};
use crate::utils::{fmt_amount, optional_string, required, today};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, settings: &mut Settings) -> Result<()> {
    match m.subcommand() {
        Some(("backup", sub)) => {
            let out = optional_string(sub, "out").map(PathBuf::from);
            let today = today();
            let path = write_backup(conn, out.as_deref(), today)?;
            settings.mark_backup(conn, today)?;
            println!("Backup written to {}", path.display());
        }
        Some(("transactions", sub)) => {
            let fmt = required(sub, "format")?.to_lowercase();
            let out = required(sub, "out")?;
            export_transactions(conn, &fmt, Path::new(out))?;
            println!("Exported transactions to {}", out);
        }
        _ => {}
    }
    Ok(())
}

fn all_transactions(conn: &Connection) -> StoreResult<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, type, category, subcategory, date, amount, note, timestamp
         FROM transactions ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], transaction_from_row)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn export_data(conn: &Connection) -> StoreResult<Backup> {
    Ok(Backup {
        transactions: all_transactions(conn)?,
        categories: list_categories(conn)?,
    })
}

pub fn backup_file_name(today: NaiveDate) -> String {
    format!("account_backup_{}.json", today.format("%Y_%m_%d"))
}

/// Writes the full backup as pretty JSON to `out`, or to the dated default
/// file name in the working directory.
pub fn write_backup(conn: &Connection, out: Option<&Path>, today: NaiveDate) -> StoreResult<PathBuf> {
    let path = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(backup_file_name(today)));
    let backup = export_data(conn)?;
    std::fs::write(&path, serde_json::to_string_pretty(&backup)?)?;
    tracing::info!(
        path = %path.display(),
        transactions = backup.transactions.len(),
        categories = backup.categories.len(),
        "backup written"
    );
    Ok(path)
}

pub fn export_transactions(conn: &Connection, fmt: &str, out: &Path) -> StoreResult<()> {
    // Reject before touching the file system.
    if fmt != "csv" && fmt != "json" {
        return Err(StoreError::Invalid(format!(
            "Unknown format: {} (use csv|json)",
            fmt
        )));
    }
    let transactions = all_transactions(conn)?;
    if fmt == "json" {
        std::fs::write(out, serde_json::to_string_pretty(&transactions)?)?;
        return Ok(());
    }
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record([
        "date",
        "type",
        "category",
        "subcategory",
        "amount",
        "note",
    ])?;
    for t in &transactions {
        wtr.write_record([
            t.date.to_string(),
            t.r#type.to_string(),
            t.category.clone(),
            t.subcategory.clone().unwrap_or_default(),
            fmt_amount(&t.amount),
            t.note.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
