// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use crate::error::StoreResult;
use crate::models::Backup;
use crate::utils::required;
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("backup", sub)) => {
            let path = required(sub, "path")?.trim();
            let backup = read_backup(Path::new(path))
                .with_context(|| format!("Read backup {}", path))?;
            let report = import_data(conn, &backup)?;
            println!(
                "Imported {} transactions and {} new categories from {}",
                report.transactions, report.categories, path
            );
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub transactions: usize,
    /// Categories actually inserted; existing `(name, type)` pairs are skipped.
    pub categories: usize,
}

pub fn read_backup(path: &Path) -> StoreResult<Backup> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Merges a backup into the store in a single SQLite transaction.
///
/// Transactions always get fresh ids.
pub fn import_data(conn: &mut Connection, backup: &Backup) -> StoreResult<ImportReport> {
    let tx = conn.transaction()?;
    let mut report = ImportReport::default();
    {
        let mut insert_cat = tx.prepare(
            "INSERT OR IGNORE INTO categories(name, type, color) VALUES (?1, ?2, ?3)",
        )?;
        for c in &backup.categories {
            report.categories += insert_cat.execute(params![c.name, c.r#type.as_str(), c.color])?;
        }

        let mut insert_tx = tx.prepare(
            "INSERT INTO transactions(type, category, subcategory, date, amount, note, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for t in &backup.transactions {
            insert_tx.execute(params![
                t.r#type.as_str(),
                t.category,
                t.subcategory,
                t.date.to_string(),
                t.amount.abs().to_string(),
                t.note,
                t.timestamp
            ])?;
            report.transactions += 1;
        }
    }
    tx.commit()?;
    tracing::info!(
        transactions = report.transactions,
        categories = report.categories,
        "backup imported"
    );
    Ok(report)
}
