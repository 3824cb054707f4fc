// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use std::fs;

use crate::color::assign_color;
use crate::config::Config;
use crate::models::TxType;

const DEFAULT_CATEGORIES: &[(&str, TxType)] = &[
    ("Food", TxType::Expense),
    ("Transport", TxType::Expense),
    ("Shopping", TxType::Expense),
    ("Salary", TxType::Income),
    ("Bonus", TxType::Income),
];

pub fn open_or_init(config: &Config) -> Result<Connection> {
    let path = &config.db_path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create data dir {}", parent.display()))?;
    }
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

/// Creates missing tables and seeds the default categories into an empty store.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('expense','income')),
        color TEXT NOT NULL,
        UNIQUE(name, type)
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL CHECK(type IN ('expense','income')),
        category TEXT NOT NULL, -- name, survives category renames/deletes
        subcategory TEXT,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        note TEXT,
        timestamp INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS subcategory_blacklist(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        subcategory TEXT NOT NULL,
        UNIQUE(category, subcategory)
    );
    "#,
    )?;
    seed_default_categories(conn)?;
    Ok(())
}

fn seed_default_categories(conn: &mut Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(());
    }
    let tx = conn.transaction()?;
    let mut expense_colors: Vec<String> = Vec::new();
    let mut income_colors: Vec<String> = Vec::new();
    for (name, kind) in DEFAULT_CATEGORIES {
        let used = match kind {
            TxType::Expense => &mut expense_colors,
            TxType::Income => &mut income_colors,
        };
        let color = assign_color(*kind, used.as_slice());
        tx.execute(
            "INSERT INTO categories(name, type, color) VALUES (?1, ?2, ?3)",
            params![name, kind.as_str(), color],
        )?;
        used.push(color);
    }
    tx.commit()?;
    tracing::info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    Ok(())
}
