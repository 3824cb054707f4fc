// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::StoreResult;
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::Result;
use rusqlite::{Connection, params};

pub const MAX_HINTS: usize = 5;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let category = required(sub, "category")?.trim();
            let hints = subcategory_hints(conn, category)?;
            if !maybe_print_json(sub.get_flag("json"), false, &hints)? {
                let rows = hints.into_iter().map(|h| vec![h]).collect();
                println!("{}", pretty_table(&["Subcategory"], rows));
            }
        }
        Some(("hide", sub)) => {
            let category = required(sub, "category")?.trim();
            let subcategory = required(sub, "subcategory")?.trim();
            hide_hint(conn, category, subcategory)?;
            println!("Hid hint '{}' for '{}'", subcategory, category);
        }
        _ => {}
    }
    Ok(())
}

/// Previously used subcategories for `category`, minus hidden ones.
pub fn subcategory_hints(conn: &Connection, category: &str) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT subcategory FROM transactions
         WHERE category=?1 AND subcategory IS NOT NULL AND subcategory != ''
           AND subcategory NOT IN (
             SELECT subcategory FROM subcategory_blacklist WHERE category=?1
           )
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![category, MAX_HINTS as i64], |r| {
        r.get::<_, String>(0)
    })?;
    let mut hints = Vec::new();
    for row in rows {
        hints.push(row?);
    }
    Ok(hints)
}

pub fn hide_hint(conn: &Connection, category: &str, subcategory: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO subcategory_blacklist(category, subcategory) VALUES (?1, ?2)",
        params![category, subcategory],
    )?;
    Ok(())
}
