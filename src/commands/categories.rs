// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::color::assign_color;
use crate::error::{StoreError, StoreResult, is_unique_violation};
use crate::models::{Category, TxType};
use crate::utils::{maybe_print_json, pretty_table, required, required_id};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?.trim();
            let kind: TxType = required(sub, "type")?.parse()?;
            let cat = add_category(conn, name, kind)?;
            println!("Added {} category '{}' ({})", cat.r#type, cat.name, cat.color);
        }
        Some(("list", sub)) => {
            let kind = match sub.get_one::<String>("type") {
                Some(t) => Some(t.parse::<TxType>()?),
                None => None,
            };
            let data: Vec<Category> = list_categories(conn)?
                .into_iter()
                .filter(|c| kind.is_none_or(|k| c.r#type == k))
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            c.r#type.to_string(),
                            c.color.clone(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Name", "Type", "Color"], rows));
            }
        }
        Some(("rename", sub)) => {
            let id = required_id(sub, "id")?;
            let name = required(sub, "name")?.trim();
            rename_category(conn, id, name)?;
            println!("Renamed category {} to '{}'", id, name);
        }
        Some(("rm", sub)) => {
            let id = required_id(sub, "id")?;
            delete_category(conn, id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    let kind: String = r.get(2)?;
    let kind = kind.parse::<TxType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        r#type: kind,
        color: r.get(3)?,
    })
}

pub fn list_categories(conn: &Connection) -> StoreResult<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, type, color FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], category_from_row)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

/// Colors already taken by categories of `kind`.
pub fn colors_for_type(conn: &Connection, kind: TxType) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT color FROM categories WHERE type=?1")?;
    let rows = stmt.query_map(params![kind.as_str()], |r| r.get::<_, String>(0))?;
    let mut colors = Vec::new();
    for row in rows {
        colors.push(row?);
    }
    Ok(colors)
}

pub fn add_category(conn: &Connection, name: &str, kind: TxType) -> StoreResult<Category> {
    if name.is_empty() {
        return Err(StoreError::Invalid("Category name must not be empty".into()));
    }
    let existing = colors_for_type(conn, kind)?;
    let color = assign_color(kind, existing.as_slice());
    match conn.execute(
        "INSERT INTO categories(name, type, color) VALUES (?1, ?2, ?3)",
        params![name, kind.as_str(), color],
    ) {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(StoreError::DuplicateCategory {
                name: name.to_string(),
                kind,
            });
        }
        Err(e) => return Err(e.into()),
    }
    let id = conn.last_insert_rowid();
    tracing::info!(id, name, %kind, %color, "category created");
    Ok(Category {
        id,
        name: name.to_string(),
        r#type: kind,
        color,
    })
}

/// Renames a category. Transactions keep the name they were recorded with.
pub fn rename_category(conn: &Connection, id: i64, name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::Invalid("Category name must not be empty".into()));
    }
    let kind: Option<String> = conn
        .query_row("SELECT type FROM categories WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    let Some(kind) = kind else {
        return Err(StoreError::NotFound(format!("category {}", id)));
    };
    match conn.execute(
        "UPDATE categories SET name=?1 WHERE id=?2",
        params![name, id],
    ) {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateCategory {
            name: name.to_string(),
            kind: kind.parse()?,
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_category(conn: &Connection, id: i64) -> StoreResult<()> {
    let n = conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(StoreError::NotFound(format!("category {}", id)));
    }
    tracing::info!(id, "category deleted");
    Ok(())
}
