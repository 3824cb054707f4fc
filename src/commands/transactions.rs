// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{StoreError, StoreResult};
use crate::models::{NewTransaction, Transaction, TxType};
use crate::utils::{
    fmt_amount, maybe_print_json, now_millis, optional_string, parse_date, parse_decimal,
    pretty_table, required, required_id,
};
use anyhow::Result;
use rusqlite::{Connection, Row, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = required_id(sub, "id")?;
            delete_transaction(conn, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn input_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    Ok(NewTransaction {
        r#type: required(sub, "type")?.parse()?,
        category: required(sub, "category")?.trim().to_string(),
        subcategory: optional_string(sub, "subcategory"),
        date: parse_date(required(sub, "date")?)?,
        amount: parse_decimal(required(sub, "amount")?)?,
        note: optional_string(sub, "note").unwrap_or_default(),
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let tx = add_transaction(conn, &input_from_args(sub)?)?;
    println!(
        "Recorded {} {} on {} in '{}' (id {})",
        tx.r#type,
        fmt_amount(&tx.amount),
        tx.date,
        tx.category,
        tx.id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = required_id(sub, "id")?;
    let tx = update_transaction(conn, id, &input_from_args(sub)?)?;
    println!(
        "Updated transaction {}: {} {} on {} in '{}'",
        tx.id,
        tx.r#type,
        fmt_amount(&tx.amount),
        tx.date,
        tx.category
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let filter = TransactionFilter {
        year: sub.get_one::<i32>("year").copied(),
        month: sub.get_one::<u32>("month").copied(),
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let data = list_transactions(conn, &filter)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.r#type.to_string(),
                    t.category.clone(),
                    t.subcategory.clone().unwrap_or_default(),
                    fmt_amount(&t.amount),
                    t.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Sub", "Amount", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

/// Narrows a listing to a calendar year, optionally one month of it.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub year: Option<i32>,
    pub month: Option<u32>, // ignored without a year
    pub limit: Option<usize>,
}

const SELECT_COLUMNS: &str =
    "SELECT id, type, category, subcategory, date, amount, note, timestamp FROM transactions";

pub(crate) fn transaction_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let conversion = |idx: usize, e: StoreError| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    };
    let kind: String = r.get(1)?;
    let date: String = r.get(4)?;
    let amount: String = r.get(5)?;
    Ok(Transaction {
        id: r.get(0)?,
        r#type: kind.parse::<TxType>().map_err(|e| conversion(1, e))?,
        category: r.get(2)?,
        subcategory: r.get(3)?,
        date: chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
            conversion(4, StoreError::Invalid(format!("bad date '{}'", date)))
        })?,
        amount: amount.parse().map_err(|_| {
            conversion(5, StoreError::Invalid(format!("bad amount '{}'", amount)))
        })?,
        note: r.get::<_, Option<String>>(6)?.unwrap_or_default(),
        timestamp: r.get(7)?,
    })
}

pub fn list_transactions(
    conn: &Connection,
    filter: &TransactionFilter,
) -> StoreResult<Vec<Transaction>> {
    let mut sql = format!("{} WHERE 1=1", SELECT_COLUMNS);
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(year) = filter.year {
        sql.push_str(" AND strftime('%Y', date)=?");
        params_vec.push(format!("{:04}", year));
        if let Some(month) = filter.month {
            sql.push_str(" AND strftime('%m', date)=?");
            params_vec.push(format!("{:02}", month));
        }
    }
    sql.push_str(" ORDER BY date DESC, timestamp DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), |r| {
        transaction_from_row(r)
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn get_transaction(conn: &Connection, id: i64) -> StoreResult<Transaction> {
    let sql = format!("{} WHERE id=?1", SELECT_COLUMNS);
    conn.query_row(&sql, params![id], transaction_from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                StoreError::NotFound(format!("transaction {}", id))
            }
            e => e.into(),
        })
}

fn validate(input: &NewTransaction) -> StoreResult<()> {
    if input.category.is_empty() {
        return Err(StoreError::Invalid("Transaction category must not be empty".into()));
    }
    Ok(())
}

pub fn add_transaction(conn: &Connection, input: &NewTransaction) -> StoreResult<Transaction> {
    validate(input)?;
    let amount = input.amount.abs();
    let timestamp = now_millis();
    conn.execute(
        "INSERT INTO transactions(type, category, subcategory, date, amount, note, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            input.r#type.as_str(),
            input.category,
            input.subcategory,
            input.date.to_string(),
            amount.to_string(),
            input.note,
            timestamp
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, kind = %input.r#type, %amount, "transaction recorded");
    Ok(Transaction {
        id,
        r#type: input.r#type,
        category: input.category.clone(),
        subcategory: input.subcategory.clone(),
        date: input.date,
        amount,
        note: input.note.clone(),
        timestamp,
    })
}

/// Replaces every field of transaction `id` and refreshes its timestamp.
pub fn update_transaction(
    conn: &Connection,
    id: i64,
    input: &NewTransaction,
) -> StoreResult<Transaction> {
    validate(input)?;
    let amount = input.amount.abs();
    let timestamp = now_millis();
    let n = conn.execute(
        "UPDATE transactions
         SET type=?1, category=?2, subcategory=?3, date=?4, amount=?5, note=?6, timestamp=?7
         WHERE id=?8",
        params![
            input.r#type.as_str(),
            input.category,
            input.subcategory,
            input.date.to_string(),
            amount.to_string(),
            input.note,
            timestamp,
            id
        ],
    )?;
    if n == 0 {
        return Err(StoreError::NotFound(format!("transaction {}", id)));
    }
    Ok(Transaction {
        id,
        r#type: input.r#type,
        category: input.category.clone(),
        subcategory: input.subcategory.clone(),
        date: input.date,
        amount,
        note: input.note.clone(),
        timestamp,
    })
}

pub fn delete_transaction(conn: &Connection, id: i64) -> StoreResult<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(StoreError::NotFound(format!("transaction {}", id)));
    }
    Ok(())
}
