// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::json;
use tallybook::commands::exporter::{
    self, backup_file_name, export_data, export_transactions, write_backup,
};
use tallybook::commands::transactions::add_transaction;
use tallybook::config::Settings;
use tallybook::models::{NewTransaction, TxType};
use tallybook::{cli, db};
use tempfile::tempdir;

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    add_transaction(
        &conn,
        &NewTransaction {
            r#type: TxType::Expense,
            category: "Food".into(),
            subcategory: Some("Groceries".into()),
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            amount: "12.34".parse().unwrap(),
            note: "Weekly run".into(),
        },
    )
    .unwrap();
    conn
}

#[test]
fn backup_file_name_is_dated() {
    let day = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
    assert_eq!(backup_file_name(day), "account_backup_2025_03_07.json");
}

#[test]
fn backup_contains_transactions_and_categories() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("backup.json");
    let day = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
    let written = write_backup(&conn, Some(out.as_path()), day).unwrap();
    assert_eq!(written, out);

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed["categories"].as_array().unwrap().len(), 5);
    assert_eq!(parsed["categories"][0]["name"], json!("Food"));
    assert_eq!(parsed["categories"][0]["type"], json!("expense"));
    let tx = &parsed["transactions"][0];
    assert_eq!(tx["type"], json!("expense"));
    assert_eq!(tx["category"], json!("Food"));
    assert_eq!(tx["subcategory"], json!("Groceries"));
    assert_eq!(tx["date"], json!("2025-01-02"));
    assert_eq!(tx["amount"], json!("12.34"));
    assert_eq!(tx["note"], json!("Weekly run"));

    assert_eq!(export_data(&conn).unwrap().transactions.len(), 1);
}

#[test]
fn cli_backup_marks_reminder_month() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("b.json");
    let out_str = out.to_string_lossy().to_string();
    let mut settings = Settings::load(&conn).unwrap();
    assert!(settings.last_backup_month.is_none());

    let matches =
        cli::build_cli().get_matches_from(["tallybook", "export", "backup", "--out", &out_str]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m, &mut settings).unwrap();
    } else {
        panic!("no export subcommand");
    }
    assert!(out.exists());
    assert!(settings.last_backup_month.is_some());
    assert_eq!(Settings::load(&conn).unwrap(), settings);
}

#[test]
fn transactions_export_as_csv() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    export_transactions(&conn, "csv", &out).unwrap();
    let contents = std::fs::read_to_string(&out).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("date,type,category,subcategory,amount,note"));
    assert_eq!(
        lines.next(),
        Some("2025-01-02,expense,Food,Groceries,12.34,Weekly run")
    );
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.unknown");
    assert!(export_transactions(&conn, "xml", &out).is_err());
    assert!(!out.exists());
}
