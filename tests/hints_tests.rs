// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use tallybook::commands::hints::{MAX_HINTS, hide_hint, subcategory_hints};
use tallybook::commands::transactions::add_transaction;
use tallybook::db;
use tallybook::models::{NewTransaction, TxType};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn record(conn: &Connection, category: &str, sub: Option<&str>) {
    add_transaction(
        conn,
        &NewTransaction {
            r#type: TxType::Expense,
            category: category.into(),
            subcategory: sub.map(str::to_string),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            amount: "1".parse().unwrap(),
            note: String::new(),
        },
    )
    .unwrap();
}

#[test]
fn hints_are_distinct_non_empty_and_per_category() {
    let conn = setup();
    record(&conn, "Food", Some("Lunch"));
    record(&conn, "Food", Some("Lunch"));
    record(&conn, "Food", Some(""));
    record(&conn, "Food", None);
    record(&conn, "Transport", Some("Taxi"));

    assert_eq!(subcategory_hints(&conn, "Food").unwrap(), vec!["Lunch"]);
    assert_eq!(subcategory_hints(&conn, "Transport").unwrap(), vec!["Taxi"]);
    assert!(subcategory_hints(&conn, "Shopping").unwrap().is_empty());
}

#[test]
fn hidden_hints_are_excluded_and_hiding_twice_is_fine() {
    let conn = setup();
    record(&conn, "Food", Some("Lunch"));
    record(&conn, "Food", Some("Dinner"));
    hide_hint(&conn, "Food", "Lunch").unwrap();
    hide_hint(&conn, "Food", "Lunch").unwrap();
    assert_eq!(subcategory_hints(&conn, "Food").unwrap(), vec!["Dinner"]);

    // Hidden only for that category.
    record(&conn, "Shopping", Some("Lunch"));
    assert_eq!(subcategory_hints(&conn, "Shopping").unwrap(), vec!["Lunch"]);
}

#[test]
fn hints_are_capped() {
    let conn = setup();
    for i in 0..8 {
        record(&conn, "Food", Some(&format!("Sub{}", i)));
    }
    assert_eq!(subcategory_hints(&conn, "Food").unwrap().len(), MAX_HINTS);
}
