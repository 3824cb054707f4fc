// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Expense,
    Income,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Expense => "expense",
            TxType::Income => "income",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" | "out" => Ok(TxType::Expense),
            "income" | "in" => Ok(TxType::Income),
            other => Err(StoreError::Invalid(format!(
                "Unknown transaction type '{}' (use expense|income)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub r#type: TxType,
    pub color: String, // #rrggbb
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: i64,
    pub r#type: TxType,
    pub category: String, // category name, not an id
    #[serde(default)]
    pub subcategory: Option<String>,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub timestamp: i64, // unix millis
}

/// Fields a caller supplies when recording or editing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub r#type: TxType,
    pub category: String,
    pub subcategory: Option<String>,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub note: String,
}

/// Export/import payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
}
