// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::config::Language;
use crate::models::{Transaction, TxType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// Whole percent of the month's total for this type.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: u32,
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub expense_by_category: Vec<CategoryShare>,
    pub income_by_category: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub income: Decimal,
    pub expense: Decimal,
    pub months: Vec<MonthSummary>,
}

pub fn month_label(year: i32, month: u32, language: Language) -> String {
    match language {
        Language::Zh => format!("{}月", month),
        Language::En => NaiveDate::from_ymd_opt(year, month, 1)
            .map(|d| d.format("%b").to_string())
            .unwrap_or_else(|| month.to_string()),
    }
}

/// Newest year first, newest month first within a year.
pub fn monthly_overview(transactions: &[Transaction], language: Language) -> Vec<YearSummary> {
    let mut grouped: BTreeMap<i32, BTreeMap<u32, Vec<&Transaction>>> = BTreeMap::new();
    for t in transactions {
        grouped
            .entry(t.date.year())
            .or_default()
            .entry(t.date.month())
            .or_default()
            .push(t);
    }

    grouped
        .into_iter()
        .rev()
        .map(|(year, months)| {
            let months: Vec<MonthSummary> = months
                .into_iter()
                .rev()
                .map(|(month, txs)| summarize_month(year, month, &txs, language))
                .collect();
            YearSummary {
                year,
                income: months.iter().map(|m| m.income).sum(),
                expense: months.iter().map(|m| m.expense).sum(),
                months,
            }
        })
        .collect()
}

fn summarize_month(
    year: i32,
    month: u32,
    txs: &[&Transaction],
    language: Language,
) -> MonthSummary {
    let total = |kind: TxType| -> Decimal {
        txs.iter()
            .filter(|t| t.r#type == kind)
            .map(|t| t.amount)
            .sum()
    };
    let income = total(TxType::Income);
    let expense = total(TxType::Expense);
    MonthSummary {
        month,
        label: month_label(year, month, language),
        income,
        expense,
        expense_by_category: shares(txs, TxType::Expense, expense),
        income_by_category: shares(txs, TxType::Income, income),
    }
}

fn shares(txs: &[&Transaction], kind: TxType, total: Decimal) -> Vec<CategoryShare> {
    let mut by_cat: HashMap<&str, Decimal> = HashMap::new();
    for t in txs.iter().filter(|t| t.r#type == kind) {
        *by_cat.entry(t.category.as_str()).or_insert(Decimal::ZERO) += t.amount;
    }
    let mut items: Vec<CategoryShare> = by_cat
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            amount,
            percentage: if total > Decimal::ZERO {
                (amount / total * Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            } else {
                Decimal::ZERO
            },
        })
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    items
}
