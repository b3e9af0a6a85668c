// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::alerts::AlertQueue;
use crate::db;
use crate::models::{
    AppState, ExpenseCategory, IncomeCategory, TxType, PRESET_EXPENSE_CATEGORIES,
    PRESET_INCOME_CATEGORIES,
};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use crate::validation::validate_category;
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind: TxType = sub.get_one::<String>("kind").unwrap().parse()?;
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let budget = parse_decimal(sub.get_one::<String>("budget").unwrap())?;
            validate_category(&name, budget).into_result()?;
            if state.has_category(kind, &name) {
                return Err(anyhow!("{} category '{}' already exists", kind, name));
            }
            match kind {
                TxType::Expense => state
                    .expense_categories
                    .push(ExpenseCategory::new(name.clone(), budget)),
                TxType::Income => state
                    .income_categories
                    .push(IncomeCategory::new(name.clone(), budget)),
            }
            state.refresh();
            db::save_state(conn, &state)?;
            alerts.success(format!("Added {} category '{}'", kind, name));
        }
        Some(("budget", sub)) => {
            let kind: TxType = sub.get_one::<String>("kind").unwrap().parse()?;
            let name = sub.get_one::<String>("name").unwrap().trim();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            validate_category(name, amount).into_result()?;
            let slot = match kind {
                TxType::Expense => state
                    .expense_categories
                    .iter_mut()
                    .find(|c| c.name == name)
                    .map(|c| &mut c.budgeted),
                TxType::Income => state
                    .income_categories
                    .iter_mut()
                    .find(|c| c.name == name)
                    .map(|c| &mut c.budgeted),
            };
            *slot.ok_or_else(|| anyhow!("{} category '{}' not found", kind, name))? = amount;
            db::save_state(conn, &state)?;
            alerts.success(format!("Budget set for {} = {}", name, fmt_money(&amount)));
        }
        Some(("rm", sub)) => {
            let kind: TxType = sub.get_one::<String>("kind").unwrap().parse()?;
            let name = sub.get_one::<String>("name").unwrap().trim();
            let removed = match kind {
                TxType::Expense => {
                    let before = state.expense_categories.len();
                    state.expense_categories.retain(|c| c.name != name);
                    before != state.expense_categories.len()
                }
                TxType::Income => {
                    let before = state.income_categories.len();
                    state.income_categories.retain(|c| c.name != name);
                    before != state.income_categories.len()
                }
            };
            if !removed {
                return Err(anyhow!("{} category '{}' not found", kind, name));
            }
            db::save_state(conn, &state)?;
            alerts.success(format!("Removed {} category '{}'", kind, name));
        }
        Some(("list", sub)) => {
            let only = sub
                .get_one::<String>("kind")
                .map(|k| k.parse::<TxType>())
                .transpose()?;
            let rows = category_rows(&state, only);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.kind.to_string(),
                            r.name.clone(),
                            fmt_money(&r.budgeted),
                            fmt_money(&r.total),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Kind", "Category", "Budgeted", "Spent/Actual"], data)
                );
            }
        }
        Some(("presets", sub)) => {
            let only = sub
                .get_one::<String>("kind")
                .map(|k| k.parse::<TxType>())
                .transpose()?;
            let rows = preset_suggestions(&state, only);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|r| vec![r.kind.to_string(), r.name.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Kind", "Category"], data));
            }
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, PartialEq, Serialize)]
pub struct PresetRow {
    pub kind: TxType,
    pub name: &'static str,
}

/// Preset category names that are not in the state yet, expense first.
pub fn preset_suggestions(state: &AppState, only: Option<TxType>) -> Vec<PresetRow> {
    let expense = PRESET_EXPENSE_CATEGORIES.into_iter().map(|name| PresetRow {
        kind: TxType::Expense,
        name,
    });
    let income = PRESET_INCOME_CATEGORIES.into_iter().map(|name| PresetRow {
        kind: TxType::Income,
        name,
    });
    expense
        .chain(income)
        .filter(|r| only.is_none_or(|k| r.kind == k))
        .filter(|r| !state.has_category(r.kind, r.name))
        .collect()
}

#[derive(Serialize)]
pub struct CategoryRow {
    pub kind: TxType,
    pub name: String,
    pub budgeted: rust_decimal::Decimal,
    pub total: rust_decimal::Decimal,
}

pub fn category_rows(state: &AppState, only: Option<TxType>) -> Vec<CategoryRow> {
    let expense = state.expense_categories.iter().map(|c| CategoryRow {
        kind: TxType::Expense,
        name: c.name.clone(),
        budgeted: c.budgeted,
        total: c.spent,
    });
    let income = state.income_categories.iter().map(|c| CategoryRow {
        kind: TxType::Income,
        name: c.name.clone(),
        budgeted: c.budgeted,
        total: c.actual,
    });
    expense
        .chain(income)
        .filter(|r| only.is_none_or(|k| r.kind == k))
        .collect()
}
