// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::alerts::AlertQueue;
use crate::db;
use crate::models::{coerce_amount, AppState, Transaction, TxType};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, selected_year, today};
use crate::validation::{validate_amount_text, validate_transaction};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub, alerts)?,
        Some(("edit", sub)) => edit(conn, sub, alerts)?,
        Some(("rm", sub)) => remove(conn, sub, alerts)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn amount_arg(raw: &str) -> Result<rust_decimal::Decimal> {
    let errs = validate_amount_text(raw);
    if !errs.is_empty() {
        return Err(anyhow!("Invalid amount '{}': {}", raw, errs.join(", ")));
    }
    Ok(coerce_amount(raw))
}

fn ensure_category(state: &AppState, kind: TxType, category: &str) -> Result<()> {
    if state.has_category(kind, category) {
        Ok(())
    } else {
        Err(anyhow!("{} category '{}' not found", kind, category))
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let kind: TxType = sub.get_one::<String>("type").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let amount = amount_arg(sub.get_one::<String>("amount").unwrap())?;
    let description = sub
        .get_one::<String>("description")
        .unwrap()
        .trim()
        .to_string();
    ensure_category(&state, kind, &category)?;

    let tx = Transaction {
        id: state.next_transaction_id()?,
        date,
        r#type: kind,
        category,
        amount,
        description,
        recurring: false,
        recurring_id: None,
    };
    validate_transaction(&tx, today()).into_result()?;
    info!(id = tx.id, %date, "transaction added");
    alerts.success(format!(
        "Recorded {} {} on {} ({})",
        tx.r#type,
        fmt_money(&tx.amount),
        tx.date,
        tx.category
    ));
    state.transactions.push(tx);
    state.refresh();
    db::save_state(conn, &state)?;
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let pos = state
        .transactions
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| anyhow!("Transaction {} not found", id))?;

    let mut updated = state.transactions[pos].clone();
    if let Some(d) = sub.get_one::<String>("date") {
        updated.date = parse_date(d)?;
    }
    if let Some(t) = sub.get_one::<String>("type") {
        updated.r#type = t.parse()?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        updated.category = c.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        updated.amount = amount_arg(a)?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        updated.description = d.trim().to_string();
    }
    ensure_category(&state, updated.r#type, &updated.category)?;
    validate_transaction(&updated, today()).into_result()?;

    state.transactions[pos] = updated;
    state.refresh();
    db::save_state(conn, &state)?;
    alerts.success(format!("Updated transaction {}", id));
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let before = state.transactions.len();
    state.transactions.retain(|t| t.id != id);
    if state.transactions.len() == before {
        return Err(anyhow!("Transaction {} not found", id));
    }
    state.refresh();
    db::save_state(conn, &state)?;
    alerts.success(format!("Removed transaction {}", id));
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                    if r.recurring { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Amount", "Description", "Recurring"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub recurring: bool,
}

/// Transactions of the selected year, newest first, after filters and limit.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let state = db::load_state(conn)?;
    let year = selected_year(sub, &state)?;
    let kind = sub
        .get_one::<String>("type")
        .map(|t| t.parse::<TxType>())
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|c| c.trim());

    let mut txs: Vec<&Transaction> = state
        .transactions
        .iter()
        .filter(|t| chrono::Datelike::year(&t.date) == year)
        .filter(|t| kind.is_none_or(|k| t.r#type == k))
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect();
    txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }

    Ok(txs
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            r#type: t.r#type.to_string(),
            category: t.category.clone(),
            amount: fmt_money(&t.amount),
            description: t.description.clone(),
            recurring: t.recurring,
        })
        .collect())
}
