// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::monthly_equivalent;
use crate::alerts::AlertQueue;
use crate::db;
use crate::models::{Frequency, RecurringTransaction, TxType};
use crate::recurring::{generate_transactions, monthly_summary, toggle};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use crate::validation::validate_recurring;
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub, alerts)?,
        Some(("edit", sub)) => edit(conn, sub, alerts)?,
        Some(("toggle", sub)) => toggle_status(conn, sub, alerts)?,
        Some(("rm", sub)) => remove(conn, sub, alerts)?,
        Some(("generate", sub)) => generate(conn, sub, alerts)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let kind: TxType = sub.get_one::<String>("type").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    if !state.has_category(kind, &category) {
        return Err(anyhow!("{} category '{}' not found", kind, category));
    }
    let def = RecurringTransaction {
        id: state.next_recurring_id()?,
        description: sub
            .get_one::<String>("description")
            .map(|d| d.trim().to_string())
            .unwrap_or_else(|| name.clone()),
        name,
        r#type: kind,
        category,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        frequency: sub.get_one::<String>("frequency").unwrap().parse()?,
        start_date: sub
            .get_one::<String>("start")
            .map(|s| parse_date(s))
            .transpose()?,
        is_active: !sub.get_flag("inactive"),
    };
    validate_recurring(&def).into_result()?;
    alerts.success(format!(
        "Added recurring '{}' ({} {} {})",
        def.name,
        def.frequency,
        def.r#type,
        fmt_money(&def.amount)
    ));
    state.recurring_transactions.push(def);
    db::save_state(conn, &state)?;
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let pos = state
        .recurring_transactions
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| anyhow!("Recurring transaction {} not found", id))?;
    let mut updated = state.recurring_transactions[pos].clone();
    if let Some(n) = sub.get_one::<String>("name") {
        updated.name = n.trim().to_string();
    }
    if let Some(c) = sub.get_one::<String>("category") {
        updated.category = c.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        updated.amount = parse_decimal(a)?;
    }
    if let Some(f) = sub.get_one::<String>("frequency") {
        updated.frequency = f.parse::<Frequency>()?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        updated.description = d.trim().to_string();
    }
    if !state.has_category(updated.r#type, &updated.category) {
        return Err(anyhow!(
            "{} category '{}' not found",
            updated.r#type,
            updated.category
        ));
    }
    validate_recurring(&updated).into_result()?;
    state.recurring_transactions[pos] = updated;
    db::save_state(conn, &state)?;
    alerts.success(format!("Updated recurring transaction {}", id));
    Ok(())
}

fn toggle_status(conn: &Connection, sub: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let active = toggle(&mut state.recurring_transactions, id)
        .ok_or_else(|| anyhow!("Recurring transaction {} not found", id))?;
    db::save_state(conn, &state)?;
    alerts.info(format!(
        "Recurring transaction {} is now {}",
        id,
        if active { "active" } else { "paused" }
    ));
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let before = state.recurring_transactions.len();
    state.recurring_transactions.retain(|r| r.id != id);
    if state.recurring_transactions.len() == before {
        return Err(anyhow!("Recurring transaction {} not found", id));
    }
    db::save_state(conn, &state)?;
    alerts.success(format!("Removed recurring transaction {}", id));
    Ok(())
}

fn generate(conn: &Connection, sub: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    let day = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let generated =
        generate_transactions(&state.recurring_transactions, day, state.next_transaction_id()?)?;
    if generated.is_empty() {
        alerts.warning("No active recurring transactions to generate");
        return Ok(());
    }
    info!(count = generated.len(), %day, "generated recurring transactions");
    alerts.success(format!("Generated {} transactions", generated.len()));
    state.transactions.extend(generated);
    state.refresh();
    db::save_state(conn, &state)?;
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let state = db::load_state(conn)?;
    let defs = &state.recurring_transactions;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), defs)? {
        let rows = defs
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.r#type.to_string(),
                    r.category.clone(),
                    fmt_money(&r.amount),
                    r.frequency.to_string(),
                    fmt_money(&monthly_equivalent(r.amount, r.frequency)),
                    r.start_date.map(|d| d.to_string()).unwrap_or_default(),
                    if r.is_active { "active" } else { "paused" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Name", "Type", "Category", "Amount", "Frequency", "Monthly", "Start",
                    "Status",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let state = db::load_state(conn)?;
    let s = monthly_summary(&state.recurring_transactions);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!(
            "{}",
            pretty_table(
                &["Monthly Income", "Monthly Expenses", "Net"],
                vec![vec![
                    fmt_money(&s.income),
                    fmt_money(&s.expenses),
                    fmt_money(&s.net),
                ]],
            )
        );
    }
    Ok(())
}
