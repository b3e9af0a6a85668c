// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::alerts::AlertQueue;
use crate::db;
use crate::models::Theme;
use crate::utils::{fmt_money, maybe_print_json, parse_year, pretty_table};
use crate::validation::validate_amount;
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub current_year: i32,
    pub theme: Theme,
    pub fixed_income: Decimal,
    pub fixed_expenses: Decimal,
    pub transactions: usize,
    pub recurring_transactions: usize,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let mut state = db::load_state(conn)?;
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = Settings {
                current_year: state.current_year,
                theme: state.theme,
                fixed_income: state.fixed_income,
                fixed_expenses: state.fixed_expenses,
                transactions: state.transactions.len(),
                recurring_transactions: state.recurring_transactions.len(),
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![
                    vec!["Current year".into(), s.current_year.to_string()],
                    vec!["Theme".into(), s.theme.to_string()],
                    vec!["Fixed income".into(), fmt_money(&s.fixed_income)],
                    vec!["Fixed expenses".into(), fmt_money(&s.fixed_expenses)],
                    vec!["Transactions".into(), s.transactions.to_string()],
                    vec!["Recurring".into(), s.recurring_transactions.to_string()],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("year", sub)) => {
            state.current_year = parse_year(sub.get_one::<String>("year").unwrap())?;
            state.refresh();
            db::save_state(conn, &state)?;
            alerts.info(format!("Current year set to {}", state.current_year));
        }
        Some(("theme", sub)) => {
            state.theme = match sub.get_one::<String>("theme").unwrap().as_str() {
                "toggle" => state.theme.toggled(),
                other => other.parse()?,
            };
            db::save_state(conn, &state)?;
            alerts.info(format!("Theme set to {}", state.theme));
        }
        Some(("fixed", sub)) => {
            if let Some(v) = sub.get_one::<String>("income") {
                state.fixed_income = fixed_amount(v)?;
            }
            if let Some(v) = sub.get_one::<String>("expenses") {
                state.fixed_expenses = fixed_amount(v)?;
            }
            db::save_state(conn, &state)?;
            alerts.success(format!(
                "Fixed monthly income {} / expenses {}",
                fmt_money(&state.fixed_income),
                fmt_money(&state.fixed_expenses)
            ));
        }
        _ => {}
    }
    Ok(())
}

fn fixed_amount(raw: &str) -> Result<Decimal> {
    let d = crate::utils::parse_decimal(raw)?;
    let errs = validate_amount(d);
    if !errs.is_empty() {
        return Err(anyhow!("Invalid amount '{}': {}", raw, errs.join(", ")));
    }
    Ok(d)
}

pub fn reset(conn: &Connection, m: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    if !m.get_flag("yes") {
        return Err(anyhow!("Refusing to delete all data without --yes"));
    }
    db::reset(conn)?;
    alerts.warning("All data has been reset");
    Ok(())
}
