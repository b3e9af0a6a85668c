// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::alerts::AlertQueue;
use crate::db::{self, STATE_KEYS};
use crate::error::Error;
use crate::models::{coerce_amount, nth_id, AppState, Transaction, TxType};
use crate::utils::parse_csv_date;
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, Trim};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::Value;
use std::io::Read;
use tracing::{debug, info};

const REQUIRED_ARRAYS: [&str; 3] = ["transactions", "expenseCategories", "incomeCategories"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let state = db::load_state(conn)?;
    match m.subcommand() {
        Some(("json", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let text =
                std::fs::read_to_string(path).with_context(|| format!("Open JSON {}", path))?;
            let imported = import_json_str(&state, &text)?;
            db::save_state(conn, &imported)?;
            info!(path, transactions = imported.transactions.len(), "imported backup");
            alerts.success("Data imported successfully!");
        }
        Some(("csv", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let file = std::fs::File::open(path).with_context(|| format!("Open CSV {}", path))?;
            let rows = read_csv(file, state.next_transaction_id()?)?;
            let count = rows.len();
            let mut state = state;
            state.transactions.extend(rows);
            state.refresh();
            db::save_state(conn, &state)?;
            info!(path, rows = count, "imported transactions");
            alerts.success(format!("Successfully imported {} transactions!", count));
        }
        _ => {}
    }
    Ok(())
}

/// Overlay a backup onto `current`. Keys missing from the file keep their
/// current value; the file must carry the transaction and category lists
/// and a current year.
pub fn import_json_str(current: &AppState, text: &str) -> crate::error::Result<AppState> {
    let doc: Value = serde_json::from_str(text)
        .map_err(|e| Error::InvalidImport(format!("not a JSON document ({})", e)))?;
    let Value::Object(incoming) = doc else {
        return Err(Error::InvalidImport("expected a JSON object".into()));
    };
    for key in REQUIRED_ARRAYS {
        if !incoming.get(key).is_some_and(Value::is_array) {
            return Err(Error::InvalidImport(format!("'{}' must be a list", key)));
        }
    }
    if !incoming.contains_key("currentYear") {
        return Err(Error::InvalidImport("'currentYear' is missing".into()));
    }

    let Value::Object(mut merged) = serde_json::to_value(current)? else {
        return Err(Error::InvalidValue("state did not serialize to an object".into()));
    };
    for key in STATE_KEYS {
        if let Some(v) = incoming.get(key) {
            merged.insert(key.to_string(), v.clone());
        }
    }
    let mut state: AppState = serde_json::from_value(Value::Object(merged))
        .map_err(|e| Error::InvalidImport(e.to_string()))?;
    state.refresh();
    debug!(
        transactions = state.transactions.len(),
        year = state.current_year,
        "backup merged"
    );
    Ok(state)
}

/// Parse `Date,Type,Category,Amount,Description` rows. Rows whose amount is
/// not positive are dropped; ids count up from `first_id`.
pub fn read_csv<R: Read>(r: R, first_id: i64) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(r);

    let mut out = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        if rec.iter().all(str::is_empty) {
            continue;
        }
        let date_raw = rec.get(0).unwrap_or("");
        let date = parse_csv_date(date_raw)
            .with_context(|| format!("Row {}: invalid date '{}'", line + 2, date_raw))?;
        let kind: TxType = rec
            .get(1)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("Row {}", line + 2))?;
        let amount = coerce_amount(rec.get(3).unwrap_or(""));
        if amount <= Decimal::ZERO {
            debug!(row = line + 2, "skipping row without a positive amount");
            continue;
        }
        out.push(Transaction {
            id: nth_id(first_id, out.len())?,
            date,
            r#type: kind,
            category: rec.get(2).unwrap_or("").to_string(),
            amount,
            description: rec.get(4).unwrap_or("").to_string(),
            recurring: false,
            recurring_id: None,
        });
    }
    if out.is_empty() {
        return Err(anyhow!("No valid transactions found in the CSV file"));
    }
    Ok(out)
}
