// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::alerts::AlertQueue;
use crate::db;
use crate::models::{AppState, ExportBundle, Transaction};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::io::Write;
use tracing::info;

pub const EXPORT_VERSION: &str = "3.0.0";

pub const CSV_HEADER: [&str; 5] = ["Date", "Type", "Category", "Amount", "Description"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches, alerts: &mut AlertQueue) -> Result<()> {
    let state = db::load_state(conn)?;
    match m.subcommand() {
        Some(("json", sub)) => {
            let out = sub.get_one::<String>("out").unwrap().trim();
            let body = export_json(&state, Utc::now())?;
            std::fs::write(out, body).with_context(|| format!("Write {}", out))?;
            info!(path = out, "exported backup");
            alerts.success(format!("Exported backup to {}", out));
        }
        Some(("csv", sub)) => {
            let out = sub.get_one::<String>("out").unwrap().trim();
            let file = std::fs::File::create(out).with_context(|| format!("Create {}", out))?;
            write_csv(&state.transactions, file)?;
            info!(path = out, rows = state.transactions.len(), "exported transactions");
            alerts.success(format!(
                "Exported {} transactions to {}",
                state.transactions.len(),
                out
            ));
        }
        _ => {}
    }
    Ok(())
}

/// Pretty JSON backup of the whole state with version and export time.
pub fn export_json(state: &AppState, now: DateTime<Utc>) -> Result<String> {
    let bundle = ExportBundle {
        version: EXPORT_VERSION,
        export_date: now,
        state,
    };
    Ok(serde_json::to_string_pretty(&bundle)?)
}

pub fn write_csv<W: Write>(txs: &[Transaction], w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(CSV_HEADER)?;
    for t in txs {
        wtr.write_record([
            t.date.format("%m/%d/%Y").to_string(),
            t.r#type.to_string(),
            t.category.clone(),
            t.amount.normalize().to_string(),
            t.description.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
