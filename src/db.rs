// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key/value persistence for [`AppState`]: one JSON document per top-level key.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::AppState;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Cashflow", "cashflow"));

pub const STATE_KEYS: [&str; 9] = [
    "fixedIncome",
    "fixedExpenses",
    "months",
    "transactions",
    "recurringTransactions",
    "expenseCategories",
    "incomeCategories",
    "currentYear",
    "theme",
];

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .ok_or_else(|| Error::NotFound("platform-specific data dir".into()))?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("cashflow.sqlite"))
}

/// Open the store at `path`, or the platform data dir when `None`.
pub fn open_or_init(path: Option<&Path>) -> Result<Connection> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    debug!(path = %path.display(), "opening store");
    let conn = Connection::open(&path)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS storage(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

pub fn get_key(conn: &Connection, key: &str) -> Result<Option<Value>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM storage WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(s) => Ok(Some(serde_json::from_str(&s)?)),
        None => Ok(None),
    }
}

pub fn set_key(conn: &Connection, key: &str, value: &Value) -> Result<()> {
    conn.execute(
        "INSERT INTO storage(key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
        params![key, serde_json::to_string(value)?],
    )?;
    Ok(())
}

/// Load every known key; missing keys fall back to defaults and derived
/// category totals are recomputed.
pub fn load_state(conn: &Connection) -> Result<AppState> {
    let mut doc = Map::new();
    for key in STATE_KEYS {
        if let Some(v) = get_key(conn, key)? {
            doc.insert(key.to_string(), v);
        }
    }
    let present = doc.len();
    let mut state: AppState = serde_json::from_value(Value::Object(doc))?;
    state.refresh();
    debug!(
        keys = present,
        transactions = state.transactions.len(),
        "state loaded"
    );
    Ok(state)
}

/// Write all keys in one SQL transaction.
pub fn save_state(conn: &Connection, state: &AppState) -> Result<()> {
    let Value::Object(doc) = serde_json::to_value(state)? else {
        return Err(Error::InvalidValue("state did not serialize to an object".into()));
    };
    let tx = conn.unchecked_transaction()?;
    for (key, value) in &doc {
        if !STATE_KEYS.contains(&key.as_str()) {
            warn!(key = %key, "skipping unknown state key");
            continue;
        }
        set_key(&tx, key, value)?;
    }
    tx.commit()?;
    debug!(transactions = state.transactions.len(), "state saved");
    Ok(())
}

pub fn reset(conn: &Connection) -> Result<()> {
    let n = conn.execute("DELETE FROM storage", [])?;
    info!(keys = n, "store cleared");
    Ok(())
}
