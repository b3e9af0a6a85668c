// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::alerts::AlertQueue;
use cashflow::models::{AppState, Transaction, TxType};
use cashflow::{cli, commands::exporter, db};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn seeded_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let mut state = AppState {
        current_year: 2025,
        ..Default::default()
    };
    state.transactions = vec![
        Transaction {
            id: 1,
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            r#type: TxType::Income,
            category: "Salary".into(),
            amount: Decimal::from(5000),
            description: "January pay".into(),
            recurring: false,
            recurring_id: None,
        },
        Transaction {
            id: 2,
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            r#type: TxType::Expense,
            category: "Food & Dining".into(),
            amount: Decimal::new(4250, 2),
            description: "Lunch, with team".into(),
            recurring: false,
            recurring_id: None,
        },
    ];
    state.refresh();
    db::save_state(&conn, &state).unwrap();
    conn
}

fn export(conn: &Connection, kind: &str, out: &str) {
    let matches = cli::build_cli().get_matches_from(["cashflow", "export", kind, "--out", out]);
    let mut alerts = AlertQueue::new();
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m, &mut alerts).unwrap();
    } else {
        panic!("no export subcommand");
    }
    assert_eq!(alerts.len(), 1);
}

#[test]
fn json_backup_carries_version_and_state() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("backup.json");
    let out_str = out_path.to_string_lossy().to_string();
    export(&conn, "json", &out_str);

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["version"], "3.0.0");
    assert!(parsed["exportDate"].as_str().unwrap().starts_with("20"));
    assert_eq!(parsed["currentYear"], 2025);
    assert_eq!(parsed["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["transactions"][1]["date"], "2025-02-03");
    assert_eq!(parsed["transactions"][1]["amount"].as_f64(), Some(42.5));
    assert_eq!(parsed["expenseCategories"][1]["name"], "Food & Dining");
    assert_eq!(parsed["expenseCategories"][1]["spent"].as_f64(), Some(42.5));
    assert!(parsed["transactions"][0].get("recurringId").is_none());
}

#[test]
fn csv_export_uses_us_dates_and_quotes_commas() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("transactions.csv");
    let out_str = out_path.to_string_lossy().to_string();
    export(&conn, "csv", &out_str);

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Date,Type,Category,Amount,Description");
    assert_eq!(lines[1], "01/15/2025,income,Salary,5000,January pay");
    assert_eq!(lines[2], "02/03/2025,expense,Food & Dining,42.5,\"Lunch, with team\"");
}

#[test]
fn export_json_is_stable_for_a_given_time() {
    let state = AppState::default();
    let now = chrono::DateTime::parse_from_rfc3339("2025-06-01T08:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let a = exporter::export_json(&state, now).unwrap();
    let b = exporter::export_json(&state, now).unwrap();
    assert_eq!(a, b);
    assert!(a.contains("\"exportDate\": \"2025-06-01T08:00:00Z\""));
}
