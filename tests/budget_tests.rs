// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::alerts::AlertQueue;
use cashflow::models::{Theme, TxType};
use cashflow::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["cashflow"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let mut alerts = AlertQueue::new();
    match matches.subcommand() {
        Some(("category", m)) => commands::categories::handle(conn, m, &mut alerts),
        Some(("config", m)) => commands::config::handle(conn, m, &mut alerts),
        Some(("reset", m)) => commands::config::reset(conn, m, &mut alerts),
        Some(("recurring", m)) => commands::recurring::handle(conn, m, &mut alerts),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn category_budget_lifecycle() {
    let conn = base_conn();
    run(&conn, &["category", "add", "--kind", "expense", "--name", "Pets", "--budget", "80"]).unwrap();
    let err = run(&conn, &["category", "add", "--kind", "expense", "--name", "Pets"]).unwrap_err();
    assert!(err.to_string().contains("already exists"));

    run(&conn, &["category", "budget", "--kind", "expense", "--name", "Pets", "--amount", "120"]).unwrap();
    let state = db::load_state(&conn).unwrap();
    let rows = commands::categories::category_rows(&state, Some(TxType::Expense));
    let pets = rows.iter().find(|r| r.name == "Pets").unwrap();
    assert_eq!(pets.budgeted, Decimal::from(120));
    assert_eq!(rows.len(), 4);

    run(&conn, &["category", "rm", "--kind", "expense", "--name", "Pets"]).unwrap();
    let state = db::load_state(&conn).unwrap();
    assert!(!state.has_category(TxType::Expense, "Pets"));
    assert!(run(&conn, &["category", "rm", "--kind", "expense", "--name", "Pets"]).is_err());
}

#[test]
fn negative_budget_is_rejected() {
    let conn = base_conn();
    let err = run(
        &conn,
        &["category", "budget", "--kind", "expense", "--name", "Housing", "--amount=-5"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Amount cannot be negative"));
}

#[test]
fn config_year_theme_and_reset() {
    let conn = base_conn();
    run(&conn, &["config", "year", "2024"]).unwrap();
    run(&conn, &["config", "theme", "toggle"]).unwrap();
    run(&conn, &["config", "fixed", "--income", "4000", "--expenses", "2500"]).unwrap();
    let state = db::load_state(&conn).unwrap();
    assert_eq!(state.current_year, 2024);
    assert_eq!(state.theme, Theme::Dark);
    assert_eq!(state.fixed_income, Decimal::from(4000));
    assert_eq!(state.fixed_expenses, Decimal::from(2500));

    assert!(run(&conn, &["config", "year", "12"]).is_err());
    assert!(run(&conn, &["reset"]).is_err());
    run(&conn, &["reset", "--yes"]).unwrap();
    let state = db::load_state(&conn).unwrap();
    assert_eq!(state.theme, Theme::Light);
    assert_eq!(state.fixed_income, Decimal::ZERO);
}

#[test]
fn recurring_commands_generate_linked_transactions() {
    let conn = base_conn();
    run(
        &conn,
        &[
            "recurring", "add", "--name", "Rent", "--type", "expense", "--category", "Housing",
            "--amount", "1200",
        ],
    )
    .unwrap();
    run(
        &conn,
        &[
            "recurring", "add", "--name", "Gym", "--type", "expense", "--category", "Housing",
            "--amount", "30", "--frequency", "weekly", "--inactive",
        ],
    )
    .unwrap();
    run(&conn, &["recurring", "generate", "--date", "2025-04-18"]).unwrap();

    let state = db::load_state(&conn).unwrap();
    assert_eq!(state.recurring_transactions.len(), 2);
    assert_eq!(state.recurring_transactions[0].description, "Rent");
    assert_eq!(state.transactions.len(), 1);
    let tx = &state.transactions[0];
    assert_eq!(tx.description, "Rent (Recurring)");
    assert_eq!(tx.date.to_string(), "2025-04-01");
    assert_eq!(tx.recurring_id, Some(1));

    run(&conn, &["recurring", "toggle", "2"]).unwrap();
    let state = db::load_state(&conn).unwrap();
    assert!(state.recurring_transactions[1].is_active);

    assert!(run(&conn, &["recurring", "add", "--name", "Bad", "--type", "expense", "--category", "Housing", "--amount", "5", "--frequency", "daily"]).is_err());
}

#[test]
fn presets_suggest_categories_not_yet_added() {
    let conn = base_conn();
    let state = db::load_state(&conn).unwrap();
    let all = commands::categories::preset_suggestions(&state, None);
    assert_eq!(all.len(), 13);
    assert_eq!(all[0].name, "Healthcare");

    run(&conn, &["category", "add", "--kind", "income", "--name", "Rental"]).unwrap();
    let state = db::load_state(&conn).unwrap();
    let income = commands::categories::preset_suggestions(&state, Some(TxType::Income));
    let names: Vec<&str> = income.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Business", "Investments", "Other"]);
}
