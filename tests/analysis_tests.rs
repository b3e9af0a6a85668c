// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::aggregator::IncomeStability;
use cashflow::analysis::{self, Priority, Severity, Tone};
use cashflow::charts;
use cashflow::models::{AppState, ExpenseCategory, Transaction, TxType};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn tx(id: i64, date: &str, kind: TxType, category: &str, amount: Decimal) -> Transaction {
    Transaction {
        id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        r#type: kind,
        category: category.to_string(),
        amount,
        description: format!("tx {}", id),
        recurring: false,
        recurring_id: None,
    }
}

fn state_with(txs: Vec<Transaction>) -> AppState {
    let mut state = AppState {
        transactions: txs,
        current_year: 2025,
        ..Default::default()
    };
    state.refresh();
    state
}

fn sample() -> Vec<Transaction> {
    vec![
        tx(1, "2025-01-05", TxType::Income, "Salary", Decimal::from(5000)),
        tx(2, "2025-01-10", TxType::Expense, "Food & Dining", Decimal::from(1200)),
        tx(3, "2025-01-20", TxType::Expense, "Food & Dining", Decimal::from(300)),
    ]
}

#[test]
fn analyze_reports_healthy_year() {
    let report = analysis::analyze(&state_with(sample()));
    assert_eq!(report.insights.savings_rate, Decimal::from(70));
    assert_eq!(report.health_score, Decimal::from(100));
    assert_eq!(report.messages[0].tone, Tone::Positive);
    assert_eq!(report.messages[0].title, "Excellent Savings Rate");
    assert_eq!(report.income.stability, IncomeStability::Stable);
    assert_eq!(report.spending.average_expense, Decimal::from(750));
    assert!(report.alerts.is_empty());
    assert_eq!(report.projections.len(), 6);

    let titles: Vec<&str> = report
        .recommendations
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Optimize Food & Dining Spending"]);
}

#[test]
fn sparse_data_gets_starter_recommendations() {
    let report = analysis::analyze(&state_with(vec![tx(
        1,
        "2025-03-01",
        TxType::Income,
        "Salary",
        Decimal::from(100),
    )]));
    assert_eq!(report.recommendations, analysis::starter_recommendations());
    assert_eq!(report.recommendations[0].priority, Priority::High);
}

#[test]
fn low_savings_and_overruns_are_flagged() {
    let mut state = state_with(vec![
        tx(1, "2025-02-01", TxType::Income, "Salary", Decimal::from(1000)),
        tx(2, "2025-02-02", TxType::Expense, "Food & Dining", Decimal::from(10)),
        tx(3, "2025-02-03", TxType::Expense, "Food & Dining", Decimal::from(10)),
        tx(4, "2025-02-04", TxType::Expense, "Food & Dining", Decimal::from(10)),
        tx(5, "2025-02-05", TxType::Expense, "Housing", Decimal::from(970)),
    ]);
    state.expense_categories = vec![
        ExpenseCategory::new("Food & Dining", Decimal::from(100)),
        ExpenseCategory::new("Housing", Decimal::from(500)),
    ];
    state.refresh();
    let report = analysis::analyze(&state);

    assert_eq!(report.insights.savings_rate, Decimal::ZERO);
    assert_eq!(report.health_score, Decimal::from(50));
    assert_eq!(report.messages[0].title, "Negative Savings");

    let titles: Vec<&str> = report
        .recommendations
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert!(titles.contains(&"Increase Your Savings Rate"));
    assert!(titles.contains(&"Budget Overruns Detected"));
    assert!(titles.contains(&"Optimize Housing Spending"));
    assert!(!titles.contains(&"Build Emergency Fund"));

    let danger: Vec<_> = report
        .alerts
        .iter()
        .filter(|a| a.severity == Severity::Danger)
        .collect();
    assert_eq!(danger.len(), 1);
    assert_eq!(danger[0].title, "Critical Budget Overrun: Housing");

    // average expense 250, threshold 750
    assert!(report
        .alerts
        .iter()
        .any(|a| a.severity == Severity::Warning && a.description.starts_with("1 transactions")));
}

#[test]
fn emergency_fund_recommended_when_cover_is_thin() {
    let state = state_with(vec![
        tx(1, "2025-01-01", TxType::Income, "Salary", Decimal::from(12000)),
        tx(2, "2025-01-02", TxType::Expense, "Housing", Decimal::from(5000)),
        tx(3, "2025-01-03", TxType::Expense, "Transportation", Decimal::from(5000)),
    ]);
    let report = analysis::analyze(&state);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.title == "Build Emergency Fund" && r.priority == Priority::High));
}

#[test]
fn income_patterns_measure_variability() {
    let txs = vec![
        tx(1, "2025-01-01", TxType::Income, "Salary", Decimal::from(1000)),
        tx(2, "2025-02-01", TxType::Income, "Salary", Decimal::from(3000)),
    ];
    let p = analysis::income_patterns(&txs, 2025);
    assert_eq!(p.monthly_income.len(), 2);
    assert!((p.variability - Decimal::from(1000)).abs() < Decimal::new(1, 6));
    assert_eq!(p.average_monthly_income, Decimal::from(2000));
    assert_eq!(p.stability, IncomeStability::Variable);
}

#[test]
fn monthly_series_accumulates_net() {
    let series = charts::monthly_series(&sample(), 2025);
    assert_eq!(series.len(), 12);
    assert_eq!(series[0].month, "January");
    assert_eq!(series[0].net, Decimal::from(3500));
    assert_eq!(series[11].cumulative, Decimal::from(3500));
    assert!(series[1..].iter().all(|m| m.net.is_zero()));
}

#[test]
fn cash_flow_projection_guards_zero_start() {
    let txs = vec![
        tx(1, "2025-12-01", TxType::Income, "Salary", Decimal::from(300)),
        tx(2, "2025-10-01", TxType::Expense, "Housing", Decimal::from(100)),
        tx(3, "2025-12-02", TxType::Expense, "Housing", Decimal::from(200)),
    ];
    let p = charts::cash_flow_projection(&txs, 2025);
    assert_eq!(p.projected.len(), 6);
    assert_eq!(p.projected[0].label, "Jan+1");
    assert_eq!(p.income_growth_rate, Decimal::ZERO);
    assert!(p.projected.iter().all(|m| m.income == Decimal::from(100)));
    assert!(p.expense_growth_rate > Decimal::ZERO);
    assert!(p.projected[5].expenses > p.projected[0].expenses);
}

#[test]
fn expense_shares_skip_unspent_categories() {
    let cats = vec![
        ExpenseCategory {
            name: "Housing".into(),
            budgeted: Decimal::from(400),
            spent: Decimal::from(300),
        },
        ExpenseCategory {
            name: "Food".into(),
            budgeted: Decimal::ZERO,
            spent: Decimal::from(100),
        },
        ExpenseCategory::new("Travel", Decimal::from(50)),
    ];
    let shares = charts::expense_shares(&cats);
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].percent, Decimal::from(75));
    assert_eq!(shares[1].percent, Decimal::from(25));
    assert!(charts::expense_shares(&[]).is_empty());
}
