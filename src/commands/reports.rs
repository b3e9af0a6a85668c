// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::{self, DEFAULT_HORIZONS};
use crate::analysis;
use crate::charts;
use crate::db;
use crate::models::AppState;
use crate::utils::{
    fmt_money, fmt_pct, maybe_print_json, parse_horizons, pretty_table, selected_year,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let state = db::load_state(conn)?;
    match m.subcommand() {
        Some(("insights", sub)) => insights(&state, sub)?,
        Some(("breakdown", sub)) => breakdown(&state, sub)?,
        Some(("budget", sub)) => budget(&state, sub)?,
        Some(("trend", sub)) => trend(&state, sub)?,
        Some(("project", sub)) => project(&state, sub)?,
        Some(("charts", sub)) => charts(&state, sub)?,
        Some(("analyze", sub)) => analyze(&state, sub)?,
        _ => {}
    }
    Ok(())
}

fn flags(sub: &clap::ArgMatches) -> (bool, bool) {
    (sub.get_flag("json"), sub.get_flag("jsonl"))
}

fn insights(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let year = selected_year(sub, state)?;
    let ins =
        aggregator::yearly_insights(&state.transactions, state.fixed_income, state.fixed_expenses, year);
    let (json, jsonl) = flags(sub);
    if !maybe_print_json(json, jsonl, &ins)? {
        println!(
            "{}",
            pretty_table(
                &["Year", "Income", "Expenses", "Net Savings", "Savings Rate", "Monthly Avg"],
                vec![vec![
                    year.to_string(),
                    fmt_money(&ins.total_income),
                    fmt_money(&ins.total_expenses),
                    fmt_money(&ins.net_savings),
                    fmt_pct(&ins.savings_rate),
                    fmt_money(&ins.monthly_average),
                ]],
            )
        );
    }
    Ok(())
}

fn breakdown(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let year = selected_year(sub, state)?;
    let data = aggregator::category_breakdown(&state.transactions, year);
    let (json, jsonl) = flags(sub);
    if !maybe_print_json(json, jsonl, &data)? {
        let mut items: Vec<_> = data.iter().collect();
        items.sort_by(|a, b| b.1.total.cmp(&a.1.total).then(a.0.cmp(b.0)));
        let rows = items
            .into_iter()
            .map(|(name, s)| vec![name.clone(), fmt_money(&s.total), s.count.to_string()])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Count"], rows));
        if let Some((name, s)) = aggregator::top_spending_category(&data) {
            println!("Top spending category: {} ({})", name, fmt_money(&s.total));
        }
    }
    Ok(())
}

fn budget(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let year = selected_year(sub, state)?;
    let cats = aggregator::update_category_totals(&state.expense_categories, &state.transactions, year);
    let data = aggregator::budget_variance(&cats);
    let (json, jsonl) = flags(sub);
    if !maybe_print_json(json, jsonl, &data)? {
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    fmt_money(&b.budgeted),
                    fmt_money(&b.spent),
                    fmt_money(&b.variance),
                    fmt_pct(&b.performance_percent),
                    format!("{:?}", b.status).to_lowercase(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Budgeted", "Spent", "Variance", "Performance", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

fn trend(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let data = aggregator::month_over_month_trend(&state.transactions);
    let (json, jsonl) = flags(sub);
    if !maybe_print_json(json, jsonl, &data)? {
        if data.is_empty() {
            println!("Need at least two months of transactions for a trend");
            return Ok(());
        }
        let rows = data
            .iter()
            .map(|d| {
                vec![
                    format!("{} -> {}", d.previous_month, d.recent_month),
                    fmt_money(&d.previous),
                    fmt_money(&d.recent),
                    d.percent_change
                        .map(|p| fmt_pct(&p))
                        .unwrap_or_else(|| "n/a".into()),
                    d.description(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Months", "Previous", "Recent", "Change", "Summary"], rows)
        );
    }
    Ok(())
}

fn project(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let year = selected_year(sub, state)?;
    let horizons = match sub.get_one::<String>("horizons") {
        Some(h) => parse_horizons(h)?,
        None => DEFAULT_HORIZONS.to_vec(),
    };
    let ins =
        aggregator::yearly_insights(&state.transactions, state.fixed_income, state.fixed_expenses, year);
    let input = analysis::projection_input(&ins, state);
    let data = aggregator::project_future_balance(&input, &horizons);
    let (json, jsonl) = flags(sub);
    if !maybe_print_json(json, jsonl, &data)? {
        println!("{}", projection_table(&data));
    }
    Ok(())
}

fn projection_table(data: &[aggregator::Projection]) -> comfy_table::Table {
    let rows = data
        .iter()
        .map(|p| {
            vec![
                p.period.clone(),
                fmt_money(&p.projected_amount),
                fmt_money(&p.monthly_net),
                format!("{:?}", p.status).to_lowercase(),
                format!("{:?}", p.trajectory).to_lowercase(),
                fmt_pct(&p.confidence_percent),
            ]
        })
        .collect();
    pretty_table(
        &["Period", "Projected", "Monthly Net", "Status", "Trajectory", "Confidence"],
        rows,
    )
}

fn charts(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let year = selected_year(sub, state)?;
    let (json, jsonl) = flags(sub);
    match sub.get_one::<String>("kind").map(String::as_str) {
        Some("projection") => {
            let data = charts::cash_flow_projection(&state.transactions, year);
            if !maybe_print_json(json, jsonl, &data)? {
                let rows = data
                    .projected
                    .iter()
                    .map(|p| {
                        vec![
                            p.label.clone(),
                            fmt_money(&p.income),
                            fmt_money(&p.expenses),
                            fmt_money(&p.net),
                            fmt_money(&p.cumulative),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Month", "Income", "Expenses", "Net", "Cumulative"], rows)
                );
            }
        }
        Some("shares") => {
            let cats =
                aggregator::update_category_totals(&state.expense_categories, &state.transactions, year);
            let data = charts::expense_shares(&cats);
            if !maybe_print_json(json, jsonl, &data)? {
                let rows = data
                    .iter()
                    .map(|s| {
                        vec![
                            s.category.clone(),
                            fmt_money(&s.budgeted),
                            fmt_money(&s.spent),
                            fmt_pct(&s.percent),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Budgeted", "Spent", "Share"], rows)
                );
            }
        }
        _ => {
            let data = charts::monthly_series(&state.transactions, year);
            if !maybe_print_json(json, jsonl, &data)? {
                let rows = data
                    .iter()
                    .map(|m| {
                        vec![
                            m.month.clone(),
                            fmt_money(&m.income),
                            fmt_money(&m.expenses),
                            fmt_money(&m.net),
                            fmt_money(&m.cumulative),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Month", "Income", "Expenses", "Net", "Cumulative"], rows)
                );
            }
        }
    }
    Ok(())
}

fn analyze(state: &AppState, sub: &clap::ArgMatches) -> Result<()> {
    let mut scoped = state.clone();
    scoped.current_year = selected_year(sub, state)?;
    let report = analysis::analyze(&scoped);
    let (json, jsonl) = flags(sub);
    if maybe_print_json(json, jsonl, &report)? {
        return Ok(());
    }

    let ins = &report.insights;
    println!(
        "Analyzing {} transactions for {}: health score {:.0}/100, savings rate {}, net {}",
        ins.transaction_count,
        ins.year,
        report.health_score,
        fmt_pct(&ins.savings_rate),
        fmt_money(&ins.net_savings)
    );
    if !report.alerts.is_empty() {
        let rows = report
            .alerts
            .iter()
            .map(|a| {
                vec![
                    format!("{:?}", a.severity).to_lowercase(),
                    a.title.clone(),
                    a.description.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Level", "Alert", "Detail"], rows));
    }
    let rows = report
        .messages
        .iter()
        .map(|i| vec![i.title.clone(), i.description.clone()])
        .collect();
    println!("{}", pretty_table(&["Insight", "Detail"], rows));
    for t in &report.trends {
        println!("{}", t.description());
    }
    if !report.recommendations.is_empty() {
        let rows = report
            .recommendations
            .iter()
            .map(|r| {
                vec![
                    format!("{:?}", r.priority).to_lowercase(),
                    r.title.clone(),
                    r.action.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Priority", "Recommendation", "Action"], rows));
    }
    println!("{}", projection_table(&report.projections));
    Ok(())
}
