// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Series feeding the analytics charts.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregator::{percent_of, safe_div, saturating_sum};
use crate::models::{ExpenseCategory, Transaction, TxType, MONTH_NAMES};

const PROJECTION_LABELS: [&str; 6] = ["Jan+1", "Feb+1", "Mar+1", "Apr+1", "May+1", "Jun+1"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPoint {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub cumulative: Decimal,
}

/// Twelve points, January through December of `year`.
pub fn monthly_series(transactions: &[Transaction], year: i32) -> Vec<MonthPoint> {
    let mut cumulative = Decimal::ZERO;
    MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let month = idx as u32 + 1;
            let in_month = |kind: TxType| {
                saturating_sum(
                    transactions
                        .iter()
                        .filter(|t| {
                            t.date.year() == year && t.date.month() == month && t.r#type == kind
                        })
                        .map(|t| t.amount),
                )
            };
            let income = in_month(TxType::Income);
            let expenses = in_month(TxType::Expense);
            let net = income.saturating_sub(expenses);
            cumulative = cumulative.saturating_add(net);
            MonthPoint {
                month: name.to_string(),
                income,
                expenses,
                net,
                cumulative,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPoint {
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub cumulative: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowProjection {
    pub actual: Vec<MonthPoint>,
    pub projected: Vec<ProjectedPoint>,
    pub income_growth_rate: Decimal,
    pub expense_growth_rate: Decimal,
}

fn growth_rate(first: Decimal, last: Decimal) -> Decimal {
    safe_div(safe_div(last.saturating_sub(first), first), Decimal::from(3))
}

/// Six months beyond December, extrapolated from October-December averages
/// with a linear per-month growth factor.
pub fn cash_flow_projection(transactions: &[Transaction], year: i32) -> CashFlowProjection {
    let actual = monthly_series(transactions, year);
    let tail = &actual[actual.len() - 3..];
    let three = Decimal::from(3);
    let avg_income = saturating_sum(tail.iter().map(|m| m.income)) / three;
    let avg_expenses = saturating_sum(tail.iter().map(|m| m.expenses)) / three;
    let income_growth_rate = growth_rate(tail[0].income, tail[2].income);
    let expense_growth_rate = growth_rate(tail[0].expenses, tail[2].expenses);

    let mut cumulative = actual.last().map(|m| m.cumulative).unwrap_or_default();
    let projected = PROJECTION_LABELS
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let step = Decimal::from(idx + 1);
            let income = avg_income
                .saturating_mul(Decimal::ONE.saturating_add(income_growth_rate.saturating_mul(step)));
            let expenses = avg_expenses.saturating_mul(
                Decimal::ONE.saturating_add(expense_growth_rate.saturating_mul(step)),
            );
            let net = income.saturating_sub(expenses);
            cumulative = cumulative.saturating_add(net);
            ProjectedPoint {
                label: label.to_string(),
                income,
                expenses,
                net,
                cumulative,
            }
        })
        .collect();

    CashFlowProjection {
        actual,
        projected,
        income_growth_rate,
        expense_growth_rate,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub budgeted: Decimal,
    pub spent: Decimal,
    pub percent: Decimal,
}

/// Expense categories with any spending, each with its share of the total spent.
pub fn expense_shares(categories: &[ExpenseCategory]) -> Vec<CategoryShare> {
    let spending: Vec<&ExpenseCategory> = categories
        .iter()
        .filter(|c| c.spent > Decimal::ZERO)
        .collect();
    let total = saturating_sum(spending.iter().map(|c| c.spent));
    spending
        .into_iter()
        .map(|c| CategoryShare {
            category: c.name.clone(),
            budgeted: c.budgeted,
            spent: c.spent,
            percent: percent_of(c.spent, total),
        })
        .collect()
}
