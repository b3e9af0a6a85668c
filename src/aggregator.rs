// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Yearly totals, category breakdowns, budget variance, month-over-month
//! trends, recurring normalisation and balance projections.
//!
//! Every function here is pure: inputs are borrowed, outputs are fresh values.
//! Sums saturate and divisions by zero yield zero, so no input can make these
//! functions panic.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use crate::models::{BudgetLine, Frequency, RecurringTransaction, Transaction, TxType};

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Horizons (in months) reported by default: 3m, 6m, 1y, 2y, 5y, 10y.
pub const DEFAULT_HORIZONS: [u32; 6] = [3, 6, 12, 24, 60, 120];

/// Population standard deviation of monthly income below which income counts as stable.
pub const INCOME_STABILITY_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const CONFIDENCE_FLOOR: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
const CONFIDENCE_CEIL: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

/// `numerator / denominator`, or zero when the denominator is zero or the quotient overflows.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// `part / whole * 100`, guarded like [`safe_div`].
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    safe_div(part, whole).saturating_mul(HUNDRED)
}

pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

fn in_year(t: &Transaction, year: i32) -> bool {
    t.date.year() == year
}

fn total_of(transactions: &[Transaction], year: i32, kind: TxType) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| in_year(t, year) && t.r#type == kind)
            .map(|t| t.amount),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub year: i32,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_savings: Decimal,
    pub savings_rate: Decimal,
    pub monthly_average: Decimal,
    /// Legacy fixed income minus fixed expenses. Informational only; not part of the totals.
    pub fixed_monthly_net: Decimal,
    pub transaction_count: usize,
}

/// Totals for the transactions dated in `year`.
///
/// Fixed income and expenses are reported as `fixed_monthly_net` but never
/// folded into the transaction-based totals.
pub fn yearly_insights(
    transactions: &[Transaction],
    fixed_income: Decimal,
    fixed_expenses: Decimal,
    year: i32,
) -> Insights {
    let total_income = total_of(transactions, year, TxType::Income);
    let total_expenses = total_of(transactions, year, TxType::Expense);
    let net_savings = total_income.saturating_sub(total_expenses);
    let savings_rate = if total_income > Decimal::ZERO {
        percent_of(net_savings, total_income)
    } else {
        Decimal::ZERO
    };
    Insights {
        year,
        total_income,
        total_expenses,
        net_savings,
        savings_rate,
        monthly_average: net_savings / Decimal::from(12),
        fixed_monthly_net: fixed_income.saturating_sub(fixed_expenses),
        transaction_count: transactions.iter().filter(|t| in_year(t, year)).count(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub total: Decimal,
    pub count: usize,
}

/// Expense totals keyed by category name, iterated in lexicographic order.
pub type CategoryBreakdown = BTreeMap<String, CategorySpend>;

/// Group the year's expenses by category. Blank category names land under [`UNCATEGORIZED`].
pub fn category_breakdown(transactions: &[Transaction], year: i32) -> CategoryBreakdown {
    let mut out = CategoryBreakdown::new();
    for t in transactions
        .iter()
        .filter(|t| in_year(t, year) && t.r#type == TxType::Expense)
    {
        let name = t.category.trim();
        let key = if name.is_empty() { UNCATEGORIZED } else { name };
        let entry = out.entry(key.to_string()).or_default();
        entry.total = entry.total.saturating_add(t.amount);
        entry.count += 1;
    }
    out
}

/// Highest-spending category; ties go to the lexicographically smallest name.
pub fn top_spending_category(breakdown: &CategoryBreakdown) -> Option<(&str, &CategorySpend)> {
    let mut best: Option<(&str, &CategorySpend)> = None;
    for (name, spend) in breakdown {
        match best {
            Some((_, b)) if spend.total <= b.total => {}
            _ => best = Some((name.as_str(), spend)),
        }
    }
    best
}

/// Recompute each category's derived total from scratch.
///
/// Only transactions in `year` whose type matches the category kind and whose
/// category name matches exactly are counted. Idempotent.
pub fn update_category_totals<C: BudgetLine>(
    categories: &[C],
    transactions: &[Transaction],
    year: i32,
) -> Vec<C> {
    categories
        .iter()
        .map(|c| {
            let total = saturating_sum(
                transactions
                    .iter()
                    .filter(|t| in_year(t, year) && t.r#type == C::KIND && t.category == c.name())
                    .map(|t| t.amount),
            );
            c.with_total(total)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Under,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVariance {
    pub category: String,
    pub budgeted: Decimal,
    pub spent: Decimal,
    pub variance: Decimal,
    pub performance_percent: Decimal,
    pub status: BudgetStatus,
}

pub fn budget_variance<C: BudgetLine>(categories: &[C]) -> Vec<BudgetVariance> {
    categories
        .iter()
        .map(|c| {
            let budgeted = c.budgeted();
            let spent = c.total();
            let variance = budgeted.saturating_sub(spent);
            let performance_percent = if budgeted > Decimal::ZERO {
                percent_of(variance, budgeted)
            } else {
                Decimal::ZERO
            };
            BudgetVariance {
                category: c.name().to_string(),
                budgeted,
                spent,
                variance,
                performance_percent,
                status: if variance >= Decimal::ZERO {
                    BudgetStatus::Under
                } else {
                    BudgetStatus::Over
                },
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMetric {
    Income,
    Expenses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDelta {
    pub metric: TrendMetric,
    pub previous_month: String,
    pub recent_month: String,
    pub previous: Decimal,
    pub recent: Decimal,
    /// `None` when the previous month was zero and the recent one was not.
    pub percent_change: Option<Decimal>,
    pub direction: Direction,
}

impl TrendDelta {
    pub fn description(&self) -> String {
        let label = match self.metric {
            TrendMetric::Income => "Income",
            TrendMetric::Expenses => "Expenses",
        };
        match self.percent_change {
            Some(pct) => format!(
                "{} {} by {:.1}% from last month",
                label,
                if self.direction == Direction::Up {
                    "increased"
                } else {
                    "decreased"
                },
                pct.abs()
            ),
            None => format!("{} rose from zero last month", label),
        }
    }
}

fn delta(
    metric: TrendMetric,
    labels: (&str, &str),
    previous: Decimal,
    recent: Decimal,
) -> TrendDelta {
    let percent_change = if previous.is_zero() {
        if recent.is_zero() {
            Some(Decimal::ZERO)
        } else {
            None
        }
    } else {
        Some(percent_of(recent.saturating_sub(previous), previous))
    };
    let direction = match percent_change {
        Some(pct) if pct > Decimal::ZERO => Direction::Up,
        Some(_) => Direction::Down,
        None if recent > Decimal::ZERO => Direction::Up,
        None => Direction::Down,
    };
    TrendDelta {
        metric,
        previous_month: labels.0.to_string(),
        recent_month: labels.1.to_string(),
        previous,
        recent,
        percent_change,
        direction,
    }
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", year, month))
}

/// Income and expense change between the two most recent calendar months present.
///
/// Uses every transaction regardless of year. Empty when fewer than two months exist.
pub fn month_over_month_trend(transactions: &[Transaction]) -> Vec<TrendDelta> {
    let mut monthly: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let entry = monthly
            .entry((t.date.year(), t.date.month()))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.r#type {
            TxType::Income => entry.0 = entry.0.saturating_add(t.amount),
            TxType::Expense => entry.1 = entry.1.saturating_add(t.amount),
        }
    }
    let mut recent_two = monthly.iter().rev().take(2);
    let (Some((recent_key, recent)), Some((prev_key, prev))) =
        (recent_two.next(), recent_two.next())
    else {
        return Vec::new();
    };
    let prev_label = month_label(prev_key.0, prev_key.1);
    let recent_label = month_label(recent_key.0, recent_key.1);
    let labels = (prev_label.as_str(), recent_label.as_str());
    vec![
        delta(TrendMetric::Income, labels, prev.0, recent.0),
        delta(TrendMetric::Expenses, labels, prev.1, recent.1),
    ]
}

/// Monthly equivalent of one occurrence at `frequency`.
///
/// Weeks and fortnights use the fixed 4.33 / 2.17 factors.
pub fn monthly_equivalent(amount: Decimal, frequency: Frequency) -> Decimal {
    match frequency {
        Frequency::Weekly => amount.saturating_mul(Decimal::new(433, 2)),
        Frequency::BiWeekly => amount.saturating_mul(Decimal::new(217, 2)),
        Frequency::Monthly => amount,
        Frequency::Quarterly => amount / Decimal::from(3),
        Frequency::Yearly => amount / Decimal::from(12),
    }
}

/// Monthly total of active recurring definitions of `kind`.
pub fn recurring_monthly_total(recurring: &[RecurringTransaction], kind: TxType) -> Decimal {
    saturating_sum(
        recurring
            .iter()
            .filter(|r| r.is_active && r.r#type == kind)
            .map(|r| monthly_equivalent(r.amount, r.frequency)),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionStatus {
    Positive,
    Warning,
    Debt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trajectory {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub period: String,
    pub horizon_months: u32,
    pub projected_amount: Decimal,
    pub monthly_net: Decimal,
    pub status: ProjectionStatus,
    pub trajectory: Trajectory,
    pub confidence_percent: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectionInput {
    pub current_net_savings: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    pub recurring_monthly_income: Decimal,
    pub recurring_monthly_expenses: Decimal,
}

impl ProjectionInput {
    pub fn historical_monthly_net(&self) -> Decimal {
        self.monthly_income.saturating_sub(self.monthly_expenses)
    }

    pub fn projected_monthly_net(&self) -> Decimal {
        self.monthly_income
            .saturating_add(self.recurring_monthly_income)
            .saturating_sub(
                self.monthly_expenses
                    .saturating_add(self.recurring_monthly_expenses),
            )
    }
}

/// "3 months", "1 year", "10 years", ...
pub fn horizon_label(months: u32) -> String {
    if months > 0 && months % 12 == 0 {
        let years = months / 12;
        format!("{} year{}", years, if years == 1 { "" } else { "s" })
    } else {
        format!("{} month{}", months, if months == 1 { "" } else { "s" })
    }
}

/// Heuristic confidence in `[15, 90]`, non-increasing in `horizon`.
pub fn projection_confidence(horizon: u32, historical_net: Decimal, projected_net: Decimal) -> Decimal {
    let h = Decimal::from(horizon);
    let mut confidence = CONFIDENCE_CEIL
        .saturating_sub(h.saturating_mul(Decimal::new(12, 1)))
        .clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEIL);

    let drift = historical_net.saturating_sub(projected_net).abs();
    if drift > historical_net.abs() * Decimal::new(5, 1) {
        confidence -= Decimal::from(20);
    }
    if horizon > 12 {
        confidence -= Decimal::from(10);
    }
    if horizon > 24 {
        confidence -= Decimal::from(15);
    }
    if horizon > 60 {
        confidence -= Decimal::from(20);
    }
    confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEIL)
}

/// Linear balance projection for each horizon, in the order given.
pub fn project_future_balance(input: &ProjectionInput, horizons: &[u32]) -> Vec<Projection> {
    let monthly_net = input.projected_monthly_net();
    let historical = input.historical_monthly_net();
    let cushion = input.monthly_expenses.saturating_mul(Decimal::from(3));
    let trajectory = if monthly_net > Decimal::ZERO {
        Trajectory::Improving
    } else if monthly_net < Decimal::ZERO {
        Trajectory::Declining
    } else {
        Trajectory::Stable
    };

    horizons
        .iter()
        .map(|&h| {
            let projected_amount = input
                .current_net_savings
                .saturating_add(monthly_net.saturating_mul(Decimal::from(h)));
            let status = if projected_amount < Decimal::ZERO {
                ProjectionStatus::Debt
            } else if projected_amount < cushion {
                ProjectionStatus::Warning
            } else {
                ProjectionStatus::Positive
            };
            Projection {
                period: horizon_label(h),
                horizon_months: h,
                projected_amount,
                monthly_net,
                status,
                trajectory,
                confidence_percent: projection_confidence(h, historical, monthly_net),
            }
        })
        .collect()
}

/// Population standard deviation; zero for an empty slice.
///
/// Deviations are divided by the largest one before squaring, so the
/// squares stay within `[0, 1]` at any magnitude.
pub fn population_std_dev(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len());
    let mean = values
        .iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v / n));
    let deviations: Vec<Decimal> = values.iter().map(|v| v.saturating_sub(mean)).collect();
    let scale = deviations
        .iter()
        .map(|d| d.abs())
        .max()
        .unwrap_or(Decimal::ZERO);
    if scale.is_zero() {
        return Decimal::ZERO;
    }
    let scaled_variance = safe_div(
        saturating_sum(deviations.iter().map(|d| {
            let r = *d / scale;
            r * r
        })),
        n,
    );
    scale.saturating_mul(scaled_variance.sqrt().unwrap_or(Decimal::ZERO))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeStability {
    Stable,
    Variable,
}

pub fn income_stability(variability: Decimal) -> IncomeStability {
    if variability < INCOME_STABILITY_THRESHOLD {
        IncomeStability::Stable
    } else {
        IncomeStability::Variable
    }
}
