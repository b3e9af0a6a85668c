// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Narrative analysis layered on the aggregator: insight messages,
//! recommendations, spending alerts and a health score.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregator::{
    self, BudgetStatus, BudgetVariance, CategoryBreakdown, CategorySpend, IncomeStability,
    Insights, Projection, ProjectionInput, TrendDelta, DEFAULT_HORIZONS,
};
use crate::models::{AppState, Transaction, TxType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingPatterns {
    pub breakdown: CategoryBreakdown,
    pub top_category: Option<(String, CategorySpend)>,
    pub average_expense: Decimal,
}

pub fn spending_patterns(transactions: &[Transaction], year: i32) -> SpendingPatterns {
    let breakdown = aggregator::category_breakdown(transactions, year);
    let top_category =
        aggregator::top_spending_category(&breakdown).map(|(n, s)| (n.to_string(), *s));
    let (total, count) = breakdown.values().fold((Decimal::ZERO, 0usize), |acc, s| {
        (acc.0.saturating_add(s.total), acc.1 + s.count)
    });
    SpendingPatterns {
        breakdown,
        top_category,
        average_expense: aggregator::safe_div(total, Decimal::from(count)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomePatterns {
    /// Income per calendar month (1-12) that had any.
    pub monthly_income: BTreeMap<u32, Decimal>,
    pub variability: Decimal,
    pub average_monthly_income: Decimal,
    pub stability: IncomeStability,
}

pub fn income_patterns(transactions: &[Transaction], year: i32) -> IncomePatterns {
    let mut monthly_income: BTreeMap<u32, Decimal> = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.date.year() == year && t.r#type == TxType::Income)
    {
        let slot = monthly_income.entry(t.date.month()).or_insert(Decimal::ZERO);
        *slot = slot.saturating_add(t.amount);
    }
    let values: Vec<Decimal> = monthly_income.values().copied().collect();
    let variability = if values.len() > 1 {
        aggregator::population_std_dev(&values)
    } else {
        Decimal::ZERO
    };
    let average_monthly_income = aggregator::safe_div(
        aggregator::saturating_sum(values.iter().copied()),
        Decimal::from(values.len()),
    );
    IncomePatterns {
        monthly_income,
        variability,
        average_monthly_income,
        stability: aggregator::income_stability(variability),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Neutral,
    Warning,
    Negative,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub tone: Tone,
    pub title: String,
    pub description: String,
}

fn insight(tone: Tone, title: &str, description: String) -> Insight {
    Insight {
        tone,
        title: title.to_string(),
        description,
    }
}

pub fn insight_messages(
    insights: &Insights,
    spending: &SpendingPatterns,
    income: &IncomePatterns,
) -> Vec<Insight> {
    let mut out = Vec::new();
    let rate = insights.savings_rate;
    if rate >= Decimal::from(20) {
        out.push(insight(
            Tone::Positive,
            "Excellent Savings Rate",
            format!(
                "Your savings rate of {:.1}% is excellent! You're on track for strong financial health.",
                rate
            ),
        ));
    } else if rate >= Decimal::from(10) {
        out.push(insight(
            Tone::Neutral,
            "Good Savings Rate",
            format!(
                "Your savings rate of {:.1}% is good. Consider increasing it to 20% for optimal financial health.",
                rate
            ),
        ));
    } else if rate > Decimal::ZERO {
        out.push(insight(
            Tone::Warning,
            "Low Savings Rate",
            format!(
                "Your savings rate of {:.1}% is below recommended levels. Aim for at least 10-20%.",
                rate
            ),
        ));
    } else {
        out.push(insight(
            Tone::Negative,
            "Negative Savings",
            "You're spending more than you earn. This is unsustainable and needs immediate attention."
                .to_string(),
        ));
    }

    if let Some((name, spend)) = &spending.top_category {
        let share = aggregator::percent_of(spend.total, insights.total_expenses);
        out.push(insight(
            Tone::Info,
            "Top Spending Category",
            format!(
                "{} accounts for {:.1}% of your total expenses ({:.2}).",
                name, share, spend.total
            ),
        ));
    }

    match income.stability {
        IncomeStability::Stable => out.push(insight(
            Tone::Positive,
            "Stable Income",
            "Your income is relatively stable month-to-month, which is great for financial planning."
                .to_string(),
        )),
        IncomeStability::Variable => out.push(insight(
            Tone::Warning,
            "Variable Income",
            "Your income varies significantly. Consider building a larger emergency fund."
                .to_string(),
        )),
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub action: String,
}

fn recommendation(priority: Priority, title: String, description: String, action: String) -> Recommendation {
    Recommendation {
        priority,
        title,
        description,
        action,
    }
}

/// Suggestions shown before there is enough data to analyse.
pub fn starter_recommendations() -> Vec<Recommendation> {
    vec![
        recommendation(
            Priority::High,
            "Start Tracking Your Finances".into(),
            "Add your income and expense transactions to get personalized recommendations.".into(),
            "Record transactions with `cashflow tx add`".into(),
        ),
        recommendation(
            Priority::Medium,
            "Set Up Recurring Transactions".into(),
            "Automate tracking of regular income and expenses like salary, rent, and subscriptions."
                .into(),
            "Define them with `cashflow recurring add`".into(),
        ),
        recommendation(
            Priority::Medium,
            "Create Budget Categories".into(),
            "Set budgets for different expense categories to track your spending limits.".into(),
            "Use `cashflow category budget` to set limits".into(),
        ),
    ]
}

pub fn recommendations(
    insights: &Insights,
    spending: &SpendingPatterns,
    budget: &[BudgetVariance],
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if insights.savings_rate < Decimal::from(10) {
        out.push(recommendation(
            Priority::High,
            "Increase Your Savings Rate".into(),
            "Try to save at least 10-20% of your income. Start by reviewing your largest expense categories.".into(),
            "Review and reduce discretionary spending".into(),
        ));
    }

    let over = budget
        .iter()
        .filter(|b| b.status == BudgetStatus::Over && b.budgeted > Decimal::ZERO)
        .count();
    if over > 0 {
        out.push(recommendation(
            Priority::Medium,
            "Budget Overruns Detected".into(),
            format!(
                "You've exceeded budgets in {} categories. Consider adjusting budgets or reducing spending.",
                over
            ),
            "Review budget allocations".into(),
        ));
    }

    if let Some((name, spend)) = &spending.top_category {
        let share = aggregator::safe_div(spend.total, insights.total_expenses);
        if share > Decimal::new(4, 1) {
            out.push(recommendation(
                Priority::Medium,
                format!("Optimize {} Spending", name),
                format!(
                    "{} represents a large portion of your expenses. Look for optimization opportunities.",
                    name
                ),
                format!("Review {} transactions for potential savings", name),
            ));
        }
    }

    if insights.net_savings > Decimal::ZERO {
        let monthly_expenses = insights.total_expenses / Decimal::from(12);
        if monthly_expenses > Decimal::ZERO
            && aggregator::safe_div(insights.net_savings, monthly_expenses) < Decimal::from(3)
        {
            out.push(recommendation(
                Priority::High,
                "Build Emergency Fund".into(),
                "Aim to save 3-6 months of expenses for emergencies. You currently have less than 3 months covered.".into(),
                "Prioritize emergency fund savings".into(),
            ));
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingAlert {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

/// Critical overruns (more than 50% over budget) and unusually large expenses
/// (above three times the average expense of the year).
pub fn spending_alerts(
    transactions: &[Transaction],
    year: i32,
    spending: &SpendingPatterns,
    budget: &[BudgetVariance],
) -> Vec<SpendingAlert> {
    let mut out: Vec<SpendingAlert> = budget
        .iter()
        .filter(|b| b.status == BudgetStatus::Over && b.performance_percent < Decimal::from(-50))
        .map(|b| SpendingAlert {
            severity: Severity::Danger,
            title: format!("Critical Budget Overrun: {}", b.category),
            description: format!(
                "You've spent {:.1}% more than budgeted in {}.",
                b.performance_percent.abs(),
                b.category
            ),
        })
        .collect();

    let threshold = spending.average_expense.saturating_mul(Decimal::from(3));
    let high_value = transactions
        .iter()
        .filter(|t| t.date.year() == year && t.r#type == TxType::Expense && t.amount > threshold)
        .count();
    if high_value > 0 {
        out.push(SpendingAlert {
            severity: Severity::Warning,
            title: "Unusual High-Value Transactions".into(),
            description: format!(
                "{} transactions are significantly above your average spending.",
                high_value
            ),
        });
    }
    out
}

/// `savings_rate + 50`, clamped to `[0, 100]`.
pub fn health_score(insights: &Insights) -> Decimal {
    insights
        .savings_rate
        .saturating_add(Decimal::from(50))
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Projection inputs derived from a year's insights and the recurring definitions.
pub fn projection_input(insights: &Insights, state: &AppState) -> ProjectionInput {
    ProjectionInput {
        current_net_savings: insights.net_savings,
        monthly_income: insights.total_income / Decimal::from(12),
        monthly_expenses: insights.total_expenses / Decimal::from(12),
        recurring_monthly_income: aggregator::recurring_monthly_total(
            &state.recurring_transactions,
            TxType::Income,
        ),
        recurring_monthly_expenses: aggregator::recurring_monthly_total(
            &state.recurring_transactions,
            TxType::Expense,
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub insights: Insights,
    pub health_score: Decimal,
    pub spending: SpendingPatterns,
    pub income: IncomePatterns,
    pub budget: Vec<BudgetVariance>,
    pub trends: Vec<TrendDelta>,
    pub messages: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
    pub alerts: Vec<SpendingAlert>,
    pub projections: Vec<Projection>,
}

/// Full analysis of `state.current_year`. Category totals are recomputed, not trusted.
pub fn analyze(state: &AppState) -> AnalysisReport {
    let year = state.current_year;
    let txs = &state.transactions;
    let insights = aggregator::yearly_insights(txs, state.fixed_income, state.fixed_expenses, year);
    let spending = spending_patterns(txs, year);
    let income = income_patterns(txs, year);
    let categories = aggregator::update_category_totals(&state.expense_categories, txs, year);
    let budget = aggregator::budget_variance(&categories);

    let messages = insight_messages(&insights, &spending, &income);
    let recs = if txs.len() < 3 {
        starter_recommendations()
    } else {
        recommendations(&insights, &spending, &budget)
    };
    let alerts = spending_alerts(txs, year, &spending, &budget);
    let projections =
        aggregator::project_future_balance(&projection_input(&insights, state), &DEFAULT_HORIZONS);

    AnalysisReport {
        health_score: health_score(&insights),
        trends: aggregator::month_over_month_trend(txs),
        insights,
        spending,
        income,
        budget,
        messages,
        recommendations: recs,
        alerts,
        projections,
    }
}
