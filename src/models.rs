// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::aggregator;
use crate::error::Error;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Income => f.write_str("income"),
            TxType::Expense => f.write_str("expense"),
        }
    }
}

impl FromStr for TxType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            _ => Err(Error::InvalidValue(format!(
                "Transaction type must be either income or expense, got '{}'",
                s.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "bi-weekly" | "biweekly" => Ok(Frequency::BiWeekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(Error::InvalidValue(format!(
                "Please select a valid frequency (weekly, bi-weekly, monthly, quarterly, yearly), got '{}'",
                s.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(Error::InvalidValue(format!(
                "Theme must be light or dark, got '{}'",
                s.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, deserialize_with = "de_id")]
    pub id: i64,
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    pub r#type: TxType,
    #[serde(default, deserialize_with = "de_text")]
    pub category: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "de_text")]
    pub description: String,
    #[serde(default)]
    pub recurring: bool,
    #[serde(
        default,
        deserialize_with = "de_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub recurring_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    #[serde(default, deserialize_with = "de_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    pub r#type: TxType,
    #[serde(default, deserialize_with = "de_text")]
    pub category: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: Decimal,
    pub frequency: Frequency,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de_text")]
    pub description: String,
}

fn active_by_default() -> bool {
    true
}

/// Category whose running total is derived from transactions of one type.
pub trait BudgetLine: Clone {
    const KIND: TxType;

    fn name(&self) -> &str;
    fn budgeted(&self) -> Decimal;
    fn total(&self) -> Decimal;
    fn with_total(&self, total: Decimal) -> Self;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    #[serde(deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub budgeted: Decimal,
    #[serde(default, deserialize_with = "de_amount")]
    pub spent: Decimal,
}

impl ExpenseCategory {
    pub fn new(name: impl Into<String>, budgeted: Decimal) -> Self {
        Self {
            name: name.into(),
            budgeted,
            spent: Decimal::ZERO,
        }
    }
}

impl BudgetLine for ExpenseCategory {
    const KIND: TxType = TxType::Expense;

    fn name(&self) -> &str {
        &self.name
    }
    fn budgeted(&self) -> Decimal {
        self.budgeted
    }
    fn total(&self) -> Decimal {
        self.spent
    }
    fn with_total(&self, total: Decimal) -> Self {
        Self {
            spent: total,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeCategory {
    #[serde(deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub budgeted: Decimal,
    #[serde(default, deserialize_with = "de_amount")]
    pub actual: Decimal,
}

impl IncomeCategory {
    pub fn new(name: impl Into<String>, budgeted: Decimal) -> Self {
        Self {
            name: name.into(),
            budgeted,
            actual: Decimal::ZERO,
        }
    }
}

impl BudgetLine for IncomeCategory {
    const KIND: TxType = TxType::Income;

    fn name(&self) -> &str {
        &self.name
    }
    fn budgeted(&self) -> Decimal {
        self.budgeted
    }
    fn total(&self) -> Decimal {
        self.actual
    }
    fn with_total(&self, total: Decimal) -> Self {
        Self {
            actual: total,
            ..self.clone()
        }
    }
}

/// One row of the legacy twelve-month sheet. Persisted, never aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthEntry {
    #[serde(deserialize_with = "de_text")]
    pub month: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub variable_income: Decimal,
    #[serde(default, deserialize_with = "de_amount")]
    pub variable_expenses: Decimal,
    #[serde(default, deserialize_with = "de_text")]
    pub comments: String,
}

pub fn initial_months() -> Vec<MonthEntry> {
    MONTH_NAMES
        .iter()
        .map(|m| MonthEntry {
            month: m.to_string(),
            variable_income: Decimal::ZERO,
            variable_expenses: Decimal::ZERO,
            comments: String::new(),
        })
        .collect()
}

pub const PRESET_EXPENSE_CATEGORIES: [&str; 12] = [
    "Housing",
    "Food & Dining",
    "Transportation",
    "Healthcare",
    "Entertainment",
    "Shopping",
    "Education",
    "Utilities",
    "Insurance",
    "Savings & Investments",
    "Debt Payments",
    "Other",
];

pub const PRESET_INCOME_CATEGORIES: [&str; 6] = [
    "Salary",
    "Freelance",
    "Business",
    "Investments",
    "Rental",
    "Other",
];

pub fn default_expense_categories() -> Vec<ExpenseCategory> {
    ["Housing", "Food & Dining", "Transportation"]
        .into_iter()
        .map(|n| ExpenseCategory::new(n, Decimal::ZERO))
        .collect()
}

pub fn default_income_categories() -> Vec<IncomeCategory> {
    ["Salary", "Freelance"]
        .into_iter()
        .map(|n| IncomeCategory::new(n, Decimal::ZERO))
        .collect()
}

fn this_year() -> i32 {
    chrono::Local::now().year()
}

/// Everything the application persists, keyed the same way on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default, deserialize_with = "de_amount")]
    pub fixed_income: Decimal,
    #[serde(default, deserialize_with = "de_amount")]
    pub fixed_expenses: Decimal,
    #[serde(default = "initial_months")]
    pub months: Vec<MonthEntry>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub recurring_transactions: Vec<RecurringTransaction>,
    #[serde(default = "default_expense_categories")]
    pub expense_categories: Vec<ExpenseCategory>,
    #[serde(default = "default_income_categories")]
    pub income_categories: Vec<IncomeCategory>,
    #[serde(default = "this_year")]
    pub current_year: i32,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            fixed_income: Decimal::ZERO,
            fixed_expenses: Decimal::ZERO,
            months: initial_months(),
            transactions: Vec::new(),
            recurring_transactions: Vec::new(),
            expense_categories: default_expense_categories(),
            income_categories: default_income_categories(),
            current_year: this_year(),
            theme: Theme::default(),
        }
    }
}

impl AppState {
    pub fn next_transaction_id(&self) -> crate::error::Result<i64> {
        nth_id(self.transactions.iter().map(|t| t.id).max().unwrap_or(0), 1)
    }

    pub fn next_recurring_id(&self) -> crate::error::Result<i64> {
        nth_id(
            self.recurring_transactions
                .iter()
                .map(|r| r.id)
                .max()
                .unwrap_or(0),
            1,
        )
    }

    /// Recompute derived category totals for `current_year`. Call after every mutation.
    pub fn refresh(&mut self) {
        self.expense_categories = aggregator::update_category_totals(
            &self.expense_categories,
            &self.transactions,
            self.current_year,
        );
        self.income_categories = aggregator::update_category_totals(
            &self.income_categories,
            &self.transactions,
            self.current_year,
        );
    }

    pub fn has_category(&self, kind: TxType, name: &str) -> bool {
        match kind {
            TxType::Expense => self.expense_categories.iter().any(|c| c.name == name),
            TxType::Income => self.income_categories.iter().any(|c| c.name == name),
        }
    }
}

/// `base + offset`, or an error once ids run past `i64::MAX`.
pub fn nth_id(base: i64, offset: usize) -> crate::error::Result<i64> {
    i64::try_from(offset)
        .ok()
        .and_then(|o| base.checked_add(o))
        .ok_or_else(|| Error::InvalidValue(format!("no ids left after {}", base)))
}

/// Backup file layout: the state plus export metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle<'a> {
    pub version: &'a str,
    pub export_date: DateTime<Utc>,
    #[serde(flatten)]
    pub state: &'a AppState,
}

/// Parse a user or file supplied amount. Non-numeric input becomes zero.
pub fn coerce_amount(raw: &str) -> Decimal {
    let s = raw.trim().trim_start_matches('$').replace(',', "");
    if s.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .unwrap_or(Decimal::ZERO)
}

pub fn coerce_value(v: &Value) -> Decimal {
    match v {
        Value::Number(n) => coerce_amount(&n.to_string()),
        Value::String(s) => coerce_amount(s),
        _ => Decimal::ZERO,
    }
}

/// Accepts `YYYY-MM-DD` or any ISO-8601 timestamp starting with one.
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Stored amounts are never negative; anything below zero reads as zero.
fn de_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(coerce_value(&v).max(Decimal::ZERO))
}

fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn id_from_value(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(id_from_value(&v).unwrap_or(0))
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(id_from_value(&v))
}

fn de_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let s = String::deserialize(d)?;
    parse_stored_date(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s)))
}

fn de_opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let v = Value::deserialize(d)?;
    match v {
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_stored_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
        _ => Ok(None),
    }
}
