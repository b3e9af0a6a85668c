// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{RecurringTransaction, Transaction};

pub const MAX_AMOUNT: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 0);

/// Field name -> messages. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn extend(&mut self, field: &'static str, messages: Vec<String>) {
        if !messages.is_empty() {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msgs)| format!("{}: {}", field, msgs.join(", ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

pub fn validate_amount(amount: Decimal) -> Vec<String> {
    if amount < Decimal::ZERO {
        vec!["Amount cannot be negative".into()]
    } else if amount > MAX_AMOUNT {
        vec!["Amount is too large".into()]
    } else {
        Vec::new()
    }
}

/// Like [`validate_amount`] but also rejects text that is not a number.
pub fn validate_amount_text(raw: &str) -> Vec<String> {
    match raw.trim().parse::<Decimal>() {
        Ok(d) => validate_amount(d),
        Err(_) => vec!["Amount must be a valid number".into()],
    }
}

pub fn validate_date(date: Option<NaiveDate>, today: NaiveDate) -> Vec<String> {
    let Some(date) = date else {
        return vec!["Date is required".into()];
    };
    if date > today {
        vec!["Date cannot be in the future".into()]
    } else if date < NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN) {
        vec!["Date is too far in the past".into()]
    } else {
        Vec::new()
    }
}

/// Length check on the trimmed value, counted in characters.
pub fn validate_text(value: &str, min: usize, max: usize) -> Vec<String> {
    let len = value.trim().chars().count();
    if len == 0 {
        vec!["This field is required".into()]
    } else if len < min {
        vec![format!("Minimum {} characters required", min)]
    } else if len > max {
        vec![format!("Maximum {} characters allowed", max)]
    } else {
        Vec::new()
    }
}

pub fn validate_transaction(tx: &Transaction, today: NaiveDate) -> ValidationErrors {
    let mut errs = ValidationErrors::default();
    errs.extend("amount", validate_amount(tx.amount));
    errs.extend("description", validate_text(&tx.description, 1, 100));
    errs.extend("date", validate_date(Some(tx.date), today));
    errs.extend("category", validate_text(&tx.category, 1, 50));
    errs
}

pub fn validate_category(name: &str, budgeted: Decimal) -> ValidationErrors {
    let mut errs = ValidationErrors::default();
    errs.extend("name", validate_text(name, 1, 50));
    errs.extend("budgeted", validate_amount(budgeted));
    errs
}

pub fn validate_recurring(def: &RecurringTransaction) -> ValidationErrors {
    let mut errs = ValidationErrors::default();
    errs.extend("name", validate_text(&def.name, 1, 100));
    errs.extend("amount", validate_amount(def.amount));
    errs.extend("description", validate_text(&def.description, 1, 100));
    errs.extend("category", validate_text(&def.category, 1, 50));
    errs
}
