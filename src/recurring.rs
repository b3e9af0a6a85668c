// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::saturating_sum;
use crate::error::Result;
use crate::models::{nth_id, Frequency, RecurringTransaction, Transaction, TxType};

/// First day of the month containing `today`.
pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// One concrete transaction per active definition, dated the first of the
/// current month. Ids are assigned sequentially from `first_id`.
///
/// Definitions that start after that date are skipped.
pub fn generate_transactions(
    recurring: &[RecurringTransaction],
    today: NaiveDate,
    first_id: i64,
) -> Result<Vec<Transaction>> {
    let date = month_start(today);
    recurring
        .iter()
        .filter(|r| r.is_active)
        .filter(|r| match r.start_date {
            Some(start) if start > date => {
                debug!(id = r.id, %start, "recurring definition not started yet");
                false
            }
            _ => true,
        })
        .enumerate()
        .map(|(idx, r)| {
            Ok(Transaction {
                id: nth_id(first_id, idx)?,
                date,
                r#type: r.r#type,
                category: r.category.clone(),
                amount: r.amount,
                description: format!("{} (Recurring)", r.name),
                recurring: true,
                recurring_id: Some(r.id),
            })
        })
        .collect()
}

/// Flip `is_active` for the definition with `id`, returning the new value.
pub fn toggle(recurring: &mut [RecurringTransaction], id: i64) -> Option<bool> {
    let def = recurring.iter_mut().find(|r| r.id == id)?;
    def.is_active = !def.is_active;
    Some(def.is_active)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

/// Totals of active, monthly-frequency definitions only.
pub fn monthly_summary(recurring: &[RecurringTransaction]) -> MonthlySummary {
    let of = |kind: TxType| {
        saturating_sum(
            recurring
                .iter()
                .filter(|r| r.is_active && r.frequency == Frequency::Monthly && r.r#type == kind)
                .map(|r| r.amount),
        )
    };
    let income = of(TxType::Income);
    let expenses = of(TxType::Expense);
    MonthlySummary {
        income,
        expenses,
        net: income.saturating_sub(expenses),
    }
}
