// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::aggregator::{monthly_equivalent, recurring_monthly_total};
use cashflow::models::{Frequency, RecurringTransaction, TxType};
use cashflow::recurring::{generate_transactions, month_start, monthly_summary, toggle};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn def(id: i64, kind: TxType, amount: i64, frequency: Frequency, active: bool) -> RecurringTransaction {
    RecurringTransaction {
        id,
        name: format!("Def {}", id),
        r#type: kind,
        category: "Housing".into(),
        amount: Decimal::from(amount),
        frequency,
        start_date: None,
        is_active: active,
        description: "recurring".into(),
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn monthly_equivalents() {
    assert_eq!(
        monthly_equivalent(Decimal::from(100), Frequency::Monthly),
        Decimal::from(100)
    );
    assert_eq!(
        monthly_equivalent(Decimal::from(50), Frequency::Weekly),
        Decimal::new(2165, 1)
    );
    assert_eq!(
        monthly_equivalent(Decimal::from(100), Frequency::BiWeekly),
        Decimal::from(217)
    );
    assert_eq!(
        monthly_equivalent(Decimal::from(300), Frequency::Quarterly),
        Decimal::from(100)
    );
    assert_eq!(
        monthly_equivalent(Decimal::from(1200), Frequency::Yearly),
        Decimal::from(100)
    );
}

#[test]
fn monthly_total_skips_inactive_and_other_type() {
    let defs = vec![
        def(1, TxType::Expense, 100, Frequency::Monthly, true),
        def(2, TxType::Expense, 1200, Frequency::Yearly, true),
        def(3, TxType::Expense, 999, Frequency::Monthly, false),
        def(4, TxType::Income, 3000, Frequency::Monthly, true),
    ];
    assert_eq!(
        recurring_monthly_total(&defs, TxType::Expense),
        Decimal::from(200)
    );
    assert_eq!(
        recurring_monthly_total(&defs, TxType::Income),
        Decimal::from(3000)
    );
    assert_eq!(recurring_monthly_total(&[], TxType::Income), Decimal::ZERO);
}

#[test]
fn generation_dates_first_of_month_and_links_definition() {
    let mut later = def(3, TxType::Expense, 40, Frequency::Monthly, true);
    later.start_date = Some(date("2025-06-01"));
    let defs = vec![
        def(1, TxType::Expense, 1200, Frequency::Monthly, true),
        def(2, TxType::Income, 500, Frequency::Monthly, false),
        later,
        def(4, TxType::Income, 3000, Frequency::Weekly, true),
    ];
    let out = generate_transactions(&defs, date("2025-05-20"), 10).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|t| t.date == date("2025-05-01")));
    assert!(out.iter().all(|t| t.recurring));
    assert_eq!(out[0].id, 10);
    assert_eq!(out[0].recurring_id, Some(1));
    assert_eq!(out[0].description, "Def 1 (Recurring)");
    assert_eq!(out[1].id, 11);
    assert_eq!(out[1].recurring_id, Some(4));
    assert_eq!(out[1].amount, Decimal::from(3000));

    let june = generate_transactions(&defs, date("2025-06-30"), 1).unwrap();
    assert_eq!(june.len(), 3);
}

#[test]
fn toggling_flips_active_flag() {
    let mut defs = vec![def(1, TxType::Expense, 10, Frequency::Monthly, true)];
    assert_eq!(toggle(&mut defs, 1), Some(false));
    assert_eq!(toggle(&mut defs, 1), Some(true));
    assert_eq!(toggle(&mut defs, 9), None);
}

#[test]
fn summary_counts_monthly_definitions_only() {
    let defs = vec![
        def(1, TxType::Income, 4000, Frequency::Monthly, true),
        def(2, TxType::Expense, 1500, Frequency::Monthly, true),
        def(3, TxType::Expense, 1200, Frequency::Yearly, true),
        def(4, TxType::Expense, 100, Frequency::Monthly, false),
    ];
    let s = monthly_summary(&defs);
    assert_eq!(s.income, Decimal::from(4000));
    assert_eq!(s.expenses, Decimal::from(1500));
    assert_eq!(s.net, Decimal::from(2500));
    assert_eq!(month_start(date("2025-02-28")), date("2025-02-01"));
}

#[test]
fn generation_reports_exhausted_ids() {
    let defs = vec![
        def(1, TxType::Expense, 10, Frequency::Monthly, true),
        def(2, TxType::Expense, 20, Frequency::Monthly, true),
    ];
    assert!(generate_transactions(&defs, date("2025-05-20"), i64::MAX).is_err());
    let last = generate_transactions(&defs[..1], date("2025-05-20"), i64::MAX).unwrap();
    assert_eq!(last[0].id, i64::MAX);
}
