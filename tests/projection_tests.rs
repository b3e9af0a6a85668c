// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::aggregator::{
    self, horizon_label, projection_confidence, ProjectionInput, ProjectionStatus, Trajectory,
    DEFAULT_HORIZONS,
};
use rust_decimal::Decimal;

fn input(current: i64, income: i64, expenses: i64) -> ProjectionInput {
    ProjectionInput {
        current_net_savings: Decimal::from(current),
        monthly_income: Decimal::from(income),
        monthly_expenses: Decimal::from(expenses),
        ..Default::default()
    }
}

#[test]
fn horizon_labels() {
    assert_eq!(horizon_label(1), "1 month");
    assert_eq!(horizon_label(3), "3 months");
    assert_eq!(horizon_label(12), "1 year");
    assert_eq!(horizon_label(18), "18 months");
    assert_eq!(horizon_label(120), "10 years");
}

#[test]
fn default_horizons_project_linearly() {
    let p = aggregator::project_future_balance(&input(1000, 500, 300), &DEFAULT_HORIZONS);
    assert_eq!(p.len(), 6);
    assert_eq!(p[0].period, "3 months");
    assert_eq!(p[0].projected_amount, Decimal::from(1600));
    assert_eq!(p[5].period, "10 years");
    assert_eq!(p[5].projected_amount, Decimal::from(25000));
    assert!(p.iter().all(|x| x.monthly_net == Decimal::from(200)));
    assert!(p.iter().all(|x| x.trajectory == Trajectory::Improving));
    assert!(p.iter().all(|x| x.status == ProjectionStatus::Positive));
}

#[test]
fn status_reflects_cushion_and_debt() {
    let debt = aggregator::project_future_balance(&input(0, 0, 100), &[3]);
    assert_eq!(debt[0].projected_amount, Decimal::from(-300));
    assert_eq!(debt[0].status, ProjectionStatus::Debt);
    assert_eq!(debt[0].trajectory, Trajectory::Declining);

    let thin = aggregator::project_future_balance(&input(100, 100, 100), &[6]);
    assert_eq!(thin[0].status, ProjectionStatus::Warning);
    assert_eq!(thin[0].trajectory, Trajectory::Stable);
}

#[test]
fn recurring_amounts_shift_projected_net() {
    let inp = ProjectionInput {
        recurring_monthly_income: Decimal::from(50),
        recurring_monthly_expenses: Decimal::from(20),
        ..input(0, 100, 100)
    };
    assert_eq!(inp.historical_monthly_net(), Decimal::ZERO);
    assert_eq!(inp.projected_monthly_net(), Decimal::from(30));
    let p = aggregator::project_future_balance(&inp, &[12]);
    assert_eq!(p[0].projected_amount, Decimal::from(360));
}

#[test]
fn confidence_is_bounded_and_non_increasing() {
    let mut last = Decimal::from(100);
    for h in 1..=150u32 {
        let c = projection_confidence(h, Decimal::from(200), Decimal::from(200));
        assert!(c >= Decimal::from(15) && c <= Decimal::from(90), "h={} c={}", h, c);
        assert!(c <= last, "confidence rose at h={}", h);
        last = c;
    }
}

#[test]
fn confidence_values() {
    let same = |h| projection_confidence(h, Decimal::from(100), Decimal::from(100));
    assert_eq!(same(3), Decimal::new(864, 1));
    assert_eq!(same(12), Decimal::new(756, 1));
    assert_eq!(same(24), Decimal::new(512, 1));
    assert_eq!(same(60), Decimal::from(15));

    // projected net drifts more than half of the historical net
    let drifted = projection_confidence(3, Decimal::from(100), Decimal::from(200));
    assert_eq!(drifted, Decimal::new(664, 1));
}
