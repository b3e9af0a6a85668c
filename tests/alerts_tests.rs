// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::alerts::{AlertQueue, Level, DEFAULT_DURATION_MS};
use chrono::{Duration, TimeZone, Utc};

#[test]
fn alerts_expire_after_their_duration() {
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let mut q = AlertQueue::new();
    let id = q.push(
        "Saved",
        Level::Success,
        Duration::milliseconds(DEFAULT_DURATION_MS),
        t0,
    );
    assert_eq!(id, 1);
    assert_eq!(q.active(t0 + Duration::seconds(4)).count(), 1);
    assert_eq!(q.active(t0 + Duration::seconds(5)).count(), 0);

    assert_eq!(q.prune(t0 + Duration::seconds(6)), 1);
    assert!(q.is_empty());
}

#[test]
fn zero_duration_is_sticky_until_removed() {
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let mut q = AlertQueue::new();
    let sticky = q.push("Read me", Level::Warning, Duration::zero(), t0);
    let short = q.push("Gone soon", Level::Info, Duration::seconds(1), t0);
    assert_ne!(sticky, short);

    let later = t0 + Duration::days(30);
    let active: Vec<_> = q.active(later).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].message, "Read me");
    assert_eq!(active[0].level, Level::Warning);

    assert!(q.remove(sticky));
    assert!(!q.remove(sticky));
    assert_eq!(q.len(), 1);
    q.clear();
    assert!(q.is_empty());
}

#[test]
fn convenience_helpers_set_level() {
    let mut q = AlertQueue::new();
    q.success("a");
    q.error("b");
    q.warning("c");
    q.info("d");
    let levels: Vec<Level> = q.active(Utc::now()).map(|a| a.level).collect();
    assert_eq!(
        levels,
        vec![Level::Success, Level::Error, Level::Warning, Level::Info]
    );
    for level in levels {
        assert_eq!(
            serde_json::to_value(level).unwrap(),
            serde_json::Value::String(level.to_string())
        );
    }
    assert_eq!(Level::Success.to_string(), "success");
}
