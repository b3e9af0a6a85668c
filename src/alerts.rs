// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Short-lived user notifications with explicit expiry.
//!
//! Nothing runs in the background: callers pass the current time and the
//! queue drops alerts whose expiry has passed.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const DEFAULT_DURATION_MS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: u64,
    pub message: String,
    pub level: Level,
    pub created_at: DateTime<Utc>,
    /// `None` keeps the alert until it is removed.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Default)]
pub struct AlertQueue {
    alerts: Vec<Alert>,
    next_id: u64,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an alert; a non-positive `duration` makes it sticky.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        level: Level,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> u64 {
        self.next_id += 1;
        let expires_at = (duration > Duration::zero()).then(|| now + duration);
        self.alerts.push(Alert {
            id: self.next_id,
            message: message.into(),
            level,
            created_at: now,
            expires_at,
        });
        self.next_id
    }

    fn push_default(&mut self, message: impl Into<String>, level: Level) -> u64 {
        self.push(
            message,
            level,
            Duration::milliseconds(DEFAULT_DURATION_MS),
            Utc::now(),
        )
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push_default(message, Level::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push_default(message, Level::Error)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push_default(message, Level::Warning)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push_default(message, Level::Info)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }

    /// Drop expired alerts, returning how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.alerts.len();
        self.alerts.retain(|a| !a.is_expired(now));
        before - self.alerts.len()
    }

    pub fn active(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| !a.is_expired(now))
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
