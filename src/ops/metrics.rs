//! src/ops/metrics.rs
//!
//! Counters for watchdog activity.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub const WINDOWS_STARTED: &str = "windows_started";
/// Bumped on every close, whether by `stop` or by threshold expiry.
pub const WINDOWS_CLOSED: &str = "windows_closed";
pub const ALERTS_FIRED: &str = "alerts_fired";
pub const ALERTS_DELIVERED: &str = "alerts_delivered";
pub const ALERT_FAILURES: &str = "alert_failures";

/// Thread-safe named counters. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    counters: Arc<Mutex<HashMap<&'static str, u64>>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_count(&self, name: &'static str) {
        *self.counters.lock().entry(name).or_insert(0) += 1;
    }

    /// Returns 0 for counters never incremented.
    pub fn get_count(&self, name: &str) -> u64 {
        self.counters.lock().get(name).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> HashMap<&'static str, u64> {
        self.counters.lock().clone()
    }
}
