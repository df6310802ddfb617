use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Day keys older than this many days before "today" are pruned on flush.
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Per-day, per-project accumulated seconds.
///
/// Day keys are `YYYY-MM-DD`, so their lexicographic order is chronological
/// and the outer `BTreeMap` stays date-sorted. Mutated only by flush.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeLedger {
    days: BTreeMap<String, HashMap<String, f64>>,
}

impl TimeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day_key(date: NaiveDate) -> String {
        date.format(DAY_KEY_FORMAT).to_string()
    }

    /// Adds `seconds` to `project`'s bucket for `today`. Non-positive amounts
    /// are ignored; the sub-second noise filter lives upstream in the tracker.
    pub fn record(&mut self, today: NaiveDate, project: &str, seconds: f64) {
        if seconds <= 0.0 {
            return;
        }
        let bucket = self
            .days
            .entry(Self::day_key(today))
            .or_default()
            .entry(project.to_string())
            .or_insert(0.0);
        *bucket += seconds;
    }

    pub fn seconds_for(&self, date: NaiveDate, project: &str) -> f64 {
        self.days
            .get(&Self::day_key(date))
            .and_then(|bucket| bucket.get(project))
            .copied()
            .unwrap_or(0.0)
    }

    /// Drops day keys strictly older than `today - retention_days`. An entry
    /// exactly at the cutoff is kept.
    pub fn prune(&mut self, today: NaiveDate, retention_days: i64) {
        let cutoff = Self::day_key(today - Duration::days(retention_days));
        self.days = self.days.split_off(&cutoff);
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn days(&self) -> &BTreeMap<String, HashMap<String, f64>> {
        &self.days
    }
}
