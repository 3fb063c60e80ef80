use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};

use crate::error::{Result, TrafficError};
use crate::time_utils::day_key;

/// The number of cars counted during one half-hour slot.
///
/// Immutable once built; [`TrafficRecord::new`] rejects negative counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TrafficRecord {
    /// Start of the counting slot, as written in the input.
    timestamp: NaiveDateTime,
    /// Cars seen during the slot.
    cars: u64,
}

impl TrafficRecord {
    /// Build a record, failing with [`TrafficError::Validation`] when
    /// `cars` is negative.
    pub fn new(timestamp: NaiveDateTime, cars: i64) -> Result<Self> {
        let cars = u64::try_from(cars).map_err(|_| TrafficError::Validation { line: None, cars })?;
        Ok(Self { timestamp, cars })
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn cars(&self) -> u64 {
        self.cars
    }

    /// Calendar day of the record as a `YYYY-MM-DD` key.
    pub fn day(&self) -> String {
        day_key(self.timestamp)
    }

    /// Ranking key for the busiest slots: most cars first, then earliest.
    pub fn busiest_key(&self) -> (Reverse<u64>, NaiveDateTime) {
        (Reverse(self.cars), self.timestamp)
    }

    /// Compare two records by [`busiest_key`](Self::busiest_key).
    pub fn cmp_busiest(&self, other: &Self) -> Ordering {
        self.busiest_key().cmp(&other.busiest_key())
    }
}

/// Total number of cars counted on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    /// Day key in `YYYY-MM-DD` form.
    pub day: String,
    pub total: u64,
}

impl DailyTotal {
    pub fn new(day: impl Into<String>, total: u64) -> Self {
        Self {
            day: day.into(),
            total,
        }
    }
}

/// Sort records chronologically, preserving input order among equal
/// timestamps.
pub fn sort_chronologically(records: &mut [TrafficRecord]) {
    records.sort_by_key(|r| r.timestamp);
}

/// Sum of `cars` over a run of records.
pub fn sum_cars<'a>(records: impl IntoIterator<Item = &'a TrafficRecord>) -> u64 {
    records.into_iter().map(|r| r.cars).sum()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
