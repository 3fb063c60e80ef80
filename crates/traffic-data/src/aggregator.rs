//! Running total and per-day totals of counted cars.

use std::collections::BTreeMap;

use traffic_core::models::{sum_cars, DailyTotal, TrafficRecord};

// ── CountAggregator ───────────────────────────────────────────────────────────

/// Incremental grand total and per-day totals.
///
/// Days are keyed by their `YYYY-MM-DD` string so the map iterates in
/// calendar order.
#[derive(Debug, Clone, Default)]
pub struct CountAggregator {
    total: u64,
    daily: BTreeMap<String, u64>,
}

impl CountAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one record.
    pub fn add(&mut self, record: &TrafficRecord) {
        self.total += record.cars();
        *self.daily.entry(record.day()).or_insert(0) += record.cars();
    }

    /// Grand total so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct days seen so far.
    pub fn day_count(&self) -> usize {
        self.daily.len()
    }

    /// Consume the aggregator, returning the total and the per-day totals
    /// sorted ascending by day.
    pub fn finish(self) -> (u64, Vec<DailyTotal>) {
        let per_day = self
            .daily
            .into_iter()
            .map(|(day, total)| DailyTotal::new(day, total))
            .collect();
        (self.total, per_day)
    }
}

impl<'a> Extend<&'a TrafficRecord> for CountAggregator {
    fn extend<T: IntoIterator<Item = &'a TrafficRecord>>(&mut self, iter: T) {
        for record in iter {
            self.add(record);
        }
    }
}

// ── Batch helpers ─────────────────────────────────────────────────────────────

/// Sum of cars over all records.
pub fn total_cars(records: &[TrafficRecord]) -> u64 {
    sum_cars(records)
}

/// Per-day totals, sorted ascending by day.
pub fn totals_by_day(records: &[TrafficRecord]) -> Vec<DailyTotal> {
    let mut aggregator = CountAggregator::new();
    aggregator.extend(records);
    aggregator.finish().1
}

// ── Tests ─────────────────────────────────────────────────────────────────────
