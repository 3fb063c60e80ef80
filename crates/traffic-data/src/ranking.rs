//! Selection of the busiest half-hour slots.
//!
//! Records rank by most cars first, then earliest timestamp. The batch and
//! incremental forms produce the same list for any input order.

use std::cmp::Ordering;

use traffic_core::error::{Result, TrafficError};
use traffic_core::models::TrafficRecord;

fn check_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(TrafficError::Config("top limit must be positive".to_string()));
    }
    Ok(())
}

/// The `limit` busiest records of a collection.
pub fn top_half_hours(records: &[TrafficRecord], limit: usize) -> Result<Vec<TrafficRecord>> {
    check_limit(limit)?;
    let mut ranked = records.to_vec();
    ranked.sort_by(TrafficRecord::cmp_busiest);
    ranked.truncate(limit);
    Ok(ranked)
}

// ── TopK ──────────────────────────────────────────────────────────────────────

/// Bounded, always-sorted buffer of the busiest records seen so far.
///
/// Holds at most `limit` entries between calls. Among records with equal
/// keys the one pushed first stays ahead, matching a stable sort.
#[derive(Debug, Clone)]
pub struct TopK {
    limit: usize,
    ranked: Vec<TrafficRecord>,
}

impl TopK {
    pub fn new(limit: usize) -> Result<Self> {
        check_limit(limit)?;
        Ok(Self {
            limit,
            ranked: Vec::new(),
        })
    }

    /// Offer a record to the buffer.
    pub fn push(&mut self, record: TrafficRecord) {
        let pos = self
            .ranked
            .partition_point(|kept| kept.cmp_busiest(&record) != Ordering::Greater);
        if pos >= self.limit {
            return;
        }
        self.ranked.insert(pos, record);
        self.ranked.truncate(self.limit);
    }

    /// Current ranking, busiest first.
    pub fn as_slice(&self) -> &[TrafficRecord] {
        &self.ranked
    }

    pub fn into_vec(self) -> Vec<TrafficRecord> {
        self.ranked
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use traffic_core::time_utils::parse_timestamp;

    fn record(ts: &str, cars: i64) -> TrafficRecord {
        TrafficRecord::new(parse_timestamp(ts).unwrap(), cars).unwrap()
    }

    fn scenario_a() -> Vec<TrafficRecord> {
        vec![
            record("2021-12-01T05:00:00", 5),
            record("2021-12-01T05:30:00", 12),
            record("2021-12-01T06:00:00", 14),
            record("2021-12-01T06:30:00", 15),
            record("2021-12-01T07:00:00", 25),
        ]
    }

    // ── top_half_hours ────────────────────────────────────────────────────────

    #[test]
    fn test_top_half_hours_scenario_a() {
        let top = top_half_hours(&scenario_a(), 3).unwrap();
        let cars: Vec<u64> = top.iter().map(|r| r.cars()).collect();
        assert_eq!(cars, vec![25, 15, 14]);
    }

    #[test]
    fn test_top_half_hours_ties_prefer_earliest() {
        let records = vec![
            record("2021-12-01T08:00:00", 9),
            record("2021-12-01T07:00:00", 9),
            record("2021-12-01T07:30:00", 11),
        ];
        let top = top_half_hours(&records, 2).unwrap();
        assert_eq!(top, vec![records[2], records[1]]);
    }

    #[test]
    fn test_top_half_hours_shorter_than_limit() {
        let records = vec![record("2021-12-01T05:00:00", 1)];
        assert_eq!(top_half_hours(&records, 3).unwrap().len(), 1);
        assert!(top_half_hours(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_top_half_hours_zero_limit_is_config_error() {
        assert!(matches!(
            top_half_hours(&scenario_a(), 0),
            Err(TrafficError::Config(_))
        ));
        assert!(TopK::new(0).is_err());
    }

    // ── TopK ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_top_k_matches_batch_for_any_order() {
        let records = scenario_a();
        let expected = top_half_hours(&records, 3).unwrap();

        for shift in 0..records.len() {
            let mut rotated = records.clone();
            rotated.rotate_left(shift);
            let mut top = TopK::new(3).unwrap();
            for r in rotated.iter().rev() {
                top.push(*r);
            }
            assert_eq!(top.as_slice(), expected.as_slice(), "shift {shift}");
        }
    }

    #[test]
    fn test_top_k_stays_bounded() {
        let mut top = TopK::new(2).unwrap();
        for r in scenario_a() {
            top.push(r);
            assert!(top.as_slice().len() <= 2);
        }
        let cars: Vec<u64> = top.into_vec().iter().map(|r| r.cars()).collect();
        assert_eq!(cars, vec![25, 15]);
    }

    #[test]
    fn test_top_k_unbounded_limit_keeps_everything() {
        let records = scenario_a();
        let mut top = TopK::new(usize::MAX).unwrap();
        for r in &records {
            top.push(*r);
        }
        assert_eq!(top.into_vec(), top_half_hours(&records, usize::MAX).unwrap());
    }

    #[test]
    fn test_top_k_later_tie_does_not_displace_earlier() {
        let mut top = TopK::new(1).unwrap();
        top.push(record("2021-12-01T05:00:00", 7));
        top.push(record("2021-12-01T06:00:00", 7));
        assert_eq!(top.as_slice()[0].timestamp(), parse_timestamp("2021-12-01T05:00:00").unwrap());
    }
}
