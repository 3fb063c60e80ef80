use chrono::{NaiveDateTime, Timelike};

use crate::models::TrafficRecord;

/// Render a timestamp in ISO-8601 form. Fractional seconds appear only when
/// non-zero, always as six digits (microseconds).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use traffic_core::formatting::format_timestamp;
///
/// let ts = NaiveDate::from_ymd_opt(2021, 12, 1).unwrap().and_hms_opt(5, 30, 0).unwrap();
/// assert_eq!(format_timestamp(ts), "2021-12-01T05:30:00");
/// ```
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Render a record as `<timestamp> <count>`, the same layout the input uses.
///
/// # Examples
///
/// ```
/// use traffic_core::formatting::format_record;
/// use traffic_core::models::TrafficRecord;
/// use traffic_core::time_utils::parse_timestamp;
///
/// let ts = parse_timestamp("2021-12-01T07:00:00").unwrap();
/// let record = TrafficRecord::new(ts, 25).unwrap();
/// assert_eq!(format_record(&record), "2021-12-01T07:00:00 25");
/// ```
pub fn format_record(record: &TrafficRecord) -> String {
    format!("{} {}", format_timestamp(record.timestamp()), record.cars())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::parse_timestamp;

    #[test]
    fn test_format_timestamp_whole_seconds() {
        let ts = parse_timestamp("2021-12-02T23:30").unwrap();
        assert_eq!(format_timestamp(ts), "2021-12-02T23:30:00");
    }

    #[test]
    fn test_format_timestamp_keeps_fraction() {
        let ts = parse_timestamp("2021-12-02T23:30:00.500").unwrap();
        assert_eq!(format_timestamp(ts), "2021-12-02T23:30:00.500000");
    }

    #[test]
    fn test_format_timestamp_fraction_is_microseconds() {
        let ts = parse_timestamp("2021-12-02T23:30:00.25").unwrap();
        assert_eq!(format_timestamp(ts), "2021-12-02T23:30:00.250000");
        let ts = parse_timestamp("2021-12-02T23:30:00.000001").unwrap();
        assert_eq!(format_timestamp(ts), "2021-12-02T23:30:00.000001");
    }

    #[test]
    fn test_format_record_zero_cars() {
        let ts = parse_timestamp("2021-12-01T05:00:00").unwrap();
        let record = TrafficRecord::new(ts, 0).unwrap();
        assert_eq!(format_record(&record), "2021-12-01T05:00:00 0");
    }
}
