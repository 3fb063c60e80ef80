//! Line parsing and chronological ordering of traffic records.
//!
//! Each non-blank input line is `<timestamp> <count>`. Any malformed line
//! aborts the whole parse; there is no best-effort mode.

use std::io::BufRead;
use std::path::Path;

use traffic_core::error::{Result, TrafficError};
use traffic_core::models::{sort_chronologically, TrafficRecord};
use traffic_core::time_utils::parse_timestamp;
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse one raw line. `number` is the 1-based line number used in errors.
///
/// Returns `Ok(None)` for blank or whitespace-only lines.
pub fn parse_line(raw: &str, number: usize) -> Result<Option<TrafficRecord>> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(None);
    }

    // Split on the first whitespace run only; the remainder is the count.
    let Some((ts_token, rest)) = line.split_once(char::is_whitespace) else {
        return Err(TrafficError::Format {
            line: number,
            content: raw.to_string(),
        });
    };
    let count_token = rest.trim_start();

    let timestamp = parse_timestamp(ts_token).ok_or_else(|| TrafficError::Timestamp {
        line: number,
        token: ts_token.to_string(),
    })?;

    let cars: i64 = count_token.parse().map_err(|_| TrafficError::Count {
        line: number,
        token: count_token.to_string(),
    })?;

    TrafficRecord::new(timestamp, cars)
        .map(Some)
        .map_err(|e| e.at_line(number))
}

/// Parse every line and return the records sorted by timestamp.
///
/// The sort is stable, so records sharing a timestamp keep their input order.
pub fn parse_records<I, S>(lines: I) -> Result<Vec<TrafficRecord>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    let mut line_count = 0usize;
    for (index, raw) in lines.into_iter().enumerate() {
        line_count += 1;
        if let Some(record) = parse_line(raw.as_ref(), index + 1)? {
            records.push(record);
        }
    }
    sort_chronologically(&mut records);

    debug!("Parsed {} records from {} lines", records.len(), line_count);
    Ok(records)
}

/// Parse all lines from a buffered reader. I/O failures surface as
/// [`TrafficError::Io`].
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<TrafficRecord>> {
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    parse_records(lines)
}

/// Read and parse a traffic data file.
pub fn read_records(path: &Path) -> Result<Vec<TrafficRecord>> {
    let reader = open_data_file(path)?;
    parse_reader(reader)
}

/// Open `path` for buffered reading, tagging failures with the path.
pub fn open_data_file(path: &Path) -> Result<std::io::BufReader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|source| TrafficError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(std::io::BufReader::new(file))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    // ── parse_line ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_line_valid() {
        let record = parse_line("2021-12-01T05:00:00 5", 1).unwrap().unwrap();
        assert_eq!(record.cars(), 5);
        assert_eq!(record.day(), "2021-12-01");
    }

    #[test]
    fn test_parse_line_blank_is_skipped() {
        assert!(parse_line("", 1).unwrap().is_none());
        assert!(parse_line("   \t  ", 2).unwrap().is_none());
    }

    #[test]
    fn test_parse_line_tolerates_extra_whitespace() {
        let record = parse_line("  2021-12-01T05:00:00 \t  12  ", 1)
            .unwrap()
            .unwrap();
        assert_eq!(record.cars(), 12);
    }

    #[test]
    fn test_parse_line_single_token_is_format_error() {
        let err = parse_line("2021-12-01T05:00:00", 4).unwrap_err();
        assert!(matches!(err, TrafficError::Format { line: 4, .. }));
    }

    #[test]
    fn test_parse_line_bad_timestamp() {
        let err = parse_line("2021-12-01 05:00:00", 3).unwrap_err();
        match err {
            TrafficError::Timestamp { line, token } => {
                assert_eq!(line, 3);
                assert_eq!(token, "2021-12-01");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_line_offset_timestamps() {
        let utc = parse_line("2021-12-01T05:30:00Z 7", 1).unwrap().unwrap();
        let plus = parse_line("2021-12-01T05:00:00+00:00 5", 2).unwrap().unwrap();
        assert_eq!(utc.timestamp() - plus.timestamp(), traffic_core::time_utils::slot_interval());
        assert_eq!(utc.day(), "2021-12-01");
    }

    #[test]
    fn test_parse_records_mixed_offsets_sorted_by_wall_clock() {
        let text = "2021-12-01T05:30:00Z 7\n2021-12-01T05:00:00+00:00 5\n";
        let records = parse_records(text.lines()).unwrap();
        let cars: Vec<u64> = records.iter().map(|r| r.cars()).collect();
        assert_eq!(cars, vec![5, 7]);
    }

    #[test]
    fn test_parse_line_bad_count() {
        let err = parse_line("2021-12-01T05:00:00 lots", 2).unwrap_err();
        match err {
            TrafficError::Count { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "lots");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_line_count_with_trailing_field_is_count_error() {
        let err = parse_line("2021-12-01T05:00:00 5 6", 8).unwrap_err();
        assert!(matches!(err, TrafficError::Count { line: 8, .. }));
    }

    #[test]
    fn test_parse_line_negative_count_is_validation_error() {
        let err = parse_line("2021-12-01T05:00:00 -4", 6).unwrap_err();
        assert!(matches!(
            err,
            TrafficError::Validation {
                line: Some(6),
                cars: -4
            }
        ));
    }

    // ── parse_records ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_records_sorted() {
        let lines = [
            "2021-12-01T06:00:00 14",
            "",
            "2021-12-01T05:00:00 5",
            "2021-12-01T05:30:00 12",
        ];
        let records = parse_records(lines).unwrap();
        let cars: Vec<u64> = records.iter().map(|r| r.cars()).collect();
        assert_eq!(cars, vec![5, 12, 14]);
    }

    #[test]
    fn test_parse_records_stable_for_duplicates() {
        let lines = [
            "2021-12-01T05:00:00 1",
            "2021-12-01T04:30:00 9",
            "2021-12-01T05:00:00 2",
        ];
        let records = parse_records(lines).unwrap();
        let cars: Vec<u64> = records.iter().map(|r| r.cars()).collect();
        assert_eq!(cars, vec![9, 1, 2]);
    }

    #[test]
    fn test_parse_records_reports_line_number_after_blanks() {
        let lines = ["2021-12-01T05:00:00 5", "", "", "garbage"];
        let err = parse_records(lines).unwrap_err();
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_parse_records_empty_input() {
        let records = parse_records(Vec::<String>::new()).unwrap();
        assert!(records.is_empty());
    }

    // ── read_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_read_records_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "2021-12-01T05:30:00 12").unwrap();
        writeln!(file, "2021-12-01T05:00:00 5").unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].timestamp() < records[1].timestamp());
    }

    #[test]
    fn test_read_records_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        match read_records(&path).unwrap_err() {
            TrafficError::FileRead { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
