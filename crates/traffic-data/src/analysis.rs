//! Top-level analysis pipeline.
//!
//! Two entry points produce the same [`AnalysisResult`]:
//!
//! * batch: parse and sort every record, then run each pass over the
//!   collection ([`analyse_lines`], [`analyse_records`]);
//! * streaming: one pass over the lines keeping only bounded buffers
//!   ([`analyse_stream`], [`analyse_reader`], [`StreamingAnalyzer`]).
//!
//! Streaming relies on chronologically ordered input. Out-of-order records
//! are treated as gaps by the window search, so the quietest window may then
//! differ from the batch result; the other statistics do not.

use std::io::BufRead;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use traffic_core::error::Result;
use traffic_core::models::{sum_cars, DailyTotal, TrafficRecord};
use traffic_core::settings::{AnalysisConfig, Mode};
use tracing::{debug, info, warn};

use crate::aggregator::{total_cars, totals_by_day, CountAggregator};
use crate::parser::{open_data_file, parse_line, parse_records, read_records};
use crate::ranking::{top_half_hours, TopK};
use crate::window::{find_quietest, WindowScanner};

// ── Public types ──────────────────────────────────────────────────────────────

/// The four statistics produced by one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Cars counted across all records.
    pub total: u64,
    /// Per-day totals, ascending by day.
    pub per_day: Vec<DailyTotal>,
    /// Busiest slots: most cars first, ties to the earliest timestamp.
    pub top_half_hours: Vec<TrafficRecord>,
    /// Least-busy gap-free window, or `None` when no window qualifies.
    pub quietest_window: Option<Vec<TrafficRecord>>,
}

impl AnalysisResult {
    /// Sum of cars in the quietest window.
    pub fn quietest_total(&self) -> Option<u64> {
        self.quietest_window.as_deref().map(|w| sum_cars(w))
    }

    /// Start of the quietest window.
    pub fn quietest_start(&self) -> Option<NaiveDateTime> {
        self.quietest_window
            .as_deref()
            .and_then(|w| w.first())
            .map(TrafficRecord::timestamp)
    }
}

// ── Batch ─────────────────────────────────────────────────────────────────────

/// Analyse an already sorted record collection.
pub fn analyse_records(records: &[TrafficRecord], config: &AnalysisConfig) -> Result<AnalysisResult> {
    let result = AnalysisResult {
        total: total_cars(records),
        per_day: totals_by_day(records),
        top_half_hours: top_half_hours(records, config.top_limit())?,
        quietest_window: find_quietest(records, config.window_size())?.map(<[_]>::to_vec),
    };
    debug!(
        "Batch analysis: {} records over {} days",
        records.len(),
        result.per_day.len()
    );
    Ok(result)
}

/// Parse, sort and analyse raw lines.
pub fn analyse_lines<I, S>(lines: I, config: &AnalysisConfig) -> Result<AnalysisResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let records = parse_records(lines)?;
    analyse_records(&records, config)
}

// ── Streaming ─────────────────────────────────────────────────────────────────

/// Single-pass analysis state.
///
/// Memory stays bounded: the top-k buffer holds at most `top_limit` records
/// and the window run at most `window_size`.
#[derive(Debug, Clone)]
pub struct StreamingAnalyzer {
    counts: CountAggregator,
    top: TopK,
    windows: WindowScanner,
    line_number: usize,
    records_seen: usize,
    last_timestamp: Option<NaiveDateTime>,
    out_of_order: usize,
}

impl StreamingAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            counts: CountAggregator::new(),
            top: TopK::new(config.top_limit())?,
            windows: WindowScanner::new(config.window_size())?,
            line_number: 0,
            records_seen: 0,
            last_timestamp: None,
            out_of_order: 0,
        })
    }

    /// Parse the next raw line and incorporate its record, if any.
    pub fn push_line(&mut self, raw: &str) -> Result<()> {
        self.line_number += 1;
        if let Some(record) = parse_line(raw, self.line_number)? {
            self.push(record);
        }
        Ok(())
    }

    /// Incorporate one record in arrival order.
    pub fn push(&mut self, record: TrafficRecord) {
        if let Some(last) = self.last_timestamp {
            if record.timestamp() < last {
                if self.out_of_order == 0 {
                    warn!(
                        "Streaming input is not chronological ({} after {}); treating as a gap",
                        record.timestamp(),
                        last
                    );
                }
                self.out_of_order += 1;
            }
        }
        self.last_timestamp = Some(record.timestamp());
        self.records_seen += 1;

        self.counts.add(&record);
        self.top.push(record);
        self.windows.push(record);
    }

    /// Assemble the final result.
    pub fn finish(self) -> AnalysisResult {
        debug!(
            "Streaming analysis: {} records from {} lines, {} out of order",
            self.records_seen, self.line_number, self.out_of_order
        );
        let (total, per_day) = self.counts.finish();
        AnalysisResult {
            total,
            per_day,
            top_half_hours: self.top.into_vec(),
            quietest_window: self.windows.finish(),
        }
    }
}

/// Analyse raw lines in a single pass.
pub fn analyse_stream<I, S>(lines: I, config: &AnalysisConfig) -> Result<AnalysisResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut analyzer = StreamingAnalyzer::new(config)?;
    for raw in lines {
        analyzer.push_line(raw.as_ref())?;
    }
    Ok(analyzer.finish())
}

/// Analyse a buffered reader in a single pass without collecting its lines.
pub fn analyse_reader<R: BufRead>(reader: R, config: &AnalysisConfig) -> Result<AnalysisResult> {
    let mut analyzer = StreamingAnalyzer::new(config)?;
    for line in reader.lines() {
        analyzer.push_line(&line?)?;
    }
    Ok(analyzer.finish())
}

// ── Path wrapper ──────────────────────────────────────────────────────────────

/// Analyse a data file in the requested mode.
pub fn analyse_file(path: &Path, config: &AnalysisConfig, mode: Mode) -> Result<AnalysisResult> {
    info!("Analysing {} ({:?} mode)", path.display(), mode);
    match mode {
        Mode::Batch => {
            let records = read_records(path)?;
            analyse_records(&records, config)
        }
        Mode::Stream => analyse_reader(open_data_file(path)?, config),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
