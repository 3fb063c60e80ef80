//! Least-busy contiguous window search.
//!
//! A window is `size` chronologically consecutive records where each pair is
//! exactly one slot apart. Windows containing any gap are never candidates.
//! Among candidates the smallest car total wins; ties go to the earliest
//! start.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use traffic_core::error::{Result, TrafficError};
use traffic_core::models::{sum_cars, TrafficRecord};
use traffic_core::time_utils::is_next_slot;
use tracing::{debug, trace};

fn check_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(TrafficError::Config("window size must be positive".to_string()));
    }
    Ok(())
}

/// Returns `true` when every neighbouring pair in `window` is one slot apart.
pub fn is_contiguous(window: &[TrafficRecord]) -> bool {
    window
        .windows(2)
        .all(|pair| is_next_slot(pair[0].timestamp(), pair[1].timestamp()))
}

// ── Best-window bookkeeping ───────────────────────────────────────────────────

/// The quietest candidate seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Best {
    total: u64,
    start: NaiveDateTime,
}

impl Best {
    fn of(window: &[TrafficRecord]) -> Option<Self> {
        let first = window.first()?;
        Some(Self {
            total: sum_cars(window),
            start: first.timestamp(),
        })
    }

    fn beats(&self, current: Option<&Best>) -> bool {
        match current {
            None => true,
            Some(best) => (self.total, self.start) < (best.total, best.start),
        }
    }
}

// ── Batch form ────────────────────────────────────────────────────────────────

/// Every gap-free window of `size` records in a chronologically sorted
/// collection, in order of start position.
pub fn contiguous_windows(
    records: &[TrafficRecord],
    size: usize,
) -> Result<impl Iterator<Item = &[TrafficRecord]>> {
    check_size(size)?;
    Ok(records.windows(size).filter(|w| is_contiguous(w)))
}

/// The quietest gap-free window, or `None` when there is no candidate.
pub fn find_quietest(records: &[TrafficRecord], size: usize) -> Result<Option<&[TrafficRecord]>> {
    let mut best: Option<(Best, &[TrafficRecord])> = None;
    let mut candidates = 0usize;

    for window in contiguous_windows(records, size)? {
        candidates += 1;
        let Some(score) = Best::of(window) else {
            continue;
        };
        if score.beats(best.as_ref().map(|(b, _)| b)) {
            best = Some((score, window));
        }
    }

    debug!(
        "Scanned {} records: {} contiguous windows of size {}",
        records.len(),
        candidates,
        size
    );
    Ok(best.map(|(_, window)| window))
}

/// The quietest gap-free window.
///
/// Unlike [`find_quietest`], having no candidate is an error
/// ([`TrafficError::NoWindow`]).
pub fn quietest_period(records: &[TrafficRecord], size: usize) -> Result<&[TrafficRecord]> {
    find_quietest(records, size)?.ok_or(TrafficError::NoWindow { size })
}

// ── WindowScanner ─────────────────────────────────────────────────────────────

/// Single-pass quietest-window tracker.
///
/// Keeps only the trailing unbroken run (at most `size` records) plus the best
/// window so far. Any spacing other than exactly one slot, including a
/// duplicate or backwards timestamp, restarts the run at the new record.
#[derive(Debug, Clone)]
pub struct WindowScanner {
    size: usize,
    run: VecDeque<TrafficRecord>,
    best: Option<(Best, Vec<TrafficRecord>)>,
    candidates: usize,
}

impl WindowScanner {
    pub fn new(size: usize) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            size,
            run: VecDeque::new(),
            best: None,
            candidates: 0,
        })
    }

    /// Incorporate the next record in arrival order.
    pub fn push(&mut self, record: TrafficRecord) {
        match self.run.back() {
            Some(last) if is_next_slot(last.timestamp(), record.timestamp()) => {
                self.run.push_back(record);
                if self.run.len() > self.size {
                    self.run.pop_front();
                }
            }
            Some(last) => {
                trace!(
                    "window run broken between {} and {}",
                    last.timestamp(),
                    record.timestamp()
                );
                self.run.clear();
                self.run.push_back(record);
            }
            None => self.run.push_back(record),
        }

        if self.run.len() == self.size {
            self.consider_run();
        }
    }

    fn consider_run(&mut self) {
        self.candidates += 1;
        let Some(front) = self.run.front() else {
            return;
        };
        let score = Best {
            total: sum_cars(&self.run),
            start: front.timestamp(),
        };
        if score.beats(self.best.as_ref().map(|(b, _)| b)) {
            self.best = Some((score, self.run.iter().copied().collect()));
        }
    }

    /// Number of candidate windows seen so far.
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    /// The quietest window seen, if any.
    pub fn finish(self) -> Option<Vec<TrafficRecord>> {
        debug!(
            "Window scan finished: {} candidates of size {}",
            self.candidates, self.size
        );
        self.best.map(|(_, window)| window)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
