//! Analysis engine for half-hourly traffic counts.
//!
//! Parses `<timestamp> <count>` lines, orders them chronologically and
//! derives the grand total, per-day totals, the busiest slots and the
//! least-busy contiguous window.

pub mod aggregator;
pub mod analysis;
pub mod parser;
pub mod ranking;
pub mod window;

pub use traffic_core as core;
