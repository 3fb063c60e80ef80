use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{Result, TrafficError};

/// Default number of busiest slots reported.
pub const DEFAULT_TOP_LIMIT: usize = 3;

/// Default quiet-window length in slots (3 × 30 min = 1.5 h).
pub const DEFAULT_WINDOW_SIZE: usize = 3;

// ── AnalysisConfig ─────────────────────────────────────────────────────────────

/// Validated parameters for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    top_limit: usize,
    window_size: usize,
}

impl AnalysisConfig {
    /// Build a config, rejecting zero for either parameter.
    pub fn new(top_limit: usize, window_size: usize) -> Result<Self> {
        if top_limit == 0 {
            return Err(TrafficError::Config("top limit must be positive".to_string()));
        }
        if window_size == 0 {
            return Err(TrafficError::Config("window size must be positive".to_string()));
        }
        Ok(Self {
            top_limit,
            window_size,
        })
    }

    /// How many busiest slots to keep.
    pub fn top_limit(&self) -> usize {
        self.top_limit
    }

    /// Number of consecutive slots in a quiet window.
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_limit: DEFAULT_TOP_LIMIT,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// How the input is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Parse and sort every record, then run each pass over the collection.
    Batch,
    /// Single pass over the lines; expects chronologically ordered input.
    Stream,
}

/// Report layout written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Analyse automated traffic counts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "traffic-counter",
    about = "Analyse automated traffic counts",
    version
)]
pub struct Settings {
    /// Path to the traffic data file
    pub data_file: PathBuf,

    /// Number of busiest half hours to report
    #[arg(long, default_value_t = DEFAULT_TOP_LIMIT)]
    pub top_limit: usize,

    /// Number of consecutive half hours in the quiet window
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Processing mode
    #[arg(long, value_enum, default_value_t = Mode::Batch)]
    pub mode: Mode,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Validate the numeric options into an [`AnalysisConfig`].
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        AnalysisConfig::new(self.top_limit, self.window_size)
    }

    /// Log level after applying `--debug`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
