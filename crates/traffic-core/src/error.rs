use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the traffic counter.
#[derive(Error, Debug)]
pub enum TrafficError {
    /// A non-blank line did not split into a timestamp and a count.
    #[error("Line {line} is not in '<timestamp> <count>' format: {content:?}")]
    Format { line: usize, content: String },

    /// The timestamp field did not parse as an ISO-8601 date-time.
    #[error("Line {line} has invalid timestamp: {token}")]
    Timestamp { line: usize, token: String },

    /// The count field did not parse as an integer.
    #[error("Line {line} has invalid car count: {token}")]
    Count { line: usize, token: String },

    /// A syntactically valid count was negative.
    ///
    /// `line` is `None` when the record was built directly rather than parsed.
    #[error("{}car count must be non-negative, got {cars}", line_prefix(.line))]
    Validation { line: Option<usize>, cars: i64 },

    /// A caller-supplied analysis parameter is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A direct quietest-window query found no contiguous window.
    #[error("No contiguous window of {size} records found")]
    NoWindow { size: usize },

    /// A data file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrafficError {
    /// Attach a 1-based line number to a validation error raised during
    /// record construction. Other variants are returned unchanged.
    pub fn at_line(self, number: usize) -> Self {
        match self {
            TrafficError::Validation { cars, .. } => TrafficError::Validation {
                line: Some(number),
                cars,
            },
            other => other,
        }
    }

    /// The input line the error refers to, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            TrafficError::Format { line, .. }
            | TrafficError::Timestamp { line, .. }
            | TrafficError::Count { line, .. } => Some(*line),
            TrafficError::Validation { line, .. } => *line,
            _ => None,
        }
    }
}

fn line_prefix(line: &Option<usize>) -> String {
    line.map(|n| format!("Line {}: ", n)).unwrap_or_default()
}

/// Convenience alias used throughout the traffic crates.
pub type Result<T> = std::result::Result<T, TrafficError>;
