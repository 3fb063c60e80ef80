//! Shared types for the traffic counter.
//!
//! Holds the record model, the error type, timestamp helpers, output
//! formatting helpers and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, TrafficError};
