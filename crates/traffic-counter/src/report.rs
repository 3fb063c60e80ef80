//! Rendering of an [`AnalysisResult`] for the terminal.

use std::io::{self, Write};

use serde::Serialize;
use traffic_core::formatting::{format_record, format_timestamp};
use traffic_core::settings::AnalysisConfig;
use traffic_core::time_utils::window_duration_label;
use traffic_data::analysis::AnalysisResult;

/// Marker printed when no qualifying window exists.
pub const NOT_AVAILABLE: &str = "<not available>";

// ── Text ──────────────────────────────────────────────────────────────────────

fn write_section<W, I>(out: &mut W, title: &str, lines: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = String>,
{
    writeln!(out, "{}", title)?;
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Write the four-section text report.
pub fn write_text<W: Write>(
    out: &mut W,
    result: &AnalysisResult,
    config: &AnalysisConfig,
) -> io::Result<()> {
    writeln!(out, "Total: {}", result.total)?;

    write_section(
        out,
        "Cars per day:",
        result.per_day.iter().map(|d| format!("{} {}", d.day, d.total)),
    )?;

    write_section(
        out,
        &format!("Top {} half hours:", config.top_limit()),
        result.top_half_hours.iter().map(format_record),
    )?;

    let title = format!(
        "Least busy {} period:",
        window_duration_label(config.window_size())
    );
    match (&result.quietest_window, result.quietest_start(), result.quietest_total()) {
        (Some(window), Some(start), Some(total)) => {
            let lines = [
                format!("Start: {}", format_timestamp(start)),
                format!("Total: {}", total),
            ]
            .into_iter()
            .chain(window.iter().map(format_record));
            write_section(out, &title, lines)?;
        }
        _ => write_section(out, &title, [NOT_AVAILABLE.to_string()])?,
    }

    Ok(())
}

// ── JSON ──────────────────────────────────────────────────────────────────────

/// The serialised result plus the derived window total.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a AnalysisResult,
    quietest_total: Option<u64>,
}

/// Render the result as pretty-printed JSON.
pub fn render_json(result: &AnalysisResult) -> serde_json::Result<String> {
    let report = JsonReport {
        result,
        quietest_total: result.quietest_total(),
    };
    serde_json::to_string_pretty(&report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
