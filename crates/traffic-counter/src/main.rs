mod bootstrap;
mod report;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use traffic_core::error::TrafficError;
use traffic_core::settings::{AnalysisConfig, Mode, OutputFormat, Settings};
use traffic_data::analysis::{analyse_reader, analyse_records, AnalysisResult};
use traffic_data::parser::{open_data_file, parse_reader};

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(settings.effective_log_level())?;

    tracing::info!("Traffic counter v{} starting", env!("CARGO_PKG_VERSION"));

    let config = settings.analysis_config()?;

    let reader = match open_data_file(&settings.data_file) {
        Ok(reader) => reader,
        Err(err) if is_missing_file(&err) => Settings::command()
            .error(
                ErrorKind::Io,
                format!("File not found: {}", settings.data_file.display()),
            )
            .exit(),
        Err(err) => return Err(err.into()),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&settings, &config, reader, &mut out)
        .with_context(|| format!("analysing {}", settings.data_file.display()))?;
    out.flush()?;

    Ok(())
}

/// Analyse `reader` per `settings` and write the report to `out`.
fn run<R: BufRead, W: Write>(
    settings: &Settings,
    config: &AnalysisConfig,
    reader: R,
    out: &mut W,
) -> Result<()> {
    let result = analyse(settings.mode, config, reader)?;

    match settings.format {
        OutputFormat::Text => report::write_text(out, &result, config)?,
        OutputFormat::Json => writeln!(out, "{}", report::render_json(&result)?)?,
    }

    Ok(())
}

fn analyse<R: BufRead>(
    mode: Mode,
    config: &AnalysisConfig,
    reader: R,
) -> traffic_core::Result<AnalysisResult> {
    match mode {
        Mode::Batch => analyse_records(&parse_reader(reader)?, config),
        Mode::Stream => analyse_reader(reader, config),
    }
}

/// `true` when the error means the input path does not exist.
fn is_missing_file(err: &TrafficError) -> bool {
    matches!(err, TrafficError::FileRead { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
