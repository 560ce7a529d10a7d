//! ---
//! pw_section: "01-telemetry-core"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Telemetry model module exports and shared types."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use std::fs;
use std::io::Write;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::errors::{Result, TelemetryError};
use crate::sample::{TelemetrySample, TelemetrySeries};
use crate::schema::{missing_columns, validate_series};

/// Load a telemetry series, dispatching on the file extension.
///
/// CSV is the interchange format used by capture rigs; JSON arrays are
/// accepted for hand-authored fixtures.
pub fn load_series(path: &Path) -> Result<TelemetrySeries> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_series_from_json(path),
        _ => load_series_from_csv(path),
    }
}

/// Load a series from CSV. The header is checked against the required-column
/// schema before any row is parsed, so a capture missing `cell_v_min` fails
/// with the full missing-column list and no partial output.
pub fn load_series_from_csv(path: impl AsRef<Path>) -> Result<TelemetrySeries> {
    let file = fs::File::open(path.as_ref())?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader.headers()?.clone();
    let missing = missing_columns(headers.iter());
    if !missing.is_empty() {
        return Err(TelemetryError::MissingColumns { missing });
    }

    let mut series = TelemetrySeries::new();
    for record in reader.deserialize() {
        let sample: TelemetrySample = record?;
        series.push(sample);
    }
    validate_series(&series)?;
    debug!(rows = series.len(), "telemetry series loaded from CSV");
    Ok(series)
}

/// Load a series from a JSON array of samples.
pub fn load_series_from_json(path: impl AsRef<Path>) -> Result<TelemetrySeries> {
    let contents = fs::read_to_string(path.as_ref())?;
    let series: TelemetrySeries = serde_json::from_str(&contents)?;
    validate_series(&series)?;
    debug!(rows = series.len(), "telemetry series loaded from JSON");
    Ok(series)
}

/// Write a raw series as CSV to a file path.
pub fn write_series_csv(path: impl AsRef<Path>, series: &[TelemetrySample]) -> Result<()> {
    let file = fs::File::create(path.as_ref())?;
    write_series_csv_to(file, series)
}

/// Write a raw series as CSV to any writer (stdout included).
pub fn write_series_csv_to<W: Write>(writer: W, series: &[TelemetrySample]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for sample in series {
        csv_writer.serialize(sample)?;
    }
    csv_writer.flush().map_err(TelemetryError::Io)?;
    Ok(())
}
