//! ---
//! pw_section: "01-telemetry-core"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Telemetry model module exports and shared types."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Failures raised while loading or validating telemetry input.
///
/// Schema violations are fatal for the run that hit them: the caller gets the
/// full picture (every missing column, the first malformed row) and no
/// partial series.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("input is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("row {row}: field `{field}` is not a finite number")]
    NonFiniteField { row: usize, field: &'static str },
    #[error("row {row}: time_s {current} does not increase over previous value {previous}")]
    NonMonotonicTime {
        row: usize,
        previous: f64,
        current: f64,
    },
    #[error("row {row}: cell_v_max {cell_v_max} is below cell_v_min {cell_v_min}")]
    CellBoundsInverted {
        row: usize,
        cell_v_min: f64,
        cell_v_max: f64,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
