//! ---
//! pw_section: "02-detection-analytics"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Detection and scoring routines for pack telemetry."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use packwatch_telemetry::TelemetryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DetectError>;

/// Top-level failure taxonomy for a detection run.
///
/// `Schema` and `Config` abort the run before any computation; `ModelFit` is
/// recoverable — the pipeline downgrades to rule-only detection.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("telemetry schema violation: {0}")]
    Schema(#[from] TelemetryError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("outlier model fit failed: {0}")]
    ModelFit(#[from] ModelFitError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
    #[error("yaml serialization error: {0}")]
    YamlSerializationFailed(#[from] serde_yaml::Error),
}

/// Out-of-range threshold or model parameter, rejected before any computation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be positive, got {value}")]
    NonPositiveThreshold { field: &'static str, value: f64 },
    #[error("contamination must lie in (0, 0.5], got {0}")]
    ContaminationOutOfRange(f64),
    #[error("`{field}` must be nonzero")]
    ZeroModelParameter { field: &'static str },
}

/// The outlier model cannot be fit on the given data and configuration.
/// Callers fall back to rule-only detection rather than aborting.
#[derive(Debug, Error, PartialEq)]
pub enum ModelFitError {
    #[error("{rows} rows is below the {min}-row minimum for fitting the outlier model")]
    TooFewRows { rows: usize, min: usize },
    #[error("contamination {contamination} over {rows} rows expects no anomalous rows")]
    NoExpectedAnomalies { contamination: f64, rows: usize },
}
