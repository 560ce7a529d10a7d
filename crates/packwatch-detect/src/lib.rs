//! ---
//! pw_section: "02-detection-analytics"
//! pw_subsection: "01-bootstrap"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Anomaly detection engine module exports and pipeline."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
//! Anomaly detection over battery pack telemetry.
//!
//! Two complementary detectors run over the same derived feature set: a
//! deterministic threshold/trend rule engine and an unsupervised isolation
//! forest. Both are batch passes over an in-memory series; their flags are
//! merged into a per-row verdict plus run-level counts.

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod features;
pub mod forest;
pub mod report;
pub mod rules;
pub mod score;
pub mod standardize;

use packwatch_telemetry::{validate_series, TelemetrySample};
use tracing::{info, warn};

pub use aggregate::{merge_flags, summarize, AnomalyResult, DetectionSummary};
pub use config::{DetectionConfig, ModelConfig, RuleConfig};
pub use errors::{ConfigError, DetectError, ModelFitError, Result};
pub use features::{derive_features, DerivedFeatures};
pub use report::{write_augmented_csv, write_augmented_csv_to, DetectionReport, ReportExporter};
pub use rules::{evaluate_row, evaluate_series, RuleHits};
pub use score::{isolation_forest_flags, ModelOutcome, MIN_MODEL_ROWS};

/// Everything a detection pass produced, index-aligned with the input series.
#[derive(Debug, Clone)]
pub struct DetectionRun {
    pub features: Vec<DerivedFeatures>,
    pub hits: Vec<RuleHits>,
    pub results: Vec<AnomalyResult>,
    pub ml_scores: Vec<f64>,
    pub summary: DetectionSummary,
    /// Set when the outlier model could not be fit and the run fell back to
    /// rule-only flags.
    pub ml_degraded: bool,
}

/// Run the full detection pipeline over a series.
///
/// Order of operations: configuration and schema validation (both fatal),
/// feature derivation, rule evaluation, model scoring, aggregation. A
/// [`ModelFitError`] does not abort the run — the model flags collapse to
/// all-false and `ml_degraded` is set, matching the rule-only fallback the
/// operator surface expects.
pub fn run_detection(series: &[TelemetrySample], config: &DetectionConfig) -> Result<DetectionRun> {
    config.validate()?;
    validate_series(series)?;

    let features = derive_features(series);
    let hits = evaluate_series(series, &features, &config.rules);

    let (model_outcome, ml_degraded) =
        match isolation_forest_flags(series, &features, &config.model) {
            Ok(outcome) => (outcome, false),
            Err(err) => {
                warn!(error = %err, "outlier model unavailable, continuing rule-only");
                (ModelOutcome::all_clear(series.len()), true)
            }
        };

    let results = merge_flags(&hits, &model_outcome.flags);
    let summary = summarize(&hits, &results);
    info!(
        rows = summary.total_rows,
        flagged = summary.total_flagged,
        ml_degraded,
        "detection pass complete"
    );

    Ok(DetectionRun {
        features,
        hits,
        results,
        ml_scores: model_outcome.scores,
        summary,
        ml_degraded,
    })
}
