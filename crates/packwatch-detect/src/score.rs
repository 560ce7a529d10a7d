//! ---
//! pw_section: "02-detection-analytics"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Detection and scoring routines for pack telemetry."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use packwatch_telemetry::TelemetrySample;
use tracing::debug;

use crate::config::ModelConfig;
use crate::errors::ModelFitError;
use crate::features::DerivedFeatures;
use crate::forest::{ForestConfig, IsolationForest};
use crate::standardize::{feature_matrix, Standardizer};

/// Minimum viable row count for fitting the outlier model.
pub const MIN_MODEL_ROWS: usize = 10;

/// Per-row model output: the boolean flag vector plus the raw scores that
/// produced it, both index-aligned with the input series.
#[derive(Debug, Clone)]
pub struct ModelOutcome {
    pub flags: Vec<bool>,
    pub scores: Vec<f64>,
}

impl ModelOutcome {
    /// All-false flags and zero scores, used when the model is disabled or
    /// could not be fit.
    pub fn all_clear(rows: usize) -> Self {
        Self {
            flags: vec![false; rows],
            scores: vec![0.0; rows],
        }
    }
}

/// Number of rows the contamination rate expects to be anomalous.
pub fn expected_anomalies(contamination: f64, rows: usize) -> usize {
    (contamination * rows as f64).round() as usize
}

/// Run the unsupervised scorer over a series.
///
/// Two-phase batch pipeline: standardize over the full input, fit the
/// isolation forest on the standardized matrix, then flag the top
/// `round(contamination * rows)` rows by score (index breaks ties, so the
/// cut is exact and deterministic). Fitting problems surface as
/// [`ModelFitError`]; callers are expected to downgrade to rule-only
/// detection rather than abort.
pub fn isolation_forest_flags(
    series: &[TelemetrySample],
    features: &[DerivedFeatures],
    config: &ModelConfig,
) -> std::result::Result<ModelOutcome, ModelFitError> {
    let rows = series.len();
    if !config.enabled {
        return Ok(ModelOutcome::all_clear(rows));
    }
    if rows < MIN_MODEL_ROWS {
        return Err(ModelFitError::TooFewRows {
            rows,
            min: MIN_MODEL_ROWS,
        });
    }
    let quota = expected_anomalies(config.contamination, rows);
    if quota == 0 {
        return Err(ModelFitError::NoExpectedAnomalies {
            contamination: config.contamination,
            rows,
        });
    }

    let matrix = feature_matrix(series, features);
    let scaler = Standardizer::fit(&matrix);
    let standardized = scaler.apply(&matrix);

    let forest = IsolationForest::fit(
        &ForestConfig {
            num_trees: config.num_trees,
            sample_size: config.sample_size,
            max_depth: config.max_depth,
            seed: config.seed,
        },
        &standardized,
    );
    let scores = forest.score_all(&standardized);

    let mut ranked: Vec<usize> = (0..rows).collect();
    ranked.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    let mut flags = vec![false; rows];
    for &index in ranked.iter().take(quota) {
        flags[index] = true;
    }

    debug!(
        rows,
        flagged = quota,
        contamination = config.contamination,
        "outlier model scored series"
    );
    Ok(ModelOutcome { flags, scores })
}
