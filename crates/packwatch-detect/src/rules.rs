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
use serde::Serialize;

use crate::config::RuleConfig;
use crate::features::DerivedFeatures;

/// Which of the four rule predicates fired for one row. The predicates are
/// independent; none of them short-circuits another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleHits {
    pub temp_high: bool,
    pub over_current: bool,
    pub cell_imbalance: bool,
    pub fast_temp_rise: bool,
}

impl RuleHits {
    /// True when any predicate fired.
    pub fn any(&self) -> bool {
        self.temp_high || self.over_current || self.cell_imbalance || self.fast_temp_rise
    }

    /// Stable label/value pairs, used for explanations and summary counts.
    pub fn labelled(&self) -> [(&'static str, bool); 4] {
        [
            ("temp_high", self.temp_high),
            ("over_current", self.over_current),
            ("cell_imbalance", self.cell_imbalance),
            ("fast_temp_rise", self.fast_temp_rise),
        ]
    }
}

/// Pack temperature above the ceiling. Boundary equality does not fire.
pub fn temp_high(sample: &TelemetrySample, rules: &RuleConfig) -> bool {
    sample.pack_temp > rules.max_temp
}

/// Absolute pack current above the ceiling.
pub fn over_current(sample: &TelemetrySample, rules: &RuleConfig) -> bool {
    sample.pack_current.abs() > rules.max_abs_current
}

/// Cell voltage spread above the ceiling.
pub fn cell_imbalance(features: &DerivedFeatures, rules: &RuleConfig) -> bool {
    features.cell_v_delta > rules.max_cell_delta
}

/// Temperature moving faster than the ceiling, in either direction.
pub fn fast_temp_rise(features: &DerivedFeatures, rules: &RuleConfig) -> bool {
    features.d_temp_dt.abs() > rules.max_dtemp_dt
}

/// Evaluate all predicates for one row.
pub fn evaluate_row(
    sample: &TelemetrySample,
    features: &DerivedFeatures,
    rules: &RuleConfig,
) -> RuleHits {
    RuleHits {
        temp_high: temp_high(sample, rules),
        over_current: over_current(sample, rules),
        cell_imbalance: cell_imbalance(features, rules),
        fast_temp_rise: fast_temp_rise(features, rules),
    }
}

/// Evaluate the rule set over a whole series, one [`RuleHits`] per row,
/// index-aligned with the input.
pub fn evaluate_series(
    series: &[TelemetrySample],
    features: &[DerivedFeatures],
    rules: &RuleConfig,
) -> Vec<RuleHits> {
    series
        .iter()
        .zip(features.iter())
        .map(|(sample, derived)| evaluate_row(sample, derived, rules))
        .collect()
}
