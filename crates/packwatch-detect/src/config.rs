//! ---
//! pw_section: "02-detection-analytics"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Detection and scoring routines for pack telemetry."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ConfigError, Result};

fn default_max_temp() -> f64 {
    55.0
}

fn default_max_abs_current() -> f64 {
    160.0
}

fn default_max_cell_delta() -> f64 {
    0.25
}

fn default_max_dtemp_dt() -> f64 {
    0.6
}

fn default_enabled() -> bool {
    true
}

fn default_contamination() -> f64 {
    0.03
}

fn default_seed() -> u64 {
    7
}

fn default_num_trees() -> usize {
    200
}

fn default_sample_size() -> usize {
    256
}

fn default_max_depth() -> usize {
    8
}

/// Deterministic per-row thresholds for the rule engine. All values are
/// user-tunable and must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Pack temperature ceiling in °C.
    #[serde(default = "default_max_temp")]
    pub max_temp: f64,
    /// Absolute pack current ceiling in A.
    #[serde(default = "default_max_abs_current")]
    pub max_abs_current: f64,
    /// Cell voltage spread ceiling in V.
    #[serde(default = "default_max_cell_delta")]
    pub max_cell_delta: f64,
    /// Absolute temperature rate-of-change ceiling in °C/s.
    #[serde(default = "default_max_dtemp_dt")]
    pub max_dtemp_dt: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_temp: default_max_temp(),
            max_abs_current: default_max_abs_current(),
            max_cell_delta: default_max_cell_delta(),
            max_dtemp_dt: default_max_dtemp_dt(),
        }
    }
}

impl RuleConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let thresholds: [(&'static str, f64); 4] = [
            ("max_temp", self.max_temp),
            ("max_abs_current", self.max_abs_current),
            ("max_cell_delta", self.max_cell_delta),
            ("max_dtemp_dt", self.max_dtemp_dt),
        ];
        for (field, value) in thresholds {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveThreshold { field, value });
            }
        }
        Ok(())
    }
}

/// Configuration of the unsupervised outlier model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// When false the scorer returns all-false flags without fitting.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Expected fraction of anomalous rows, in (0, 0.5].
    #[serde(default = "default_contamination")]
    pub contamination: f64,
    /// Seed for the model's internal randomness; fixed seed means
    /// reproducible flags on identical input.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of isolation trees in the forest.
    #[serde(default = "default_num_trees")]
    pub num_trees: usize,
    /// Per-tree subsample size (capped at the row count).
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Maximum isolation tree depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            contamination: default_contamination(),
            seed: default_seed(),
            num_trees: default_num_trees(),
            sample_size: default_sample_size(),
            max_depth: default_max_depth(),
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(ConfigError::ContaminationOutOfRange(self.contamination));
        }
        let parameters: [(&'static str, usize); 3] = [
            ("num_trees", self.num_trees),
            ("sample_size", self.sample_size),
            ("max_depth", self.max_depth),
        ];
        for (field, value) in parameters {
            if value == 0 {
                return Err(ConfigError::ZeroModelParameter { field });
            }
        }
        Ok(())
    }
}

/// Full configuration surface consumed by a detection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl DetectionConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.rules.validate()?;
        self.model.validate()?;
        Ok(())
    }

    /// Load a configuration file, accepting JSON or YAML by sniffing the
    /// leading byte. Validation runs before the config is handed out.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;
        let config: Self = if data.trim_start().starts_with('{') {
            serde_json::from_str(&data)?
        } else {
            serde_yaml::from_str(&data)?
        };
        config.validate()?;
        debug!(path = %path.as_ref().display(), "detection config loaded");
        Ok(config)
    }
}
