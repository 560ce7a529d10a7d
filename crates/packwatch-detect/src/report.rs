//! ---
//! pw_section: "02-detection-analytics"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Detection and scoring routines for pack telemetry."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use std::{fs, io::Write, path::Path};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use packwatch_telemetry::TelemetrySample;

use crate::config::DetectionConfig;
use crate::errors::Result;
use crate::DetectionRun;

/// Envelope written alongside the augmented capture so downstream consumers
/// can interpret a run without re-deriving its configuration.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub timestamp: DateTime<Utc>,
    pub run_id: Uuid,
    pub engine_version: String,
    pub config: DetectionConfig,
    /// True when the outlier model could not be fit and the run fell back to
    /// rule-only detection.
    pub ml_degraded: bool,
    pub summary: crate::aggregate::DetectionSummary,
}

impl DetectionReport {
    pub fn new(config: DetectionConfig, run: &DetectionRun) -> Self {
        Self {
            timestamp: Utc::now(),
            run_id: Uuid::new_v4(),
            engine_version: env!("CARGO_PKG_VERSION").to_owned(),
            config,
            ml_degraded: run.ml_degraded,
            summary: run.summary.clone(),
        }
    }

    pub fn exporter(&self) -> ReportExporter<'_> {
        ReportExporter::new(self)
    }
}

#[derive(Debug)]
pub struct ReportExporter<'a> {
    report: &'a DetectionReport,
}

impl<'a> ReportExporter<'a> {
    pub fn new(report: &'a DetectionReport) -> Self {
        Self { report }
    }

    /// Write the JSON report, creating the parent directory when needed.
    pub fn export(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let envelope = ReportEnvelope {
            schema: report_schema(),
            data: self.report,
        };
        let serialized = serde_json::to_string_pretty(&envelope)?;
        fs::write(path, serialized)?;
        info!("detection report exported to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a, T: Serialize> {
    schema: serde_json::Value,
    data: &'a T,
}

fn report_schema() -> serde_json::Value {
    json!({
        "name": "packwatch.detection_report",
        "version": 1,
        "augmented_columns": [
            "cell_v_delta", "d_temp_dt",
            "r_temp_high", "r_over_current", "r_cell_imbalance", "r_fast_temp_rise",
            "rule_flag", "ml_flag", "ml_score", "any_flag"
        ],
    })
}

/// One row of the augmented export: raw capture columns plus derived signals
/// and every per-row verdict.
#[derive(Debug, Serialize)]
struct AugmentedRow {
    time_s: f64,
    pack_voltage: f64,
    pack_current: f64,
    pack_temp: f64,
    cell_v_min: f64,
    cell_v_max: f64,
    cell_v_delta: f64,
    d_temp_dt: f64,
    r_temp_high: bool,
    r_over_current: bool,
    r_cell_imbalance: bool,
    r_fast_temp_rise: bool,
    rule_flag: bool,
    ml_flag: bool,
    ml_score: f64,
    any_flag: bool,
}

/// Write the augmented capture as CSV to a file path.
pub fn write_augmented_csv(
    path: impl AsRef<Path>,
    series: &[TelemetrySample],
    run: &DetectionRun,
) -> Result<()> {
    let file = fs::File::create(path.as_ref())?;
    write_augmented_csv_to(file, series, run)
}

/// Write the augmented capture as CSV to any writer.
pub fn write_augmented_csv_to<W: Write>(
    writer: W,
    series: &[TelemetrySample],
    run: &DetectionRun,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (idx, sample) in series.iter().enumerate() {
        let derived = &run.features[idx];
        let hits = &run.hits[idx];
        let result = &run.results[idx];
        csv_writer.serialize(AugmentedRow {
            time_s: sample.time_s,
            pack_voltage: sample.pack_voltage,
            pack_current: sample.pack_current,
            pack_temp: sample.pack_temp,
            cell_v_min: sample.cell_v_min,
            cell_v_max: sample.cell_v_max,
            cell_v_delta: derived.cell_v_delta,
            d_temp_dt: derived.d_temp_dt,
            r_temp_high: hits.temp_high,
            r_over_current: hits.over_current,
            r_cell_imbalance: hits.cell_imbalance,
            r_fast_temp_rise: hits.fast_temp_rise,
            rule_flag: result.rule_flag,
            ml_flag: result.ml_flag,
            ml_score: run.ml_scores[idx],
            any_flag: result.any_flag,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_detection;
    use tempfile::tempdir;

    fn small_series() -> Vec<TelemetrySample> {
        (0..12)
            .map(|i| TelemetrySample {
                time_s: i as f64,
                pack_voltage: 360.0 + i as f64 * 0.1,
                pack_current: 20.0 + i as f64,
                pack_temp: 30.0 + (i as f64 * 0.05),
                cell_v_min: 3.59,
                cell_v_max: 3.61,
            })
            .collect()
    }

    #[test]
    fn report_round_trips_through_json() {
        let series = small_series();
        let config = DetectionConfig::default();
        let run = run_detection(&series, &config).unwrap();
        let report = DetectionReport::new(config, &run);

        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("detection.json");
        report.exporter().export(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["schema"]["name"], "packwatch.detection_report");
        assert_eq!(value["data"]["summary"]["total_rows"], 12);
    }

    #[test]
    fn augmented_csv_has_header_and_row_per_sample() {
        let series = small_series();
        let config = DetectionConfig::default();
        let run = run_detection(&series, &config).unwrap();

        let mut buffer = Vec::new();
        write_augmented_csv_to(&mut buffer, &series, &run).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), series.len() + 1);
        assert!(lines[0].starts_with("time_s,pack_voltage"));
        assert!(lines[0].ends_with("ml_score,any_flag"));
    }
}
