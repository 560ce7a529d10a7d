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
use statrs::statistics::Statistics;

use crate::features::DerivedFeatures;

/// Number of model features per row.
pub const FEATURE_COUNT: usize = 5;

/// Feature names in matrix column order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "pack_voltage",
    "pack_current",
    "pack_temp",
    "cell_v_delta",
    "d_temp_dt",
];

/// Assemble the model's feature matrix from raw samples and derived signals.
pub fn feature_matrix(
    series: &[TelemetrySample],
    features: &[DerivedFeatures],
) -> Vec<[f64; FEATURE_COUNT]> {
    series
        .iter()
        .zip(features.iter())
        .map(|(sample, derived)| {
            [
                sample.pack_voltage,
                sample.pack_current,
                sample.pack_temp,
                derived.cell_v_delta,
                derived.d_temp_dt,
            ]
        })
        .collect()
}

/// Column-wise z-scaler fitted over the full batch, then applied to the same
/// batch. Offline by design; there is no incremental update path.
#[derive(Debug, Clone)]
pub struct Standardizer {
    means: [f64; FEATURE_COUNT],
    std_devs: [f64; FEATURE_COUNT],
}

impl Standardizer {
    /// Fit phase: per-column mean and population standard deviation.
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Self {
        let mut means = [0.0; FEATURE_COUNT];
        let mut std_devs = [0.0; FEATURE_COUNT];
        for column in 0..FEATURE_COUNT {
            let values: Vec<f64> = rows.iter().map(|row| row[column]).collect();
            means[column] = values.iter().mean();
            std_devs[column] = values.iter().population_std_dev();
        }
        Self { means, std_devs }
    }

    /// Apply phase: center and scale each column. A zero-variance column maps
    /// to 0.0 so constant signals carry no weight in the model.
    pub fn apply(&self, rows: &[[f64; FEATURE_COUNT]]) -> Vec<[f64; FEATURE_COUNT]> {
        rows.iter()
            .map(|row| {
                let mut scaled = [0.0; FEATURE_COUNT];
                for column in 0..FEATURE_COUNT {
                    let std_dev = self.std_devs[column];
                    scaled[column] = if std_dev > 0.0 {
                        (row[column] - self.means[column]) / std_dev
                    } else {
                        0.0
                    };
                }
                scaled
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardized_columns_have_zero_mean_unit_variance() {
        let rows: Vec<[f64; FEATURE_COUNT]> = (0..100)
            .map(|i| {
                let x = i as f64;
                [x, 2.0 * x + 1.0, -x, x * x, 0.5 * x]
            })
            .collect();
        let scaler = Standardizer::fit(&rows);
        let scaled = scaler.apply(&rows);

        for column in 0..FEATURE_COUNT {
            let values: Vec<f64> = scaled.iter().map(|row| row[column]).collect();
            let mean = values.iter().mean();
            let std_dev = values.iter().population_std_dev();
            assert!(mean.abs() < 1e-9, "column {column} mean {mean}");
            assert!((std_dev - 1.0).abs() < 1e-9, "column {column} std {std_dev}");
        }
    }

    #[test]
    fn zero_variance_column_maps_to_zero() {
        let rows: Vec<[f64; FEATURE_COUNT]> = (0..20)
            .map(|i| [i as f64, 42.0, i as f64, 42.0, i as f64])
            .collect();
        let scaler = Standardizer::fit(&rows);
        let scaled = scaler.apply(&rows);
        assert!(scaled.iter().all(|row| row[1] == 0.0 && row[3] == 0.0));
    }

    #[test]
    fn matrix_columns_follow_declared_order() {
        let series = vec![TelemetrySample {
            time_s: 0.0,
            pack_voltage: 360.0,
            pack_current: -20.0,
            pack_temp: 31.0,
            cell_v_min: 3.59,
            cell_v_max: 3.62,
        }];
        let features = vec![DerivedFeatures {
            cell_v_delta: 0.03,
            d_temp_dt: 0.2,
        }];
        let matrix = feature_matrix(&series, &features);
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix[0], [360.0, -20.0, 31.0, 0.03, 0.2]);
    }
}
