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

/// Per-row signals derived from the raw capture, consumed by both detectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedFeatures {
    /// Cell voltage spread in V.
    pub cell_v_delta: f64,
    /// Temperature rate of change in °C/s. The first row is 0.0 by
    /// convention; a non-positive time delta reuses the previous rate.
    pub d_temp_dt: f64,
}

/// Compute derived features for every row. Pure function over the series;
/// the raw samples are never touched.
pub fn derive_features(series: &[TelemetrySample]) -> Vec<DerivedFeatures> {
    let mut features = Vec::with_capacity(series.len());
    let mut previous_rate = 0.0;
    for (idx, sample) in series.iter().enumerate() {
        let d_temp_dt = if idx == 0 {
            0.0
        } else {
            let prior = &series[idx - 1];
            let dt = sample.time_s - prior.time_s;
            if dt > 0.0 {
                (sample.pack_temp - prior.pack_temp) / dt
            } else {
                previous_rate
            }
        };
        previous_rate = d_temp_dt;
        features.push(DerivedFeatures {
            cell_v_delta: sample.cell_delta(),
            d_temp_dt,
        });
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time_s: f64, pack_temp: f64, cell_v_min: f64, cell_v_max: f64) -> TelemetrySample {
        TelemetrySample {
            time_s,
            pack_voltage: 360.0,
            pack_current: 10.0,
            pack_temp,
            cell_v_min,
            cell_v_max,
        }
    }

    #[test]
    fn first_row_rate_is_zero() {
        let series = vec![sample(0.0, 30.0, 3.59, 3.61)];
        let features = derive_features(&series);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].d_temp_dt, 0.0);
        assert!((features[0].cell_v_delta - 0.02).abs() < 1e-12);
    }

    #[test]
    fn rate_uses_trailing_difference() {
        let series = vec![
            sample(0.0, 30.0, 3.59, 3.61),
            sample(2.0, 31.0, 3.59, 3.61),
            sample(3.0, 30.5, 3.59, 3.61),
        ];
        let features = derive_features(&series);
        assert!((features[1].d_temp_dt - 0.5).abs() < 1e-12);
        assert!((features[2].d_temp_dt + 0.5).abs() < 1e-12);
    }

    #[test]
    fn non_positive_time_delta_reuses_prior_rate() {
        // Validation rejects such input upstream, but the deriver itself
        // must not divide by zero.
        let series = vec![
            sample(0.0, 30.0, 3.59, 3.61),
            sample(1.0, 31.0, 3.59, 3.61),
            sample(1.0, 40.0, 3.59, 3.61),
        ];
        let features = derive_features(&series);
        assert!((features[1].d_temp_dt - 1.0).abs() < 1e-12);
        assert!((features[2].d_temp_dt - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_dt_at_second_row_falls_back_to_zero() {
        let series = vec![
            sample(0.0, 30.0, 3.59, 3.61),
            sample(0.0, 45.0, 3.59, 3.61),
        ];
        let features = derive_features(&series);
        assert_eq!(features[1].d_temp_dt, 0.0);
    }

    #[test]
    fn empty_series_yields_no_features() {
        assert!(derive_features(&[]).is_empty());
    }
}
