//! ---
//! pw_section: "04-simulation-test-harness"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Synthetic pack telemetry synthesis."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use anyhow::{ensure, Result};
use rand::prelude::*;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use packwatch_telemetry::{TelemetrySample, TelemetrySeries};

use crate::faults::{apply_episode, plan_episodes, FaultPlan};

const NOMINAL_PACK_VOLTAGE_V: f64 = 360.0;
const LOAD_SWELL_V: f64 = 5.0;
const VOLTAGE_PERIOD_S: f64 = 60.0;
const DRAIN_DROOP_V_PER_AH: f64 = 0.5;
const CURRENT_SWING_A: f64 = 50.0;
const CURRENT_PERIOD_S: f64 = 30.0;
const AMBIENT_TEMP_C: f64 = 25.0;
const INITIAL_TEMP_C: f64 = 30.0;
const THERMAL_TAU_S: f64 = 120.0;
const HEATING_C_PER_A2: f64 = 0.0048;
const CELLS_IN_SERIES: f64 = 100.0;
const SPREAD_FLOOR_V: f64 = 0.01;
const SPREAD_CEIL_V: f64 = 0.08;

fn default_rows() -> usize {
    2000
}

fn default_seed() -> u64 {
    7
}

fn default_interval_s() -> f64 {
    1.0
}

/// Shape of a synthetic capture: how many rows, at what cadence, from which
/// seed, and which faults to inject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Sampling interval in seconds.
    #[serde(default = "default_interval_s")]
    pub interval_s: f64,
    #[serde(default)]
    pub faults: FaultPlan,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            seed: default_seed(),
            interval_s: default_interval_s(),
            faults: FaultPlan::default(),
        }
    }
}

/// Synthesises plausible pack telemetry for detector validation.
///
/// The baseline models a drive cycle: current follows a noisy slow duty
/// oscillation, voltage swells with it and sags as charge drains, and pack
/// temperature lags an I²-heating target through a first-order thermal model.
/// Cell voltages track the pack with a clipped Gaussian dispersion.
#[derive(Debug)]
pub struct SignalGenerator {
    config: GeneratorConfig,
    voltage_noise: Normal<f64>,
    current_noise: Normal<f64>,
    temp_noise: Normal<f64>,
    spread_noise: Normal<f64>,
}

impl SignalGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        ensure!(
            config.interval_s > 0.0,
            "interval_s must be positive, got {}",
            config.interval_s
        );
        Ok(Self {
            config,
            voltage_noise: Normal::new(0.0, 0.8).expect("sigma must be positive"),
            current_noise: Normal::new(0.0, 5.0).expect("sigma must be positive"),
            temp_noise: Normal::new(0.0, 0.1).expect("sigma must be positive"),
            spread_noise: Normal::new(0.03, 0.01).expect("sigma must be positive"),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce the full series. The rng is re-seeded on every call, so the
    /// same configuration always reproduces the same series, and the
    /// generator can be reused.
    pub fn generate(&self) -> TelemetrySeries {
        let rows = self.config.rows;
        let interval = self.config.interval_s;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut series = TelemetrySeries::with_capacity(rows);
        let mut temperature = INITIAL_TEMP_C;
        let mut drained_ah = 0.0;
        for i in 0..rows {
            let t = i as f64 * interval;

            let pack_current =
                CURRENT_SWING_A * (t / CURRENT_PERIOD_S).sin() + self.current_noise.sample(&mut rng);
            drained_ah += pack_current.max(0.0) * interval / 3600.0;

            let pack_voltage = NOMINAL_PACK_VOLTAGE_V
                + LOAD_SWELL_V * (t / VOLTAGE_PERIOD_S).sin()
                - DRAIN_DROOP_V_PER_AH * drained_ah
                + self.voltage_noise.sample(&mut rng);

            let heating_target = AMBIENT_TEMP_C + HEATING_C_PER_A2 * pack_current * pack_current;
            temperature += interval / THERMAL_TAU_S * (heating_target - temperature);
            let pack_temp = temperature + self.temp_noise.sample(&mut rng);

            let spread = self
                .spread_noise
                .sample(&mut rng)
                .clamp(SPREAD_FLOOR_V, SPREAD_CEIL_V);
            let cell_v_mean = pack_voltage / CELLS_IN_SERIES;

            series.push(TelemetrySample {
                time_s: t,
                pack_voltage,
                pack_current,
                pack_temp,
                cell_v_min: cell_v_mean - spread / 2.0,
                cell_v_max: cell_v_mean + spread / 2.0,
            });
        }

        // Captures of 0 or 1 rows stay fault-free by contract.
        if rows >= 2 {
            let episodes = plan_episodes(&self.config.faults, rows, &mut rng);
            for episode in &episodes {
                apply_episode(&mut series, episode);
            }
            debug!(
                rows,
                seed = self.config.seed,
                episodes = episodes.len(),
                "synthetic series generated"
            );
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faults::{FaultEpisode, FaultKind};
    use packwatch_telemetry::validate_series;

    fn config(rows: usize, faults: FaultPlan) -> GeneratorConfig {
        GeneratorConfig {
            rows,
            seed: 7,
            interval_s: 1.0,
            faults,
        }
    }

    #[test]
    fn identical_seeds_reproduce_identical_series() {
        let first = SignalGenerator::new(config(1500, FaultPlan::default()))
            .unwrap()
            .generate();
        let second = SignalGenerator::new(config(1500, FaultPlan::default()))
            .unwrap()
            .generate();
        assert_eq!(first, second);
    }

    #[test]
    fn repeated_calls_on_one_generator_are_stable() {
        let generator = SignalGenerator::new(config(300, FaultPlan::default())).unwrap();
        assert_eq!(generator.generate(), generator.generate());
    }

    #[test]
    fn different_seeds_differ() {
        let base = config(500, FaultPlan::None);
        let mut other = base.clone();
        other.seed = 8;
        let first = SignalGenerator::new(base).unwrap().generate();
        let second = SignalGenerator::new(other).unwrap().generate();
        assert_ne!(first, second);
    }

    #[test]
    fn generated_series_passes_schema_validation() {
        let series = SignalGenerator::new(config(2000, FaultPlan::default()))
            .unwrap()
            .generate();
        assert_eq!(series.len(), 2000);
        validate_series(&series).unwrap();
    }

    #[test]
    fn zero_and_one_row_captures_are_trivially_valid() {
        let empty = SignalGenerator::new(config(0, FaultPlan::default()))
            .unwrap()
            .generate();
        assert!(empty.is_empty());

        let single = SignalGenerator::new(config(1, FaultPlan::default()))
            .unwrap()
            .generate();
        assert_eq!(single.len(), 1);
        validate_series(&single).unwrap();
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        let mut bad = config(10, FaultPlan::None);
        bad.interval_s = 0.0;
        assert!(SignalGenerator::new(bad).is_err());
    }

    #[test]
    fn interval_scales_timestamps() {
        let mut cfg = config(5, FaultPlan::None);
        cfg.interval_s = 0.5;
        let series = SignalGenerator::new(cfg).unwrap().generate();
        assert!((series[4].time_s - 2.0).abs() < 1e-12);
    }

    #[test]
    fn explicit_episodes_perturb_only_their_window() {
        let clean = SignalGenerator::new(config(600, FaultPlan::None))
            .unwrap()
            .generate();
        let episode = FaultEpisode {
            kind: FaultKind::Overheat,
            start: 200,
            len: 50,
            magnitude: 70.0,
        };
        let faulty = SignalGenerator::new(config(600, FaultPlan::Episodes(vec![episode])))
            .unwrap()
            .generate();

        for row in 0..600 {
            if (200..250).contains(&row) {
                assert!(
                    faulty[row].pack_temp > clean[row].pack_temp + 30.0,
                    "row {row} should be heated"
                );
            } else {
                assert_eq!(faulty[row], clean[row], "row {row} should be untouched");
            }
        }
    }

    #[test]
    fn baseline_stays_inside_rule_thresholds() {
        let series = SignalGenerator::new(config(2000, FaultPlan::None))
            .unwrap()
            .generate();
        for sample in &series {
            assert!(sample.pack_temp < 55.0);
            assert!(sample.pack_current.abs() < 160.0);
            assert!(sample.cell_delta() <= 0.08 + 1e-12);
        }
    }
}
