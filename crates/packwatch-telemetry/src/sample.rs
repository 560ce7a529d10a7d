//! ---
//! pw_section: "01-telemetry-core"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Telemetry model module exports and shared types."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

/// One telemetry record captured from the pack bus at a single sample instant.
///
/// Units are fixed by the capture contract: seconds, volts, amps (signed,
/// discharge positive), degrees Celsius. `cell_v_min`/`cell_v_max` bound the
/// per-cell voltage dispersion across the pack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub time_s: f64,
    pub pack_voltage: f64,
    pub pack_current: f64,
    pub pack_temp: f64,
    pub cell_v_min: f64,
    pub cell_v_max: f64,
}

impl TelemetrySample {
    /// Voltage spread across cells at this instant.
    pub fn cell_delta(&self) -> f64 {
        self.cell_v_max - self.cell_v_min
    }
}

/// Ordered telemetry capture, sorted by `time_s` ascending with no duplicate
/// timestamps. Raw fields are never mutated once handed to detection.
pub type TelemetrySeries = Vec<TelemetrySample>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_delta_is_max_minus_min() {
        let sample = TelemetrySample {
            time_s: 0.0,
            pack_voltage: 360.0,
            pack_current: 12.0,
            pack_temp: 30.0,
            cell_v_min: 3.58,
            cell_v_max: 3.63,
        };
        assert!((sample.cell_delta() - 0.05).abs() < 1e-12);
    }
}
