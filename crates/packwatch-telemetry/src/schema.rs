//! ---
//! pw_section: "01-telemetry-core"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Telemetry model module exports and shared types."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use crate::errors::{Result, TelemetryError};
use crate::sample::TelemetrySample;

/// Columns a telemetry source must provide. External capture tooling and the
/// CSV loader both key off this list.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "time_s",
    "pack_voltage",
    "pack_current",
    "pack_temp",
    "cell_v_min",
    "cell_v_max",
];

/// Compare a header row against [`REQUIRED_COLUMNS`], returning every absent
/// column rather than the first one found.
pub fn missing_columns<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = headers.into_iter().collect();
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !present.contains(required))
        .map(|required| (*required).to_owned())
        .collect()
}

/// Validate a fully-typed series before any detection pass runs.
///
/// Rejects non-finite fields, non-increasing timestamps, and inverted cell
/// voltage bounds. The first offending row aborts the run; detection never
/// silently drops rows.
pub fn validate_series(series: &[TelemetrySample]) -> Result<()> {
    let mut previous_time: Option<f64> = None;
    for (row, sample) in series.iter().enumerate() {
        let fields: [(&'static str, f64); 6] = [
            ("time_s", sample.time_s),
            ("pack_voltage", sample.pack_voltage),
            ("pack_current", sample.pack_current),
            ("pack_temp", sample.pack_temp),
            ("cell_v_min", sample.cell_v_min),
            ("cell_v_max", sample.cell_v_max),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TelemetryError::NonFiniteField { row, field });
            }
        }
        if let Some(previous) = previous_time {
            if sample.time_s <= previous {
                return Err(TelemetryError::NonMonotonicTime {
                    row,
                    previous,
                    current: sample.time_s,
                });
            }
        }
        if sample.cell_v_max < sample.cell_v_min {
            return Err(TelemetryError::CellBoundsInverted {
                row,
                cell_v_min: sample.cell_v_min,
                cell_v_max: sample.cell_v_max,
            });
        }
        previous_time = Some(sample.time_s);
    }
    Ok(())
}
