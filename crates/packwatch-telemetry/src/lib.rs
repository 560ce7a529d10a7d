//! ---
//! pw_section: "01-telemetry-core"
//! pw_subsection: "01-bootstrap"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Telemetry model module exports and shared types."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
//! Battery pack telemetry primitives for the packwatch workspace.
//!
//! This crate owns the sample/series data model, the required-column schema
//! contract shared with external capture tooling, and CSV/JSON loaders. The
//! detection crates treat everything here as read-only input.

pub mod errors;
pub mod io;
pub mod sample;
pub mod schema;

pub use errors::{Result, TelemetryError};
pub use io::{load_series, load_series_from_csv, load_series_from_json, write_series_csv};
pub use sample::{TelemetrySample, TelemetrySeries};
pub use schema::{validate_series, REQUIRED_COLUMNS};
