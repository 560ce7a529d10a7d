//! ---
//! pw_section: "04-simulation-test-harness"
//! pw_subsection: "01-bootstrap"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Simulation module exports and shared types."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
//! Synthetic pack telemetry for packwatch detector validation.
//!
//! The generator produces seeded, byte-reproducible drive-cycle baselines
//! with optional injected fault episodes, which is what the detection
//! regression suites are built on. Writing captures to disk is the CLI's
//! concern, not this crate's.

pub mod faults;
pub mod generator;

pub use faults::{apply_episode, plan_episodes, FaultEpisode, FaultKind, FaultPlan};
pub use generator::{GeneratorConfig, SignalGenerator};
