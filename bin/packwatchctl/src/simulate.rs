//! ---
//! pw_section: "05-cli-tooling"
//! pw_subsection: "binary"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Operator CLI for packwatch telemetry analysis."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use packwatch_logging::{pw_info, LogContext};
use packwatch_sim::{FaultEpisode, FaultPlan, GeneratorConfig, SignalGenerator};
use packwatch_telemetry::io::{write_series_csv, write_series_csv_to};

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Number of rows to synthesise
    #[arg(long, default_value_t = 2000)]
    rows: usize,

    /// Random seed for the generator
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Interval between samples in seconds
    #[arg(long, default_value_t = 1.0)]
    interval_s: f64,

    /// Output file path. Use '-' for stdout.
    #[arg(long, default_value = "telemetry.csv")]
    output: PathBuf,

    /// Disable fault injection entirely
    #[arg(long)]
    no_faults: bool,

    /// Path to a JSON list of explicit fault episodes, overriding random
    /// placement
    #[arg(long = "episodes", value_name = "FILE")]
    episodes_file: Option<PathBuf>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let faults = if args.no_faults {
        FaultPlan::None
    } else if let Some(path) = &args.episodes_file {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read episode file {}", path.display()))?;
        let episodes: Vec<FaultEpisode> = serde_json::from_str(&contents)
            .with_context(|| format!("invalid episode JSON {}", path.display()))?;
        FaultPlan::Episodes(episodes)
    } else {
        FaultPlan::default()
    };

    let config = GeneratorConfig {
        rows: args.rows,
        seed: args.seed,
        interval_s: args.interval_s,
        faults,
    };
    let generator = SignalGenerator::new(config)?;
    let series = generator.generate();

    if args.output.as_os_str() == "-" {
        write_series_csv_to(io::stdout().lock(), &series)?;
    } else {
        write_series_csv(&args.output, &series)?;
        let ctx = LogContext::new()
            .with_rows(series.len())
            .with_seed(args.seed)
            .with_stage("simulate");
        pw_info!(
            context = ctx,
            "generated {} rows -> {}",
            series.len(),
            args.output.display()
        );
    }
    Ok(())
}
