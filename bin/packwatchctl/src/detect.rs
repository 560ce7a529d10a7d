//! ---
//! pw_section: "05-cli-tooling"
//! pw_subsection: "binary"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Operator CLI for packwatch telemetry analysis."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use packwatch_detect::{
    run_detection, write_augmented_csv, write_augmented_csv_to, DetectionConfig, DetectionReport,
};
use packwatch_logging::{pw_info, pw_warn, LogContext};
use packwatch_telemetry::load_series;

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Telemetry capture to analyse (CSV, or a JSON array of samples)
    input: PathBuf,

    /// Detection configuration file (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override: pack temperature ceiling in °C
    #[arg(long)]
    max_temp: Option<f64>,

    /// Override: absolute pack current ceiling in A
    #[arg(long)]
    max_abs_current: Option<f64>,

    /// Override: cell voltage spread ceiling in V
    #[arg(long)]
    max_cell_delta: Option<f64>,

    /// Override: temperature rate-of-change ceiling in °C/s
    #[arg(long)]
    max_dtemp_dt: Option<f64>,

    /// Override: expected anomalous fraction in (0, 0.5]
    #[arg(long)]
    contamination: Option<f64>,

    /// Skip the outlier model for this run
    #[arg(long)]
    no_ml: bool,

    /// Write the augmented capture as CSV. Use '-' for stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,
}

pub fn run(args: DetectArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => DetectionConfig::load_from_file(path)
            .with_context(|| format!("unable to load config {}", path.display()))?,
        None => DetectionConfig::default(),
    };
    if let Some(max_temp) = args.max_temp {
        config.rules.max_temp = max_temp;
    }
    if let Some(max_abs_current) = args.max_abs_current {
        config.rules.max_abs_current = max_abs_current;
    }
    if let Some(max_cell_delta) = args.max_cell_delta {
        config.rules.max_cell_delta = max_cell_delta;
    }
    if let Some(max_dtemp_dt) = args.max_dtemp_dt {
        config.rules.max_dtemp_dt = max_dtemp_dt;
    }
    if let Some(contamination) = args.contamination {
        config.model.contamination = contamination;
    }
    if args.no_ml {
        config.model.enabled = false;
    }

    let input_display = args.input.display().to_string();
    let series = load_series(&args.input)
        .with_context(|| format!("unable to load telemetry from {input_display}"))?;

    let ctx = LogContext::new()
        .with_source(&input_display)
        .with_rows(series.len())
        .with_stage("detect");
    pw_info!(context = ctx.clone(), "starting detection pass");

    let run = run_detection(&series, &config)?;
    if run.ml_degraded {
        pw_warn!(
            context = ctx.clone(),
            "outlier model unavailable; showing rule-based results only"
        );
    }

    let summary = &run.summary;
    println!("rows analysed ....... {}", summary.total_rows);
    println!("rule flags .......... {}", summary.rule_flagged);
    println!("model flags ......... {}", summary.ml_flagged);
    println!("flagged (union) ..... {}", summary.total_flagged);
    for (name, count) in &summary.rule_breakdown {
        println!("  {name:<18} {count}");
    }

    if let Some(path) = &args.output {
        if path.as_os_str() == "-" {
            write_augmented_csv_to(io::stdout().lock(), &series, &run)?;
        } else {
            write_augmented_csv(path, &series, &run)?;
            pw_info!(
                context = ctx.clone(),
                "augmented capture written to {}",
                path.display()
            );
        }
    }
    if let Some(path) = &args.report {
        let report = DetectionReport::new(config, &run);
        report.exporter().export(path)?;
    }
    Ok(())
}
