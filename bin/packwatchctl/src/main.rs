//! ---
//! pw_section: "05-cli-tooling"
//! pw_subsection: "binary"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Operator CLI for packwatch telemetry analysis."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use anyhow::Result;
use clap::{Parser, Subcommand};
use packwatch_logging as logging;

mod detect;
mod simulate;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Packwatch battery telemetry analysis utility",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Generate synthetic pack telemetry")]
    Simulate(simulate::SimulateArgs),
    #[command(about = "Run anomaly detection over a telemetry capture")]
    Detect(detect::DetectArgs),
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate(args) => simulate::run(args)?,
        Commands::Detect(args) => detect::run(args)?,
    }
    Ok(())
}
