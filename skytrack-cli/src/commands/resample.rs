//! `skytrack resample` - export channel data on a fixed time grid.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use skytrack::config::ConfigFile;
use skytrack::export::{resample_aircraft, ExportedAircraft, ResamplingPeriod};
use skytrack::Flight;

use super::common::{load_flight, FlightLocation};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ResampleArgs {
    /// Flight document path or stored flight id
    pub flight: FlightLocation,

    /// Sample period: original, 10hz, 5hz, 2hz, 1hz, 0.2hz or 0.1hz
    #[arg(long, default_value_t = ResamplingPeriod::OneHz)]
    pub period: ResamplingPeriod,

    /// Output file (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ResampleArgs, config: &ConfigFile) -> Result<(), CliError> {
    let flight = load_flight(&args.flight, config)?;
    let exported = export(&flight, args.period);
    let json = serde_json::to_string_pretty(&exported)
        .map_err(|e| CliError::InvalidArgument(format!("Failed to serialise export: {}", e)))?;

    match args.output {
        Some(path) => {
            fs::write(&path, json).map_err(|error| CliError::FileWrite {
                path: path.clone(),
                error,
            })?;
            println!(
                "Exported {} aircraft at {} to {}",
                exported.len(),
                args.period,
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn export(flight: &Flight, period: ResamplingPeriod) -> Vec<ExportedAircraft> {
    flight
        .aircraft()
        .iter()
        .map(|aircraft| resample_aircraft(aircraft, period))
        .collect()
}
