//! SkyTrack CLI - Command-line interface
//!
//! Record, augment, inspect, export and replay flight simulator telemetry.

mod commands;
mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use commands::augment::AugmentArgs;
use commands::config::ConfigCommands;
use commands::info::InfoArgs;
use commands::record::RecordArgs;
use commands::replay::ReplayArgs;
use commands::resample::ResampleArgs;
use error::CliError;
use skytrack::config::ConfigFile;
use skytrack::logging::init_logging;

#[derive(Parser)]
#[command(name = "skytrack")]
#[command(version, about = "Record and replay flight simulator telemetry", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.skytrack/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a flight, or list stored flights
    Info(InfoArgs),

    /// Synthesise attitude, velocity and take-off/landing procedures
    Augment(AugmentArgs),

    /// Record a synthetic flight path
    Record(RecordArgs),

    /// Replay a flight to the terminal
    Replay(ReplayArgs),

    /// Export channel data on a fixed time grid as JSON
    Resample(ResampleArgs),

    /// Manage configuration settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Config(command) => commands::config::run(command, config_path),
        Commands::Info(args) => with_config(config_path, |c| commands::info::run(args, c)),
        Commands::Augment(args) => with_config(config_path, |c| commands::augment::run(args, c)),
        Commands::Record(args) => with_config(config_path, |c| commands::record::run(args, c)),
        Commands::Replay(args) => with_config(config_path, |c| commands::replay::run(args, c)),
        Commands::Resample(args) => {
            with_config(config_path, |c| commands::resample::run(args, c))
        }
    }
}

/// Load the configuration and start logging before running `command`.
fn with_config<F>(config_path: Option<&Path>, command: F) -> Result<(), CliError>
where
    F: FnOnce(&ConfigFile) -> Result<(), CliError>,
{
    let config = commands::common::load_config(config_path)?;
    let _logging_guard = init_logging(&config.logging.directory, &config.logging.file)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    tracing::debug!(config = ?config_path, "Configuration loaded");

    command(&config)
}
