//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use indicatif::ProgressStyle;
use skytrack::config::ConfigFile;
use skytrack::persistence::{read_flight, write_flight, FlightRepository, JsonFileRepository};
use skytrack::Flight;
use tokio::sync::Notify;

use crate::error::CliError;

/// Where a flight is read from or written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightLocation {
    /// A JSON flight document.
    File(PathBuf),
    /// A flight in the configured repository, by id.
    Stored(u64),
}

impl FromStr for FlightLocation {
    type Err = String;

    /// A bare number is a repository id unless a file of that name exists.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("flight location must not be empty".to_string());
        }
        match s.parse::<u64>() {
            Ok(id) if !Path::new(s).exists() => Ok(FlightLocation::Stored(id)),
            _ => Ok(FlightLocation::File(PathBuf::from(s))),
        }
    }
}

/// Load the configuration from `path`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

pub fn repository(config: &ConfigFile) -> JsonFileRepository {
    JsonFileRepository::with_policies(&config.storage.directory, config.channel_policies())
}

pub fn load_flight(location: &FlightLocation, config: &ConfigFile) -> Result<Flight, CliError> {
    let flight = match location {
        FlightLocation::File(path) => read_flight(path, config.channel_policies())?,
        FlightLocation::Stored(id) => repository(config).load(*id)?,
    };
    Ok(flight)
}

/// Write `flight` to `location` and describe where it went.
pub fn save_flight(
    location: &FlightLocation,
    flight: &mut Flight,
    config: &ConfigFile,
) -> Result<String, CliError> {
    match location {
        FlightLocation::File(path) => {
            write_flight(path, flight)?;
            Ok(path.display().to_string())
        }
        FlightLocation::Stored(id) => {
            flight.info_mut().id = Some(*id);
            let id = repository(config).store(flight)?;
            Ok(format!("flight {}", id))
        }
    }
}

/// Format milliseconds as `hh:mm:ss.mmm`.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1_000) % 60;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, ms % 1_000)
}

/// Progress bar style, falling back to the default bar on a bad template.
pub fn progress_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Install a Ctrl+C handler that wakes the returned notifier.
pub fn shutdown_signal() -> Result<Arc<Notify>, CliError> {
    let shutdown = Arc::new(Notify::new());
    let shutdown_clone = shutdown.clone();

    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping...");
        shutdown_clone.notify_one();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    Ok(shutdown)
}

/// Single-threaded runtime driving the clock ticks.
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(CliError::Runtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00:00.000");
        assert_eq!(format_duration(61_250), "00:01:01.250");
        assert_eq!(format_duration(3_723_004), "01:02:03.004");
        assert_eq!(format_duration(-10), "00:00:00.000");
    }

    #[test]
    fn test_flight_location_parsing() {
        assert_eq!(
            "42".parse::<FlightLocation>().unwrap(),
            FlightLocation::Stored(42)
        );
        assert_eq!(
            "flights/circuit.json".parse::<FlightLocation>().unwrap(),
            FlightLocation::File(PathBuf::from("flights/circuit.json"))
        );
        assert!("  ".parse::<FlightLocation>().is_err());
    }

    #[test]
    fn test_save_and_load_stored_flight() {
        let temp = TempDir::new().unwrap();
        let mut config = ConfigFile::default();
        config.storage.directory = temp.path().to_path_buf();

        let mut flight = Flight::new();
        flight.info_mut().title = "Stored".to_string();
        let location = FlightLocation::Stored(3);
        assert_eq!(save_flight(&location, &mut flight, &config).unwrap(), "flight 3");

        let loaded = load_flight(&location, &config).unwrap();
        assert_eq!(loaded.info().title, "Stored");
    }

    proptest! {
        #[test]
        fn test_format_duration_round_trips_fields(ms in 0i64..360_000_000) {
            let text = format_duration(ms);
            let (clock, millis) = text.split_once('.').unwrap();
            let fields: Vec<i64> = clock.split(':').map(|f| f.parse().unwrap()).collect();
            let total = ((fields[0] * 60 + fields[1]) * 60 + fields[2]) * 1_000
                + millis.parse::<i64>().unwrap();
            prop_assert_eq!(total, ms);
        }
    }
}
