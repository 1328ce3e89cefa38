//! `skytrack record` - record a synthetic flight path.

use std::time::{Duration, Instant};

use clap::Args;
use indicatif::ProgressBar;
use skytrack::clock::{PlaybackClock, SampleRate, TickEvent};
use skytrack::config::ConfigFile;
use skytrack::connect::PathCreator;
use skytrack::persistence::FlightRepository;
use skytrack::Flight;

use super::common::{
    format_duration, progress_style, repository, runtime, save_flight, shutdown_signal,
    FlightLocation,
};
use crate::error::CliError;

/// Capture loop period when recording at `auto` rate.
const AUTO_TICK_MS: u64 = 16;

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Recording length in seconds; runs until Ctrl+C when omitted
    #[arg(long)]
    pub duration: Option<f64>,

    /// Sample rate in Hz, or `auto` (overrides recording.sample_rate)
    #[arg(long)]
    pub rate: Option<SampleRate>,

    /// Seed for a reproducible flight path
    #[arg(long)]
    pub seed: Option<u64>,

    /// Flight document path or stored flight id (default: a new stored flight)
    #[arg(long, short)]
    pub output: Option<FlightLocation>,

    /// Flight title
    #[arg(long, default_value = "Recorded flight")]
    pub title: String,
}

pub fn run(args: RecordArgs, config: &ConfigFile) -> Result<(), CliError> {
    let limit = args.duration.map(recording_limit).transpose()?;

    let mut clock_config = config.clock_config();
    if let Some(rate) = args.rate {
        clock_config.sample_rate = rate;
    }
    let tick_period = clock_config
        .sample_rate
        .interval()
        .unwrap_or(Duration::from_millis(AUTO_TICK_MS));

    let connector = match args.seed {
        Some(seed) => PathCreator::with_seed(seed),
        None => PathCreator::new(),
    };
    let mut clock = PlaybackClock::new(connector, clock_config);
    let mut flight = Flight::with_policies(config.channel_policies());
    flight.info_mut().title = args.title;

    if !clock.start_recording(&mut flight) {
        return Err(CliError::Connection("recording could not be started".to_string()));
    }
    println!("Recording at {}. Press Ctrl+C to stop.", clock.config().sample_rate);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(progress_style("{spinner:.green} {prefix} {msg}"));

    let shutdown = shutdown_signal()?;
    let started = Instant::now();
    let mut lost = false;
    runtime()?.block_on(async {
        let mut interval = tokio::time::interval(tick_period);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.notified() => break,
            }

            let now = Instant::now();
            if limit.is_some_and(|limit| now.duration_since(started) >= limit) {
                break;
            }

            let tick = clock.advance(&mut flight, now);
            if tick.event == TickEvent::ConnectionLost {
                lost = true;
                break;
            }
            spinner.set_prefix(format_duration(tick.timestamp));
            spinner.set_message(format!(
                "{} samples",
                flight.user_aircraft().position().len()
            ));
            spinner.tick();
        }
    });

    clock.stop(&mut flight, Instant::now());
    spinner.finish_and_clear();
    if lost && !flight.has_recording() {
        return Err(CliError::Connection("the simulator stopped sending data".to_string()));
    }

    let samples_per_second = clock.recorded_samples_per_second(&flight);
    let written = match &args.output {
        Some(location) => save_flight(location, &mut flight, config)?,
        None => {
            let id = repository(config).store(&flight)?;
            format!("flight {}", id)
        }
    };

    tracing::info!(
        duration_ms = flight.total_duration(),
        samples_per_second,
        "Recording saved"
    );
    println!(
        "Recorded {} ({:.1} samples/s) to {}",
        format_duration(flight.total_duration()),
        samples_per_second,
        written
    );
    Ok(())
}

/// Convert `--duration` seconds into a recording limit.
fn recording_limit(seconds: f64) -> Result<Duration, CliError> {
    let invalid = || {
        CliError::InvalidArgument(format!(
            "duration must be a positive number of seconds, got {}",
            seconds
        ))
    };
    if seconds <= 0.0 {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}
