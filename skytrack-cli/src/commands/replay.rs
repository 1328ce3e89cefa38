//! `skytrack replay` - replay a flight to the terminal.
//!
//! The playback clock is ticked from a tokio interval; every replayed frame
//! updates a progress bar with the user aircraft's position.

use std::time::{Duration, Instant};

use clap::Args;
use indicatif::ProgressBar;
use skytrack::clock::{PlaybackClock, TickEvent};
use skytrack::config::ConfigFile;
use skytrack::connect::{ConnectorError, SimConnector};
use skytrack::{Access, AircraftFrame};

use super::common::{
    format_duration, load_flight, progress_style, runtime, shutdown_signal, FlightLocation,
};
use crate::error::CliError;

/// Default tick period of the replay loop.
const DEFAULT_TICK_MS: u64 = 40;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Flight document path or stored flight id
    pub flight: FlightLocation,

    /// Replay speed factor (overrides replay.speed_factor)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Restart from the beginning at the end (overrides replay.loop)
    #[arg(long = "loop")]
    pub replay_loop: bool,

    /// Start position in seconds
    #[arg(long, default_value_t = 0.0)]
    pub from: f64,

    /// Tick period in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,
}

/// Connector that keeps the most recent replayed frames for display.
#[derive(Debug, Default)]
pub struct ConsoleConnector {
    connected: bool,
    frames: Vec<AircraftFrame>,
    frames_sent: usize,
}

impl ConsoleConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame of the first aircraft in the last batch.
    pub fn latest(&self) -> Option<&AircraftFrame> {
        self.frames.first()
    }

    pub fn frames_sent(&self) -> usize {
        self.frames_sent
    }
}

impl SimConnector for ConsoleConnector {
    fn name(&self) -> &str {
        "console"
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<(), ConnectorError> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn sample_frame(&mut self, _timestamp: i64) -> Result<AircraftFrame, ConnectorError> {
        Err(ConnectorError::ConnectionFailed(
            "the console connector cannot record".to_string(),
        ))
    }

    fn send_frames(&mut self, frames: &[AircraftFrame], _access: Access) -> Result<(), ConnectorError> {
        self.frames.clear();
        self.frames.extend_from_slice(frames);
        self.frames_sent += frames.len();
        Ok(())
    }
}

fn describe(frame: &AircraftFrame) -> String {
    let position = &frame.position;
    format!(
        "{:>9.5} {:>10.5}  {:>6.0} ft  hdg {:>3.0}",
        position.latitude, position.longitude, position.altitude, position.true_heading
    )
}

pub fn run(args: ReplayArgs, config: &ConfigFile) -> Result<(), CliError> {
    if args.tick_ms == 0 {
        return Err(CliError::InvalidArgument("--tick-ms must be at least 1".to_string()));
    }

    let mut flight = load_flight(&args.flight, config)?;
    if !flight.has_recording() {
        return Err(CliError::InvalidArgument("the flight has no recorded samples".to_string()));
    }

    let mut clock_config = config.clock_config();
    clock_config.replay_loop |= args.replay_loop;
    if let Some(speed) = args.speed {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(CliError::InvalidArgument(format!(
                "speed must be a positive number, got {}",
                speed
            )));
        }
        clock_config.time_scale = speed;
    }

    let duration = flight.total_duration();
    let mut clock = PlaybackClock::new(ConsoleConnector::new(), clock_config);
    let start = Instant::now();
    let from_ms = (args.from.max(0.0) * 1_000.0).round() as i64;
    if from_ms > 0 {
        clock.seek(&flight, from_ms.min(duration), start);
    }
    if !clock.start_replay(&flight, from_ms == 0, start) {
        return Err(CliError::Connection("replay could not be started".to_string()));
    }

    println!(
        "Replaying {} ({}) at {}x. Press Ctrl+C to stop.",
        flight.info().title,
        format_duration(duration),
        clock.time_scale()
    );

    let bar = ProgressBar::new(duration.max(1) as u64);
    bar.set_style(progress_style(
        "{spinner:.green} [{bar:40.cyan/blue}] {prefix} {msg}",
    ));

    let shutdown = shutdown_signal()?;
    let tick_period = Duration::from_millis(args.tick_ms);
    runtime()?.block_on(async {
        let mut interval = tokio::time::interval(tick_period);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.notified() => break,
            }

            let tick = clock.advance(&mut flight, Instant::now());
            bar.set_position(tick.timestamp.max(0) as u64);
            bar.set_prefix(format_duration(tick.timestamp));
            if let Some(frame) = clock.connector().latest() {
                bar.set_message(describe(frame));
            }

            match tick.event {
                TickEvent::Finished => break,
                TickEvent::ConnectionLost => {
                    tracing::warn!(timestamp = tick.timestamp, "Replay connection lost");
                    break;
                }
                _ => {}
            }
        }
    });

    clock.stop(&mut flight, Instant::now());
    bar.finish_and_clear();
    println!(
        "Stopped at {} ({} frames sent)",
        format_duration(clock.current_timestamp()),
        clock.connector().frames_sent()
    );
    Ok(())
}
