//! Record/replay clock.
//!
//! The [`PlaybackClock`] owns the record/replay state machine and the virtual
//! timestamp that drives it. It never runs on its own: the caller invokes
//! [`PlaybackClock::advance`] from whatever scheduler it controls, passing
//! the current instant, and the clock either captures a frame from the
//! connector (recording) or sends interpolated frames to it (replay).
//!
//! # State Machine
//!
//! ```text
//! Idle/Connected --start_recording--> Recording <--pause--> RecordingPaused
//!      ^                                  |                        |
//!      +-------------stop-----------------+------------------------+
//!
//! Idle/Connected --start_replay--> Replay <--pause--> ReplayPaused
//!      ^                             |                     |
//!      +-----------stop / end--------+---------------------+
//!
//! any --connector failure--> Disconnected
//! ```
//!
//! # Elapsed Time
//!
//! ```text
//! Replay:    virtual = accumulator + wall_elapsed * time_scale
//! Recording: virtual = accumulator + wall_elapsed
//! ```
//!
//! Pausing and changing the time scale fold the current run into the
//! accumulator and restart the wall timer, so the virtual timestamp never
//! jumps. A seek is the only allowed discontinuity.

mod options;
mod state;
mod timer;

pub use options::{RecordingMode, SampleRate, SeekInterval};
pub use state::PlaybackState;
pub use timer::ElapsedTimer;

use std::time::Instant;

use crate::aircraft::AircraftFrame;
use crate::channel::Access;
use crate::connect::{ConnectorError, SimConnector};
use crate::flight::Flight;

/// Default replay speed factor.
pub const DEFAULT_TIME_SCALE: f64 = 1.0;

/// Window over which recorded samples per second are measured.
pub const SAMPLES_PER_SECOND_PERIOD_MS: i64 = 10_000;

/// Clock configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    /// Restart from the beginning when replay reaches the end.
    pub replay_loop: bool,
    pub seek_interval: SeekInterval,
    pub sample_rate: SampleRate,
    pub recording_mode: RecordingMode,
    /// Initial replay speed factor.
    pub time_scale: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            replay_loop: false,
            seek_interval: SeekInterval::default(),
            sample_rate: SampleRate::default(),
            recording_mode: RecordingMode::default(),
            time_scale: DEFAULT_TIME_SCALE,
        }
    }
}

/// What a call to [`PlaybackClock::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing to do in the current state.
    Idle,
    /// A frame was captured into the user aircraft.
    Recorded,
    /// Capture skipped by the recording sample rate.
    Throttled,
    /// Interpolated frames were sent to the connector.
    Replayed,
    /// Replay passed the end and restarted from the beginning.
    Looped,
    /// Replay reached the end and stopped.
    Finished,
    /// The connector failed; the clock is now disconnected.
    ConnectionLost,
}

/// Result of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub timestamp: i64,
    pub state: PlaybackState,
    pub event: TickEvent,
}

/// Record/replay state machine over a [`Flight`].
#[derive(Debug)]
pub struct PlaybackClock<C: SimConnector> {
    connector: C,
    config: ClockConfig,
    state: PlaybackState,
    elapsed_accumulator: i64,
    time_scale: f64,
    timer: ElapsedTimer,
    current_timestamp: i64,
    last_capture_at: Option<Instant>,
}

impl<C: SimConnector> PlaybackClock<C> {
    pub fn new(connector: C, config: ClockConfig) -> Self {
        let time_scale = sanitize_time_scale(config.time_scale).unwrap_or(DEFAULT_TIME_SCALE);
        Self {
            connector,
            config,
            state: PlaybackState::Idle,
            elapsed_accumulator: 0,
            time_scale,
            timer: ElapsedTimer::new(),
            current_timestamp: 0,
            last_capture_at: None,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults(connector: C) -> Self {
        Self::new(connector, ClockConfig::default())
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn set_replay_loop(&mut self, replay_loop: bool) {
        self.config.replay_loop = replay_loop;
    }

    pub fn set_seek_interval(&mut self, seek_interval: SeekInterval) {
        self.config.seek_interval = seek_interval;
    }

    pub fn set_sample_rate(&mut self, sample_rate: SampleRate) {
        self.config.sample_rate = sample_rate;
    }

    pub fn set_recording_mode(&mut self, recording_mode: RecordingMode) {
        self.config.recording_mode = recording_mode;
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut C {
        &mut self.connector
    }

    pub fn into_connector(self) -> C {
        self.connector
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn elapsed_accumulator(&self) -> i64 {
        self.elapsed_accumulator
    }

    pub fn is_wall_clock_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Virtual timestamp as of the last tick, seek or transition.
    pub fn current_timestamp(&self) -> i64 {
        self.current_timestamp
    }

    /// Virtual timestamp at `now`, without advancing the clock.
    pub fn elapsed_at(&self, now: Instant) -> i64 {
        match self.state {
            PlaybackState::Replay => {
                let scaled = self.timer.elapsed_ms(now) as f64 * self.time_scale;
                self.elapsed_accumulator + scaled.round() as i64
            }
            PlaybackState::Recording => self.elapsed_accumulator + self.timer.elapsed_ms(now),
            _ => self.current_timestamp,
        }
    }

    /// Connect if not already connected.
    pub fn connect(&mut self) -> bool {
        self.ensure_connected()
    }

    /// Whether the virtual timestamp has reached the end of the flight.
    pub fn is_at_end(&self, flight: &Flight) -> bool {
        self.current_timestamp >= flight.total_duration()
    }

    /// Recorded position samples per second over the last ten seconds.
    pub fn recorded_samples_per_second(&self, flight: &Flight) -> f64 {
        flight
            .user_aircraft()
            .position()
            .samples_per_second(self.current_timestamp, SAMPLES_PER_SECOND_PERIOD_MS)
    }

    // ────────────────────────────────────────────────────────────────────
    // Recording
    // ────────────────────────────────────────────────────────────────────

    /// Start recording into `flight`.
    ///
    /// Tries to connect once if needed; on failure the clock becomes
    /// [`PlaybackState::Disconnected`] and `false` is returned.
    pub fn start_recording(&mut self, flight: &mut Flight) -> bool {
        if !self.state.is_stopped() {
            tracing::debug!(state = %self.state, "Start recording ignored");
            return false;
        }
        if !self.ensure_connected() {
            return false;
        }

        match self.config.recording_mode {
            RecordingMode::SingleAircraft => flight.clear(),
            RecordingMode::AddToFormation => {
                if flight.user_aircraft().has_recording() {
                    flight.add_user_aircraft();
                }
            }
        }

        self.elapsed_accumulator = 0;
        self.current_timestamp = 0;
        self.timer.stop();
        self.last_capture_at = None;
        self.connector.on_start_recording();
        self.transition(PlaybackState::Recording);
        true
    }

    /// Stop recording. The connector's measured end time becomes the end
    /// timestamp of the user aircraft.
    pub fn stop_recording(&mut self, flight: &mut Flight, now: Instant) -> bool {
        if !self.state.is_recording() {
            return false;
        }

        let elapsed = self.elapsed_at(now);
        let end = self.connector.on_stop_recording(elapsed).max(0);
        flight.user_aircraft_mut().extend_to(end);

        self.timer.stop();
        self.elapsed_accumulator = end;
        self.current_timestamp = end;
        self.transition(PlaybackState::Connected);

        tracing::info!(
            duration_ms = end,
            samples = flight.user_aircraft().position().len(),
            "Recording stopped"
        );
        true
    }

    // ────────────────────────────────────────────────────────────────────
    // Replay
    // ────────────────────────────────────────────────────────────────────

    /// Start replay from the current timestamp, or from zero.
    ///
    /// A replay that would start at (or past) the end restarts from zero.
    pub fn start_replay(&mut self, flight: &Flight, from_start: bool, now: Instant) -> bool {
        if !self.state.is_stopped() {
            tracing::debug!(state = %self.state, "Start replay ignored");
            return false;
        }
        if !self.ensure_connected() {
            return false;
        }

        if from_start || self.is_at_end(flight) {
            self.current_timestamp = 0;
        }
        self.elapsed_accumulator = self.current_timestamp;
        self.timer.start(now);
        self.connector.on_start_replay(self.current_timestamp);
        self.transition(PlaybackState::Replay);
        true
    }

    pub fn stop_replay(&mut self, now: Instant) -> bool {
        if !self.state.is_replaying() {
            return false;
        }
        self.current_timestamp = self.elapsed_at(now);
        self.elapsed_accumulator = self.current_timestamp;
        self.timer.stop();
        self.connector.on_stop_replay();
        self.transition(PlaybackState::Connected);
        true
    }

    /// Stop whatever is running.
    pub fn stop(&mut self, flight: &mut Flight, now: Instant) -> bool {
        if self.state.is_recording() {
            self.stop_recording(flight, now)
        } else {
            self.stop_replay(now)
        }
    }

    /// Pause or resume recording or replay.
    pub fn set_paused(&mut self, paused: bool, now: Instant) -> bool {
        match (self.state, paused) {
            (PlaybackState::Recording, true) => {
                self.fold_elapsed(now);
                self.timer.stop();
                self.transition(PlaybackState::RecordingPaused);
            }
            (PlaybackState::Replay, true) => {
                self.fold_elapsed(now);
                self.timer.stop();
                self.transition(PlaybackState::ReplayPaused);
            }
            (PlaybackState::RecordingPaused, false) => {
                self.timer.start(now);
                self.transition(PlaybackState::Recording);
            }
            (PlaybackState::ReplayPaused, false) => {
                self.timer.start(now);
                self.transition(PlaybackState::Replay);
            }
            _ => return false,
        }
        true
    }

    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        let paused = !self.state.is_paused();
        self.set_paused(paused, now)
    }

    /// Change the replay speed factor without a timestamp discontinuity.
    ///
    /// Non-positive or non-finite factors are rejected.
    pub fn set_time_scale(&mut self, time_scale: f64, now: Instant) -> bool {
        let Some(time_scale) = sanitize_time_scale(time_scale) else {
            return false;
        };
        if self.state == PlaybackState::Replay && self.timer.is_running() {
            self.fold_elapsed(now);
            self.timer.start(now);
        }
        tracing::debug!(from = self.time_scale, to = time_scale, "Time scale changed");
        self.time_scale = time_scale;
        true
    }

    // ────────────────────────────────────────────────────────────────────
    // Seeking
    // ────────────────────────────────────────────────────────────────────

    /// Jump to `timestamp`; allowed in every state except `Recording`.
    ///
    /// Play/pause state is unchanged. Connected simulators receive the
    /// frame at the new position with [`Access::Seek`].
    pub fn seek(&mut self, flight: &Flight, timestamp: i64, now: Instant) -> bool {
        if self.state == PlaybackState::Recording {
            tracing::debug!(timestamp, "Seek ignored while recording");
            return false;
        }

        let timestamp = timestamp.max(0);
        self.current_timestamp = timestamp;
        self.elapsed_accumulator = timestamp;
        if self.timer.is_running() {
            self.timer.start(now);
        }
        tracing::debug!(timestamp, "Seek");

        if self.connector.is_connected() {
            let frames = frames_at(flight, timestamp, Access::Seek);
            if let Err(error) = self.connector.send_frames(&frames, Access::Seek) {
                self.connection_lost(error);
            }
        }
        true
    }

    pub fn skip_to_begin(&mut self, flight: &Flight, now: Instant) -> bool {
        self.seek(flight, 0, now)
    }

    pub fn skip_to_end(&mut self, flight: &Flight, now: Instant) -> bool {
        self.seek(flight, flight.total_duration(), now)
    }

    pub fn skip_backward(&mut self, flight: &Flight, now: Instant) -> bool {
        let target = self.elapsed_at(now) - self.skip_interval(flight);
        self.seek(flight, target.max(0), now)
    }

    pub fn skip_forward(&mut self, flight: &Flight, now: Instant) -> bool {
        let target = self.elapsed_at(now) + self.skip_interval(flight);
        self.seek(flight, target.min(flight.total_duration()), now)
    }

    /// Skip step (ms) for `flight`, per the configured seek interval.
    pub fn skip_interval(&self, flight: &Flight) -> i64 {
        self.config.seek_interval.to_millis(flight.total_duration())
    }

    // ────────────────────────────────────────────────────────────────────
    // Ticking
    // ────────────────────────────────────────────────────────────────────

    /// Advance the clock to `now`.
    pub fn advance(&mut self, flight: &mut Flight, now: Instant) -> Tick {
        match self.state {
            PlaybackState::Recording => self.advance_recording(flight, now),
            PlaybackState::Replay => self.advance_replay(flight, now),
            _ => self.tick(TickEvent::Idle),
        }
    }

    fn advance_recording(&mut self, flight: &mut Flight, now: Instant) -> Tick {
        // The first captured frame defines timestamp zero
        if !self.timer.is_running() {
            self.timer.start(now);
        }
        let timestamp = self.elapsed_at(now);
        self.current_timestamp = timestamp;

        if let (Some(interval), Some(last)) = (self.config.sample_rate.interval(), self.last_capture_at) {
            if now.saturating_duration_since(last) < interval {
                return self.tick(TickEvent::Throttled);
            }
        }

        match self.connector.sample_frame(timestamp) {
            Ok(frame) => {
                flight.user_aircraft_mut().record_frame(timestamp, frame);
                self.last_capture_at = Some(now);
                self.tick(TickEvent::Recorded)
            }
            Err(error) => self.connection_lost(error),
        }
    }

    fn advance_replay(&mut self, flight: &Flight, now: Instant) -> Tick {
        let duration = flight.total_duration();
        let mut timestamp = self.elapsed_at(now);
        let mut event = TickEvent::Replayed;

        if timestamp >= duration {
            if self.config.replay_loop && duration > 0 {
                timestamp = 0;
                self.elapsed_accumulator = 0;
                self.timer.start(now);
                event = TickEvent::Looped;
                tracing::debug!(duration_ms = duration, "Replay looped");
            } else {
                self.current_timestamp = duration;
                let frames = frames_at(flight, duration, Access::Linear);
                if let Err(error) = self.connector.send_frames(&frames, Access::Linear) {
                    return self.connection_lost(error);
                }
                self.elapsed_accumulator = duration;
                self.timer.stop();
                self.connector.on_stop_replay();
                self.transition(PlaybackState::Connected);
                return self.tick(TickEvent::Finished);
            }
        }

        self.current_timestamp = timestamp;
        let frames = frames_at(flight, timestamp, Access::Linear);
        if let Err(error) = self.connector.send_frames(&frames, Access::Linear) {
            return self.connection_lost(error);
        }
        self.tick(event)
    }

    // ────────────────────────────────────────────────────────────────────
    // Internals
    // ────────────────────────────────────────────────────────────────────

    fn ensure_connected(&mut self) -> bool {
        if self.connector.is_connected() {
            if matches!(self.state, PlaybackState::Idle | PlaybackState::Disconnected) {
                self.transition(PlaybackState::Connected);
            }
            return true;
        }
        match self.connector.connect() {
            Ok(()) => {
                tracing::info!(connector = self.connector.name(), "Connected");
                self.transition(PlaybackState::Connected);
                true
            }
            Err(error) => {
                tracing::warn!(
                    connector = self.connector.name(),
                    error = %error,
                    "Connection failed"
                );
                self.transition(PlaybackState::Disconnected);
                false
            }
        }
    }

    fn connection_lost(&mut self, error: ConnectorError) -> Tick {
        tracing::warn!(
            connector = self.connector.name(),
            error = %error,
            timestamp = self.current_timestamp,
            "Connector failure"
        );
        self.elapsed_accumulator = self.current_timestamp;
        self.timer.stop();
        self.transition(PlaybackState::Disconnected);
        self.tick(TickEvent::ConnectionLost)
    }

    /// Fold the running wall time into the accumulator at the current scale.
    fn fold_elapsed(&mut self, now: Instant) {
        self.current_timestamp = self.elapsed_at(now);
        self.elapsed_accumulator = self.current_timestamp;
    }

    fn transition(&mut self, to: PlaybackState) {
        if self.state != to {
            tracing::info!(
                from = %self.state,
                to = %to,
                timestamp = self.current_timestamp,
                "Playback state transition"
            );
            self.state = to;
        }
    }

    fn tick(&self, event: TickEvent) -> Tick {
        Tick {
            timestamp: self.current_timestamp,
            state: self.state,
            event,
        }
    }
}

fn frames_at(flight: &Flight, timestamp: i64, access: Access) -> Vec<AircraftFrame> {
    flight
        .aircraft()
        .iter()
        .map(|aircraft| aircraft.frame_at(timestamp, access))
        .collect()
}

fn sanitize_time_scale(time_scale: f64) -> Option<f64> {
    (time_scale.is_finite() && time_scale > 0.0).then_some(time_scale)
}
