//! Per-aircraft channel aggregate.
//!
//! An [`Aircraft`] owns one channel of each sample type plus its metadata.
//! Its duration is derived from the channels and cached until any channel
//! changes or the time offset moves.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::channel::{Access, Channel, ChannelPolicy, HoldPolicy, DEFAULT_INTERPOLATION_WINDOW_MS};
use crate::sample::{
    AircraftHandleSample, EngineSample, LightSample, PositionSample, PrimaryFlightControlSample,
    SampleKind, SecondaryFlightControlSample,
};
use crate::search::Timestamped;

/// Identity and metadata of one aircraft in a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftInfo {
    pub id: u64,
    /// Simulator title of the aircraft type.
    pub type_name: String,
    pub tail_number: String,
    /// Offset (ms) added to every replay query against this aircraft.
    pub time_offset: i64,
    /// Airspeed at recording start, in knots.
    pub initial_airspeed: i32,
}

impl AircraftInfo {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            type_name: String::new(),
            tail_number: String::new(),
            time_offset: 0,
            initial_airspeed: 0,
        }
    }
}

/// Read policies for each of an aircraft's channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPolicies {
    pub position: ChannelPolicy,
    pub engine: ChannelPolicy,
    pub primary_flight_control: ChannelPolicy,
    pub secondary_flight_control: ChannelPolicy,
    pub aircraft_handle: ChannelPolicy,
    pub light: ChannelPolicy,
}

impl Default for ChannelPolicies {
    fn default() -> Self {
        Self::uniform(ChannelPolicy::default())
            .with_interpolation_window(Some(DEFAULT_INTERPOLATION_WINDOW_MS))
    }
}

impl ChannelPolicies {
    /// The same policy for every channel.
    pub fn uniform(policy: ChannelPolicy) -> Self {
        Self {
            position: policy,
            engine: policy,
            primary_flight_control: policy,
            secondary_flight_control: policy,
            aircraft_handle: policy,
            light: policy,
        }
    }

    /// Apply an interpolation window to the engine, flight control and
    /// handle channels. Position and light always stay unbounded.
    pub fn with_interpolation_window(mut self, window_ms: Option<i64>) -> Self {
        self.engine = self.engine.with_interpolation_window(window_ms);
        self.primary_flight_control = self.primary_flight_control.with_interpolation_window(window_ms);
        self.secondary_flight_control =
            self.secondary_flight_control.with_interpolation_window(window_ms);
        self.aircraft_handle = self.aircraft_handle.with_interpolation_window(window_ms);
        self.light = self.light.with_interpolation_window(None);
        self.position = self.position.with_interpolation_window(None);
        self
    }

    /// Repeat the last handle sample while the canopy is open.
    ///
    /// Only a handle sample with a non-zero canopy opening is repeated; with
    /// the canopy closed an unresolved read still yields the null sample.
    pub fn with_repeat_canopy_open(mut self, repeat: bool) -> Self {
        let hold = if repeat {
            HoldPolicy::RepeatPrevious
        } else {
            HoldPolicy::Null
        };
        self.aircraft_handle = self.aircraft_handle.with_hold(hold);
        self
    }
}

/// One interpolated instant across all of an aircraft's channels.
///
/// Channels without data at that instant carry the null sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AircraftFrame {
    pub position: PositionSample,
    pub engine: EngineSample,
    pub primary_flight_control: PrimaryFlightControlSample,
    pub secondary_flight_control: SecondaryFlightControlSample,
    pub aircraft_handle: AircraftHandleSample,
    pub light: LightSample,
}

impl AircraftFrame {
    /// A frame where every channel is null.
    pub fn null() -> Self {
        Self {
            position: PositionSample::null(),
            engine: EngineSample::null(),
            primary_flight_control: PrimaryFlightControlSample::null(),
            secondary_flight_control: SecondaryFlightControlSample::null(),
            aircraft_handle: AircraftHandleSample::null(),
            light: LightSample::null(),
        }
    }

    /// Stamp every non-null sample with `timestamp`.
    pub fn stamped(mut self, timestamp: i64) -> Self {
        fn stamp<S: SampleKind>(sample: &mut S, timestamp: i64) {
            if !sample.is_null() {
                sample.set_timestamp(timestamp);
            }
        }
        stamp(&mut self.position, timestamp);
        stamp(&mut self.engine, timestamp);
        stamp(&mut self.primary_flight_control, timestamp);
        stamp(&mut self.secondary_flight_control, timestamp);
        stamp(&mut self.aircraft_handle, timestamp);
        stamp(&mut self.light, timestamp);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DurationCache {
    revisions: [u64; 6],
    time_offset: i64,
    duration: i64,
}

/// All recorded channels of one aircraft.
#[derive(Debug, Clone)]
pub struct Aircraft {
    info: AircraftInfo,
    position: Channel<PositionSample>,
    engine: Channel<EngineSample>,
    primary_flight_control: Channel<PrimaryFlightControlSample>,
    secondary_flight_control: Channel<SecondaryFlightControlSample>,
    aircraft_handle: Channel<AircraftHandleSample>,
    light: Channel<LightSample>,
    duration: Cell<Option<DurationCache>>,
}

impl Aircraft {
    pub fn new(info: AircraftInfo) -> Self {
        Self::with_policies(info, ChannelPolicies::default())
    }

    pub fn with_policies(info: AircraftInfo, policies: ChannelPolicies) -> Self {
        let mut aircraft = Self {
            position: Channel::with_policy(policies.position),
            engine: Channel::with_policy(policies.engine),
            primary_flight_control: Channel::with_policy(policies.primary_flight_control),
            secondary_flight_control: Channel::with_policy(policies.secondary_flight_control),
            aircraft_handle: Channel::with_policy(policies.aircraft_handle),
            light: Channel::with_policy(policies.light),
            info,
            duration: Cell::new(None),
        };
        aircraft.apply_time_offset();
        aircraft
    }

    pub fn info(&self) -> &AircraftInfo {
        &self.info
    }

    pub fn id(&self) -> u64 {
        self.info.id
    }

    /// Update metadata; a changed time offset propagates to every channel.
    pub fn set_info(&mut self, info: AircraftInfo) {
        self.info = info;
        self.apply_time_offset();
    }

    pub fn time_offset(&self) -> i64 {
        self.info.time_offset
    }

    pub fn set_time_offset(&mut self, time_offset: i64) {
        self.info.time_offset = time_offset;
        self.apply_time_offset();
    }

    pub fn position(&self) -> &Channel<PositionSample> {
        &self.position
    }

    pub fn position_mut(&mut self) -> &mut Channel<PositionSample> {
        &mut self.position
    }

    pub fn engine(&self) -> &Channel<EngineSample> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Channel<EngineSample> {
        &mut self.engine
    }

    pub fn primary_flight_control(&self) -> &Channel<PrimaryFlightControlSample> {
        &self.primary_flight_control
    }

    pub fn primary_flight_control_mut(&mut self) -> &mut Channel<PrimaryFlightControlSample> {
        &mut self.primary_flight_control
    }

    pub fn secondary_flight_control(&self) -> &Channel<SecondaryFlightControlSample> {
        &self.secondary_flight_control
    }

    pub fn secondary_flight_control_mut(&mut self) -> &mut Channel<SecondaryFlightControlSample> {
        &mut self.secondary_flight_control
    }

    pub fn aircraft_handle(&self) -> &Channel<AircraftHandleSample> {
        &self.aircraft_handle
    }

    pub fn aircraft_handle_mut(&mut self) -> &mut Channel<AircraftHandleSample> {
        &mut self.aircraft_handle
    }

    pub fn light(&self) -> &Channel<LightSample> {
        &self.light
    }

    pub fn light_mut(&mut self) -> &mut Channel<LightSample> {
        &mut self.light
    }

    /// Whether any position data was recorded.
    pub fn has_recording(&self) -> bool {
        !self.position.is_empty()
    }

    /// Replay duration (ms): latest sample across all channels, minus the
    /// time offset, never negative.
    pub fn duration(&self) -> i64 {
        let revisions = self.revisions();
        if let Some(cached) = self.duration.get() {
            if cached.revisions == revisions && cached.time_offset == self.info.time_offset {
                return cached.duration;
            }
        }

        let last = [
            self.position.last().map(Timestamped::timestamp),
            self.engine.last().map(Timestamped::timestamp),
            self.primary_flight_control.last().map(Timestamped::timestamp),
            self.secondary_flight_control.last().map(Timestamped::timestamp),
            self.aircraft_handle.last().map(Timestamped::timestamp),
            self.light.last().map(Timestamped::timestamp),
        ]
        .into_iter()
        .flatten()
        .max();

        let duration = last.map_or(0, |t| (t - self.info.time_offset).max(0));
        self.duration.set(Some(DurationCache {
            revisions,
            time_offset: self.info.time_offset,
            duration,
        }));
        duration
    }

    /// Interpolate every channel at `timestamp`.
    pub fn frame_at(&self, timestamp: i64, access: Access) -> AircraftFrame {
        AircraftFrame {
            position: self.position.interpolate(timestamp, access),
            engine: self.engine.interpolate(timestamp, access),
            primary_flight_control: self.primary_flight_control.interpolate(timestamp, access),
            secondary_flight_control: self.secondary_flight_control.interpolate(timestamp, access),
            aircraft_handle: self.aircraft_handle.interpolate(timestamp, access),
            light: self.light.interpolate(timestamp, access),
        }
    }

    /// Append the non-null samples of a recorded frame at `timestamp`.
    pub fn record_frame(&mut self, timestamp: i64, frame: AircraftFrame) {
        let frame = frame.stamped(timestamp);
        self.position.append_or_replace(frame.position);
        self.engine.append_or_replace(frame.engine);
        self.primary_flight_control
            .append_or_replace(frame.primary_flight_control);
        self.secondary_flight_control
            .append_or_replace(frame.secondary_flight_control);
        self.aircraft_handle.append_or_replace(frame.aircraft_handle);
        self.light.append_or_replace(frame.light);
    }

    /// Extend the position channel so the recording ends at `timestamp`.
    ///
    /// Repeats the last position sample; no-op if data already reaches it.
    pub fn extend_to(&mut self, timestamp: i64) {
        if let Some(last) = self.position.last() {
            if last.timestamp < timestamp {
                let mut end = *last;
                end.timestamp = timestamp;
                self.position.append_or_replace(end);
            }
        }
    }

    /// Drop all recorded samples, keeping metadata.
    pub fn clear(&mut self) {
        self.position.clear();
        self.engine.clear();
        self.primary_flight_control.clear();
        self.secondary_flight_control.clear();
        self.aircraft_handle.clear();
        self.light.clear();
    }

    fn revisions(&self) -> [u64; 6] {
        [
            self.position.revision(),
            self.engine.revision(),
            self.primary_flight_control.revision(),
            self.secondary_flight_control.revision(),
            self.aircraft_handle.revision(),
            self.light.revision(),
        ]
    }

    fn apply_time_offset(&mut self) {
        let offset = self.info.time_offset;
        self.position.set_time_offset(offset);
        self.engine.set_time_offset(offset);
        self.primary_flight_control.set_time_offset(offset);
        self.secondary_flight_control.set_time_offset(offset);
        self.aircraft_handle.set_time_offset(offset);
        self.light.set_time_offset(offset);
    }
}
