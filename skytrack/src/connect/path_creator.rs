//! Synthetic connector generating a random flight path.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ConnectorError, SimConnector};
use crate::aircraft::AircraftFrame;
use crate::channel::Access;
use crate::math;
use crate::sample::{
    AircraftHandleSample, EngineSample, LightSample, LightStates, PositionSample,
    PrimaryFlightControlSample, SecondaryFlightControlSample,
};

/// Default start position (Zurich area).
const DEFAULT_START: (f64, f64) = (47.45, 8.56);

/// Default start altitude in feet.
const DEFAULT_START_ALTITUDE_FT: f64 = 3_000.0;

/// Default ground speed in knots.
const DEFAULT_SPEED_KT: f64 = 120.0;

/// Default maximum heading change per second.
const DEFAULT_MAX_TURN_RATE_DEG_S: f64 = 3.0;

/// Default maximum climb or descent rate in feet per second.
const DEFAULT_MAX_VERTICAL_SPEED_FT_S: f64 = 10.0;

const METERS_PER_SECOND_PER_KNOT: f64 = 0.514_444;

/// Configuration for the path creator.
#[derive(Debug, Clone)]
pub struct PathCreatorConfig {
    pub start: (f64, f64),
    pub start_altitude_ft: f64,
    pub speed_kt: f64,
    pub max_turn_rate_deg_s: f64,
    pub max_vertical_speed_ft_s: f64,
}

impl Default for PathCreatorConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            start_altitude_ft: DEFAULT_START_ALTITUDE_FT,
            speed_kt: DEFAULT_SPEED_KT,
            max_turn_rate_deg_s: DEFAULT_MAX_TURN_RATE_DEG_S,
            max_vertical_speed_ft_s: DEFAULT_MAX_VERTICAL_SPEED_FT_S,
        }
    }
}

/// Random-walk flight generator.
///
/// Every sampled frame continues the previous one: the heading drifts by a
/// bounded turn rate, the altitude by a bounded vertical speed, and the
/// position advances at the configured ground speed. Replayed frames are
/// counted but otherwise discarded.
#[derive(Debug)]
pub struct PathCreator {
    config: PathCreatorConfig,
    rng: StdRng,
    connected: bool,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    heading: f64,
    last_timestamp: Option<i64>,
    frames_sent: usize,
    last_access: Option<Access>,
}

impl PathCreator {
    /// Create a path creator seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(PathCreatorConfig::default(), StdRng::from_os_rng())
    }

    /// Deterministic path for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(PathCreatorConfig::default(), seed)
    }

    pub fn with_config(config: PathCreatorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PathCreatorConfig, mut rng: StdRng) -> Self {
        let heading = rng.random_range(0.0..360.0);
        Self {
            latitude: config.start.0,
            longitude: config.start.1,
            altitude: config.start_altitude_ft,
            heading,
            config,
            rng,
            connected: false,
            last_timestamp: None,
            frames_sent: 0,
            last_access: None,
        }
    }

    /// Number of frames received through [`SimConnector::send_frames`].
    pub fn frames_sent(&self) -> usize {
        self.frames_sent
    }

    pub fn last_access(&self) -> Option<Access> {
        self.last_access
    }

    fn advance_path(&mut self, timestamp: i64) -> (f64, f64) {
        let dt = self
            .last_timestamp
            .map_or(0.0, |last| (timestamp - last).max(0) as f64 / 1000.0);
        self.last_timestamp = Some(timestamp);

        let turn = self.rng.random_range(-1.0..=1.0) * self.config.max_turn_rate_deg_s * dt;
        let climb = self.rng.random_range(-1.0..=1.0) * self.config.max_vertical_speed_ft_s * dt;

        self.heading = math::normalise_heading(self.heading + turn);
        self.altitude = (self.altitude + climb).max(0.0);

        let distance = self.config.speed_kt * METERS_PER_SECOND_PER_KNOT * dt;
        let (latitude, longitude) =
            math::project_position((self.latitude, self.longitude), self.heading, distance);
        self.latitude = latitude;
        self.longitude = longitude;

        let turn_rate = if dt > 0.0 { turn / dt } else { 0.0 };
        let vertical_speed = if dt > 0.0 { climb / dt } else { 0.0 };
        (turn_rate, vertical_speed)
    }

    fn random_position(&mut self) -> i16 {
        self.rng.random_range(-32_767..=32_767)
    }

    fn random_percent(&mut self) -> u8 {
        self.rng.random_range(0..=255)
    }
}

impl Default for PathCreator {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConnector for PathCreator {
    fn name(&self) -> &str {
        "Path Creator"
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

    fn on_start_recording(&mut self) {
        self.last_timestamp = None;
    }

    fn sample_frame(&mut self, timestamp: i64) -> Result<AircraftFrame, ConnectorError> {
        if !self.connected {
            return Err(ConnectorError::NotConnected);
        }

        let (turn_rate, vertical_speed) = self.advance_path(timestamp);
        let speed_fps = math::knots_to_feet_per_second(self.config.speed_kt);

        let position = PositionSample {
            timestamp,
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
            indicated_altitude: self.altitude,
            pitch: -(vertical_speed / speed_fps).atan().to_degrees(),
            bank: -turn_rate * 5.0,
            true_heading: self.heading,
            velocity_body_x: 0.0,
            velocity_body_y: vertical_speed,
            velocity_body_z: speed_fps,
            rotation_velocity_body_x: 0.0,
            rotation_velocity_body_y: turn_rate.to_radians(),
            rotation_velocity_body_z: 0.0,
        };

        let throttle = self.rng.random_range(20_000..=32_767);
        let engine = EngineSample {
            timestamp,
            cowl_flap_position: [self.random_percent(); 4],
            ..Default::default()
        }
        .with_levers(throttle, throttle, 255)
        .with_engines_running(true);

        let primary_flight_control = PrimaryFlightControlSample {
            timestamp,
            rudder_position: self.random_position(),
            elevator_position: self.random_position(),
            aileron_position: self.random_position(),
        };

        let secondary_flight_control = SecondaryFlightControlSample {
            timestamp,
            spoilers_armed: self.rng.random_bool(0.1),
            ..Default::default()
        };

        let aircraft_handle = AircraftHandleSample {
            timestamp,
            brake_left_position: self.rng.random_range(0..=1_000),
            brake_right_position: self.rng.random_range(0..=1_000),
            smoke_enabled: self.rng.random_bool(0.05),
            ..Default::default()
        };

        let mut lights = LightStates::NAVIGATION | LightStates::BEACON | LightStates::STROBE;
        if self.rng.random_bool(0.5) {
            lights |= LightStates::LOGO;
        }
        let light = LightSample::new(timestamp, lights);

        Ok(AircraftFrame {
            position,
            engine,
            primary_flight_control,
            secondary_flight_control,
            aircraft_handle,
            light,
        })
    }

    fn send_frames(
        &mut self,
        frames: &[AircraftFrame],
        access: Access,
    ) -> Result<(), ConnectorError> {
        if !self.connected {
            return Err(ConnectorError::NotConnected);
        }
        self.frames_sent += frames.len();
        self.last_access = Some(access);
        Ok(())
    }
}
