//! Position, attitude and body velocity samples.

use super::ChannelKind;

define_sample! {
    /// Aircraft position and attitude at one instant.
    ///
    /// Pitch and bank follow the simulator convention: positive pitch is
    /// nose down, positive bank is left wing down.
    pub struct PositionSample: ChannelKind::Position {
        /// Latitude in degrees.
        latitude: f64 => linear,
        /// Longitude in degrees.
        longitude: f64 => wrap180,
        /// Altitude above mean sea level in feet.
        altitude: f64 => linear,
        /// Indicated (pressure) altitude in feet.
        indicated_altitude: f64 => linear,
        /// Pitch in degrees.
        pitch: f64 => linear,
        /// Bank in degrees.
        bank: f64 => linear,
        /// True heading in degrees.
        true_heading: f64 => wrap360,
        /// Lateral body velocity in feet per second.
        velocity_body_x: f64 => linear,
        /// Vertical body velocity in feet per second.
        velocity_body_y: f64 => linear,
        /// Longitudinal body velocity in feet per second.
        velocity_body_z: f64 => linear,
        rotation_velocity_body_x: f64 => linear,
        rotation_velocity_body_y: f64 => linear,
        rotation_velocity_body_z: f64 => linear,
    }
}

impl PositionSample {
    /// Create a sample at a geographic position.
    pub fn at(timestamp: i64, latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            altitude,
            indicated_altitude: altitude,
            ..Default::default()
        }
    }
}
