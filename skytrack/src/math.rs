//! Navigation and value-conversion helpers.
//!
//! Spherical-earth geodesy used by flight augmentation and the synthetic
//! path creator, plus the conversions between physical values and the
//! integral encodings stored in samples.
//!
//! # Conventions
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Heading / bearing: degrees true (0-360, 0=north, 90=east)
//! - Distance: meters
//! - Altitude: feet

use std::f64::consts::PI;

/// Equatorial earth radius (WGS-84) in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Radians to degrees conversion factor.
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Feet per meter.
const FEET_PER_METER: f64 = 3.280_839_895;

/// Feet per second in one knot.
const FEET_PER_SECOND_PER_KNOT: f64 = 1.687_809_857;

/// Largest magnitude of a normalised integral position.
const NORMALISED_POSITION_MAX: f64 = 32_767.0;

/// Threshold below which an altitude delta counts as level flight.
const LEVEL_FLIGHT_EPSILON: f64 = 1e-9;

/// Convert a normalised position in [-1.0, 1.0] to its `i16` encoding.
///
/// Values outside the range are clamped.
pub fn from_normalised_position(position: f64) -> i16 {
    let clamped = position.clamp(-1.0, 1.0);
    let encoded = -NORMALISED_POSITION_MAX + (clamped + 1.0) * (2.0 * NORMALISED_POSITION_MAX) / 2.0;
    encoded.round() as i16
}

/// Convert an `i16` encoded position back to [-1.0, 1.0].
pub fn to_normalised_position(position: i16) -> f64 {
    (f64::from(position) / NORMALISED_POSITION_MAX).clamp(-1.0, 1.0)
}

/// Convert a percentage in [0, 100] to its `u8` encoding.
pub fn from_percent(percent: f64) -> u8 {
    (percent.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8
}

/// Convert a `u8` encoded percentage back to [0, 100].
pub fn to_percent(value: u8) -> f64 {
    f64::from(value) * 100.0 / 255.0
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

pub fn meters_per_second_to_feet_per_second(speed: f64) -> f64 {
    speed * FEET_PER_METER
}

pub fn knots_to_feet_per_second(knots: f64) -> f64 {
    knots * FEET_PER_SECOND_PER_KNOT
}

/// Normalize a heading to [0, 360).
pub fn normalise_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Normalize a longitude to [-180, 180).
pub fn normalise_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        -180.0
    } else {
        wrapped
    }
}

/// Great-circle distance between two points (haversine), in meters.
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1 * DEG_TO_RAD;
    let phi2 = lat2 * DEG_TO_RAD;
    let dphi = (lat2 - lat1) * DEG_TO_RAD;
    let dlambda = normalise_longitude(lon2 - lon1) * DEG_TO_RAD;

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from the first to the second point.
///
/// Returns bearing in degrees (0-360), where 0 = North, 90 = East.
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1 * DEG_TO_RAD;
    let phi2 = lat2 * DEG_TO_RAD;
    let dlambda = normalise_longitude(lon2 - lon1) * DEG_TO_RAD;

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    normalise_heading(y.atan2(x) * RAD_TO_DEG)
}

/// Distance (meters) and implied ground speed (m/s) between two timed points.
///
/// A zero or negative time delta yields zero speed.
pub fn distance_and_speed(
    (lat1, lon1, timestamp1): (f64, f64, i64),
    (lat2, lon2, timestamp2): (f64, f64, i64),
) -> (f64, f64) {
    let distance = great_circle_distance(lat1, lon1, lat2, lon2);
    let delta_seconds = (timestamp2 - timestamp1) as f64 / 1000.0;
    let speed = if delta_seconds > 0.0 {
        distance / delta_seconds
    } else {
        0.0
    };
    (distance, speed)
}

/// Project a position along a heading for a given distance.
///
/// Uses spherical earth approximation (great circle); returns
/// (latitude, longitude) in degrees.
pub fn project_position(start: (f64, f64), heading_deg: f64, distance_m: f64) -> (f64, f64) {
    let (lat1, lon1) = start;
    let lat1_rad = lat1 * DEG_TO_RAD;
    let lon1_rad = lon1 * DEG_TO_RAD;
    let heading_rad = heading_deg * DEG_TO_RAD;
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1_rad.sin();
    let cos_lat1 = lat1_rad.cos();
    let sin_d = angular_distance.sin();
    let cos_d = angular_distance.cos();

    let lat2_rad = (sin_lat1 * cos_d + cos_lat1 * sin_d * heading_rad.cos()).asin();
    let lon2_rad =
        lon1_rad + (heading_rad.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2_rad.sin());

    (lat2_rad * RAD_TO_DEG, normalise_longitude(lon2_rad * RAD_TO_DEG))
}

/// Approximate pitch (degrees) from horizontal distance and altitude delta.
///
/// Both arguments are in meters. Positive for a climb.
pub fn approximate_pitch(distance: f64, delta_altitude: f64) -> f64 {
    if delta_altitude.abs() < LEVEL_FLIGHT_EPSILON || distance <= 0.0 {
        return 0.0;
    }
    (delta_altitude / distance).atan() * RAD_TO_DEG
}

/// Signed heading change from `current` to `target`, in (-180, 180].
///
/// A turn to the right (increasing heading) is negative.
pub fn heading_change(current: f64, target: f64) -> f64 {
    let denormalised = if current >= target {
        current
    } else {
        current + 360.0
    };
    let change = denormalised - target;

    if (change - 180.0).abs() < f64::EPSILON {
        if current < target {
            -180.0
        } else {
            180.0
        }
    } else if change > 180.0 {
        change - 360.0
    } else {
        change
    }
}

/// Bank angle proportional to a heading change, capped at `max_bank`.
///
/// A heading change of `change_for_max_bank` degrees (or more) maps to
/// `max_bank`; the sign follows the heading change.
pub fn bank_angle(heading_change: f64, change_for_max_bank: f64, max_bank: f64) -> f64 {
    if change_for_max_bank <= 0.0 {
        return 0.0;
    }
    let magnitude = (heading_change.abs() / change_for_max_bank * max_bank).min(max_bank);
    magnitude * heading_change.signum()
}
