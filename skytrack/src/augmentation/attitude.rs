//! Attitude and body velocity synthesis from positions.

use super::analytics;
use super::{Aspects, AugmentationConfig};
use crate::channel::Channel;
use crate::math;
use crate::sample::PositionSample;

/// Synthesise attitude and velocity for every position sample.
///
/// Returns the number of samples processed.
pub(super) fn augment_attitude_and_velocity(
    position: &mut Channel<PositionSample>,
    config: &AugmentationConfig,
) -> usize {
    let mut samples: Vec<PositionSample> = position.iter().copied().collect();
    let count = samples.len();

    match count {
        0 => return 0,
        1 => stationary(&mut samples[0], config.aspects),
        _ => {
            let movement =
                analytics::first_movement(&samples, config.first_movement_distance_m);
            let (movement_timestamp, movement_heading) =
                movement.map_or((0, 0.0), |m| (m.timestamp, m.heading));

            for i in 0..count - 1 {
                let next = samples[i + 1];
                let previous_heading = (i > 0).then(|| samples[i - 1].true_heading);
                let current = &mut samples[i];
                if current.timestamp > movement_timestamp {
                    moving(current, &next, previous_heading, config);
                } else {
                    // Still standing: attitude is level, facing the first movement
                    velocity(current, &next, config.aspects);
                    if config.aspects.contains(Aspects::PITCH) {
                        current.pitch = 0.0;
                    }
                    if config.aspects.contains(Aspects::HEADING) {
                        current.true_heading = movement_heading;
                    }
                    if config.aspects.contains(Aspects::BANK) {
                        current.bank = 0.0;
                    }
                }
            }

            let previous = samples[count - 2];
            touchdown(&mut samples[count - 1], &previous, config);
        }
    }

    tracing::debug!(samples = count, aspects = ?config.aspects, "Synthesised attitude");
    position.replace_all(samples);
    count
}

fn velocity(current: &mut PositionSample, next: &PositionSample, aspects: Aspects) {
    if aspects.contains(Aspects::VELOCITY) {
        let (_, speed) = math::distance_and_speed(
            (current.latitude, current.longitude, current.timestamp),
            (next.latitude, next.longitude, next.timestamp),
        );
        current.velocity_body_x = 0.0;
        current.velocity_body_y = 0.0;
        current.velocity_body_z = math::meters_per_second_to_feet_per_second(speed);
    }
}

fn moving(
    current: &mut PositionSample,
    next: &PositionSample,
    previous_heading: Option<f64>,
    config: &AugmentationConfig,
) {
    let aspects = config.aspects;
    velocity(current, next, aspects);

    if aspects.contains(Aspects::PITCH) {
        let distance = math::great_circle_distance(
            current.latitude,
            current.longitude,
            next.latitude,
            next.longitude,
        );
        let delta_altitude = math::feet_to_meters(next.altitude - current.altitude);
        // Positive simulator pitch is nose down
        current.pitch = -math::approximate_pitch(distance, delta_altitude);
    }

    if aspects.contains(Aspects::HEADING) {
        current.true_heading = math::initial_bearing(
            current.latitude,
            current.longitude,
            next.latitude,
            next.longitude,
        );
    }

    if aspects.contains(Aspects::BANK) {
        current.bank = match previous_heading {
            Some(previous) => math::bank_angle(
                math::heading_change(previous, current.true_heading),
                config.bank_heading_change_deg,
                config.max_bank_deg,
            ),
            None => 0.0,
        };
    }
}

/// Last sample: wings level, landing pitch and landing speed.
fn touchdown(last: &mut PositionSample, previous: &PositionSample, config: &AugmentationConfig) {
    let aspects = config.aspects;
    if aspects.contains(Aspects::VELOCITY) {
        last.velocity_body_x = previous.velocity_body_x;
        last.velocity_body_y = previous.velocity_body_y;
        last.velocity_body_z = math::knots_to_feet_per_second(config.landing_velocity_kt);
    }
    if aspects.contains(Aspects::PITCH) {
        last.pitch = config.landing_pitch_deg;
    }
    if aspects.contains(Aspects::BANK) {
        last.bank = 0.0;
    }
    if aspects.contains(Aspects::HEADING) {
        last.true_heading = previous.true_heading;
    }
}

/// A single sample has nothing to derive anything from.
fn stationary(sample: &mut PositionSample, aspects: Aspects) {
    if aspects.contains(Aspects::VELOCITY) {
        sample.velocity_body_x = 0.0;
        sample.velocity_body_y = 0.0;
        sample.velocity_body_z = 0.0;
    }
    if aspects.contains(Aspects::PITCH) {
        sample.pitch = 0.0;
    }
    if aspects.contains(Aspects::BANK) {
        sample.bank = 0.0;
    }
    if aspects.contains(Aspects::HEADING) {
        sample.true_heading = 0.0;
    }
}
