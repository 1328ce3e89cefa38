//! Derived facts about a recorded path.

use crate::channel::Channel;
use crate::math;
use crate::sample::PositionSample;

/// The first movement beyond a distance threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstMovement {
    /// Timestamp of the sample the movement starts from.
    pub timestamp: i64,
    /// Initial bearing of the movement, in degrees.
    pub heading: f64,
}

/// First pair of consecutive samples further apart than `threshold_m`.
///
/// Returns `None` when the aircraft never moves that far in one step.
pub fn first_movement(samples: &[PositionSample], threshold_m: f64) -> Option<FirstMovement> {
    samples.windows(2).find_map(|pair| {
        let (start, end) = (&pair[0], &pair[1]);
        let distance =
            math::great_circle_distance(start.latitude, start.longitude, end.latitude, end.longitude);
        (distance.abs() > threshold_m).then(|| FirstMovement {
            timestamp: start.timestamp,
            heading: math::initial_bearing(
                start.latitude,
                start.longitude,
                end.latitude,
                end.longitude,
            ),
        })
    })
}

/// Recorded sample closest to the given coordinate.
pub fn closest_position(
    position: &Channel<PositionSample>,
    latitude: f64,
    longitude: f64,
) -> Option<PositionSample> {
    position
        .iter()
        .map(|sample| {
            let distance = math::great_circle_distance(
                latitude,
                longitude,
                sample.latitude,
                sample.longitude,
            );
            (distance, sample)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, sample)| *sample)
}

/// Length of the recorded path in meters.
pub fn path_distance(position: &Channel<PositionSample>) -> f64 {
    position
        .as_slice()
        .windows(2)
        .map(|pair| {
            math::great_circle_distance(
                pair[0].latitude,
                pair[0].longitude,
                pair[1].latitude,
                pair[1].longitude,
            )
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(points: &[(i64, f64, f64)]) -> Channel<PositionSample> {
        let mut channel = Channel::new();
        for &(t, lat, lon) in points {
            channel.append_or_replace(PositionSample::at(t, lat, lon, 0.0));
        }
        channel
    }

    #[test]
    fn test_first_movement_skips_stationary_start() {
        let position = channel(&[
            (0, 47.0, 8.0),
            (1_000, 47.0, 8.0),
            (2_000, 47.00001, 8.0),
            (3_000, 47.01, 8.0),
        ]);
        let movement = first_movement(position.as_slice(), 10.0).unwrap();
        assert_eq!(movement.timestamp, 2_000);
        assert!(
            movement.heading < 1.0 || movement.heading > 359.0,
            "Expected northbound heading, got {}",
            movement.heading
        );
    }

    #[test]
    fn test_first_movement_none_when_stationary() {
        let position = channel(&[(0, 47.0, 8.0), (1_000, 47.0, 8.0)]);
        assert!(first_movement(position.as_slice(), 10.0).is_none());
        assert!(first_movement(&[], 10.0).is_none());
    }

    #[test]
    fn test_closest_position() {
        let position = channel(&[(0, 47.0, 8.0), (1_000, 47.5, 8.5), (2_000, 48.0, 9.0)]);
        let closest = closest_position(&position, 47.4, 8.6).unwrap();
        assert_eq!(closest.timestamp, 1_000);
        assert!(closest_position(&Channel::new(), 0.0, 0.0).is_none());
    }

    #[test]
    fn test_path_distance() {
        // One hundredth of a degree of latitude is about 1113 m
        let position = channel(&[(0, 47.0, 8.0), (1_000, 47.01, 8.0), (2_000, 47.02, 8.0)]);
        let distance = path_distance(&position);
        assert!(
            (distance - 2_226.4).abs() < 5.0,
            "Expected ~2226m, got {}m",
            distance
        );
    }
}
