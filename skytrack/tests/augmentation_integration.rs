//! Augmentation of imported, position-only flights.

use skytrack::augmentation::{Aspects, FlightAugmentation, Procedures};
use skytrack::channel::{Access, Channel};
use skytrack::math::project_position;
use skytrack::sample::{PositionSample, SampleKind};
use skytrack::{Aircraft, AircraftInfo};

const MINUTE: i64 = 60_000;
const FLIGHT_MS: i64 = 10 * MINUTE;
const STEP_MS: i64 = 5_000;

/// Ten minutes along a gentle left turn, climbing then descending to the
/// runway elevation.
fn ten_minute_flight() -> Aircraft {
    let mut aircraft = Aircraft::new(AircraftInfo::new(1));
    let mut position = (47.45, 8.55);
    let mut heading: f64 = 90.0;
    let mut t = 0;
    while t <= FLIGHT_MS {
        let altitude = if t < FLIGHT_MS / 2 {
            1_400.0 + t as f64 / 100.0
        } else {
            1_400.0 + (FLIGHT_MS - t) as f64 / 100.0
        };
        aircraft
            .position_mut()
            .append_or_replace(PositionSample::at(t, position.0, position.1, altitude));

        position = project_position(position, heading, 350.0);
        heading = (heading - 1.5).rem_euclid(360.0);
        t += STEP_MS;
    }
    aircraft
}

fn assert_sorted<S: SampleKind>(channel: &Channel<S>) {
    let samples = channel.as_slice();
    for pair in samples.windows(2) {
        assert!(
            pair[0].timestamp() <= pair[1].timestamp(),
            "{} channel out of order: {} before {}",
            S::CHANNEL,
            pair[0].timestamp(),
            pair[1].timestamp()
        );
    }
}

#[test]
fn test_ten_minute_position_only_flight() {
    let mut aircraft = ten_minute_flight();
    let summary = FlightAugmentation::with_defaults().augment(&mut aircraft);
    assert_eq!(summary.position_samples, aircraft.position().len());
    assert!(summary.key_frames > 0);

    // Engines running and wings level at the start
    let engine = aircraft.engine().interpolate(0, Access::Seek);
    assert_eq!(engine.timestamp, 0);
    assert!(engine.all_engines_running());
    assert_eq!(aircraft.position().first().unwrap().bank, 0.0);

    // Touchdown
    let touchdown = aircraft.position().last().unwrap();
    assert_eq!(touchdown.timestamp, FLIGHT_MS);
    assert_eq!(touchdown.pitch, -3.0);
    assert_eq!(touchdown.bank, 0.0);

    // Gear down at the start, up after five seconds, down three minutes out
    let handle = aircraft.aircraft_handle();
    let gear: Vec<(i64, bool)> = handle
        .iter()
        .map(|sample| (sample.timestamp, sample.gear_handle_position))
        .collect();
    assert!(gear.contains(&(0, true)), "gear samples: {:?}", gear);
    assert!(gear.contains(&(5_000, false)), "gear samples: {:?}", gear);
    assert!(
        gear.contains(&(FLIGHT_MS - 3 * MINUTE, true)),
        "gear samples: {:?}",
        gear
    );

    assert_sorted(aircraft.position());
    assert_sorted(aircraft.engine());
    assert_sorted(aircraft.secondary_flight_control());
    assert_sorted(aircraft.aircraft_handle());
    assert_sorted(aircraft.light());
}

#[test]
fn test_turning_flight_banks_into_the_turn() {
    let mut aircraft = ten_minute_flight();
    FlightAugmentation::with_defaults().augment(&mut aircraft);

    let mid = aircraft.position().interpolate(FLIGHT_MS / 2, Access::Seek);
    assert!(mid.bank != 0.0, "Expected a bank in the turn");
    assert!(mid.bank.abs() <= 25.0, "Bank {} exceeds the maximum", mid.bank);
    assert!(mid.velocity_body_z > 0.0);
}

#[test]
fn test_single_sample_flight() {
    let mut aircraft = Aircraft::new(AircraftInfo::new(1));
    aircraft
        .position_mut()
        .append_or_replace(PositionSample::at(0, 47.45, 8.55, 1_400.0));

    FlightAugmentation::with_defaults().augment(&mut aircraft);

    let sample = aircraft.position().first().unwrap();
    let zeroed = [
        sample.velocity_body_x,
        sample.velocity_body_y,
        sample.velocity_body_z,
        sample.rotation_velocity_body_x,
        sample.rotation_velocity_body_y,
        sample.rotation_velocity_body_z,
        sample.pitch,
        sample.bank,
        sample.true_heading,
    ];
    assert!(
        zeroed.iter().all(|&value| value == 0.0),
        "Expected zero attitude and velocity, got {:?}",
        zeroed
    );
}

#[test]
fn test_selected_procedures_only() {
    let mut aircraft = ten_minute_flight();
    let mut augmentation = FlightAugmentation::with_defaults();
    augmentation.set_procedures(Procedures::START);
    augmentation.set_aspects(Aspects::ATTITUDE_AND_VELOCITY | Aspects::ENGINE);
    augmentation.augment(&mut aircraft);

    assert!(aircraft.light().is_empty());
    assert!(aircraft
        .engine()
        .iter()
        .all(|sample| sample.timestamp <= 5 * MINUTE));
    // Without the landing procedure the attitude pass decides the last pitch
    assert_ne!(aircraft.position().last().unwrap().pitch, 0.0);
}
