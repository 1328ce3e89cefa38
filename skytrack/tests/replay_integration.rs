//! End-to-end record and replay through the playback clock.

use std::time::{Duration, Instant};

use skytrack::clock::{ClockConfig, PlaybackClock, PlaybackState, TickEvent};
use skytrack::connect::{ConnectorError, PathCreator, SimConnector};
use skytrack::persistence::{FlightRepository, JsonFileRepository};
use skytrack::sample::PositionSample;
use skytrack::{Access, AircraftFrame, Flight};
use tempfile::TempDir;

/// Collects every replayed frame.
#[derive(Debug, Default)]
struct CollectingConnector {
    connected: bool,
    replayed: Vec<(Access, Vec<AircraftFrame>)>,
}

impl SimConnector for CollectingConnector {
    fn name(&self) -> &str {
        "collecting"
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<(), ConnectorError> {
        self.connected = true;
        Ok(())
    }

    fn sample_frame(&mut self, _timestamp: i64) -> Result<AircraftFrame, ConnectorError> {
        Err(ConnectorError::NotConnected)
    }

    fn send_frames(&mut self, frames: &[AircraftFrame], access: Access) -> Result<(), ConnectorError> {
        self.replayed.push((access, frames.to_vec()));
        Ok(())
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn straight_flight() -> Flight {
    let mut flight = Flight::new();
    for i in 0..=10 {
        let longitude = 8.0 + i as f64 * 0.01;
        flight
            .user_aircraft_mut()
            .position_mut()
            .append_or_replace(PositionSample::at(i * 1_000, 47.0, longitude, i as f64 * 100.0));
    }
    flight
}

#[test]
fn test_replay_interpolates_between_samples() {
    let mut flight = straight_flight();
    let mut clock = PlaybackClock::with_defaults(CollectingConnector::default());
    let start = Instant::now();

    assert!(clock.start_replay(&flight, true, start));
    let tick = clock.advance(&mut flight, start + ms(2_500));

    assert_eq!(tick.event, TickEvent::Replayed);
    assert_eq!(tick.timestamp, 2_500);
    let (access, frames) = clock.connector().replayed.last().unwrap();
    assert_eq!(*access, Access::Linear);
    assert_eq!(frames.len(), 1);
    assert!(
        (frames[0].position.altitude - 250.0).abs() < 1e-6,
        "Expected 250 ft, got {}",
        frames[0].position.altitude
    );
}

#[test]
fn test_replay_timestamps_never_decrease() {
    let mut flight = straight_flight();
    let mut clock = PlaybackClock::with_defaults(CollectingConnector::default());
    let start = Instant::now();
    clock.start_replay(&flight, true, start);

    let mut previous = 0;
    let mut now = start;
    for step in 0..40u64 {
        now += ms(137);
        if step == 10 {
            clock.set_time_scale(2.0, now);
        }
        if step == 20 {
            clock.set_paused(true, now);
        }
        if step == 25 {
            clock.set_paused(false, now);
        }
        let tick = clock.advance(&mut flight, now);
        assert!(
            tick.timestamp >= previous,
            "Timestamp went backwards: {} after {}",
            tick.timestamp,
            previous
        );
        previous = tick.timestamp;
        if tick.event == TickEvent::Finished {
            break;
        }
    }
}

#[test]
fn test_replay_stops_at_end_or_loops() {
    let mut flight = straight_flight();
    let start = Instant::now();

    let mut clock = PlaybackClock::with_defaults(CollectingConnector::default());
    clock.start_replay(&flight, true, start);
    let tick = clock.advance(&mut flight, start + ms(12_000));
    assert_eq!(tick.event, TickEvent::Finished);
    assert_eq!(tick.timestamp, 10_000);
    assert_eq!(clock.state(), PlaybackState::Connected);

    let config = ClockConfig {
        replay_loop: true,
        ..ClockConfig::default()
    };
    let mut looping = PlaybackClock::new(CollectingConnector::default(), config);
    looping.start_replay(&flight, true, start);
    let tick = looping.advance(&mut flight, start + ms(12_000));
    assert_eq!(tick.event, TickEvent::Looped);
    assert_eq!(tick.timestamp, 0);
    assert_eq!(looping.state(), PlaybackState::Replay);
}

#[test]
fn test_formation_replay_sends_every_aircraft() {
    let mut flight = straight_flight();
    let wingman = flight.add_user_aircraft();
    wingman
        .position_mut()
        .append_or_replace(PositionSample::at(0, 47.1, 8.0, 0.0));
    wingman
        .position_mut()
        .append_or_replace(PositionSample::at(4_000, 47.1, 8.1, 400.0));

    let mut clock = PlaybackClock::with_defaults(CollectingConnector::default());
    let start = Instant::now();
    clock.start_replay(&flight, true, start);
    clock.advance(&mut flight, start + ms(1_000));

    let (_, frames) = clock.connector().replayed.last().unwrap();
    assert_eq!(frames.len(), 2);
    assert!((frames[1].position.altitude - 100.0).abs() < 1e-6);
}

#[test]
fn test_record_store_and_replay_round_trip() {
    let temp = TempDir::new().unwrap();
    let mut repository = JsonFileRepository::new(temp.path());

    let mut flight = Flight::new();
    let mut recorder = PlaybackClock::with_defaults(PathCreator::with_seed(11));
    let start = Instant::now();
    assert!(recorder.start_recording(&mut flight));
    for i in 0..=20u64 {
        let tick = recorder.advance(&mut flight, start + ms(i * 100));
        assert_eq!(tick.event, TickEvent::Recorded);
    }
    assert!(recorder.stop_recording(&mut flight, start + ms(2_000)));
    assert_eq!(flight.user_aircraft().position().len(), 21);

    let id = repository.store(&flight).unwrap();
    let mut loaded = repository.load(id).unwrap();
    assert_eq!(loaded.total_duration(), flight.total_duration());

    let mut player = PlaybackClock::with_defaults(CollectingConnector::default());
    let replay_start = Instant::now();
    player.start_replay(&loaded, true, replay_start);
    player.advance(&mut loaded, replay_start + ms(1_000));

    let (_, frames) = player.connector().replayed.last().unwrap();
    let recorded = flight
        .user_aircraft()
        .position()
        .iter()
        .find(|sample| sample.timestamp == 1_000)
        .copied()
        .unwrap();
    assert!((frames[0].position.latitude - recorded.latitude).abs() < 1e-9);
    assert!((frames[0].position.altitude - recorded.altitude).abs() < 1e-9);
}

#[test]
fn test_seek_while_paused_sends_seek_frame() {
    let mut flight = straight_flight();
    let mut clock = PlaybackClock::with_defaults(CollectingConnector::default());
    let start = Instant::now();
    clock.start_replay(&flight, true, start);
    clock.set_paused(true, start + ms(500));

    assert!(clock.seek(&flight, 7_000, start + ms(600)));
    assert_eq!(clock.state(), PlaybackState::ReplayPaused);
    assert_eq!(clock.current_timestamp(), 7_000);
    let (access, frames) = clock.connector().replayed.last().unwrap();
    assert_eq!(*access, Access::Seek);
    assert_eq!(frames[0].position.altitude, 700.0);

    clock.set_paused(false, start + ms(1_000));
    let tick = clock.advance(&mut flight, start + ms(1_500));
    assert_eq!(tick.timestamp, 7_500);
}
