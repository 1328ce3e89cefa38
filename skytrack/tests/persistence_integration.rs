//! Flight documents on disk.

use std::fs;

use skytrack::augmentation::FlightAugmentation;
use skytrack::persistence::{
    read_flight, write_flight, FlightRepository, JsonFileRepository, PersistenceError,
};
use skytrack::sample::{ChannelKind, PositionSample, SampleKind};
use skytrack::{Access, ChannelPolicies, Flight};
use tempfile::TempDir;

fn augmented_flight() -> Flight {
    let mut flight = Flight::new();
    flight.info_mut().title = "Circuit".to_string();
    for i in 0..=60 {
        flight.user_aircraft_mut().position_mut().append_or_replace(PositionSample::at(
            i * 10_000,
            47.0 + i as f64 * 0.002,
            8.0,
            1_000.0,
        ));
    }
    FlightAugmentation::with_defaults().augment(flight.user_aircraft_mut());
    flight
}

#[test]
fn test_written_flight_reads_back_identically() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("circuit.json");
    let flight = augmented_flight();

    write_flight(&path, &flight).unwrap();
    assert!(!temp.path().join("circuit.json.tmp").exists());

    let loaded = read_flight(&path, ChannelPolicies::default()).unwrap();
    assert_eq!(loaded.info().title, "Circuit");
    assert_eq!(loaded.total_duration(), flight.total_duration());

    let original = flight.user_aircraft();
    let restored = loaded.user_aircraft();
    assert!(original.position().iter().eq(restored.position().iter()));
    assert!(original.engine().iter().eq(restored.engine().iter()));
    assert!(original.light().iter().eq(restored.light().iter()));
    assert_eq!(
        original.frame_at(123_456, Access::Linear),
        restored.frame_at(123_456, Access::Linear)
    );
}

#[test]
fn test_malformed_sample_imports_nothing() {
    let temp = TempDir::new().unwrap();
    let mut repository = JsonFileRepository::new(temp.path());
    let id = repository.store(&augmented_flight()).unwrap();

    // Corrupt the last engine sample on disk
    let path = repository.flight_path(id);
    let mut document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let engine = document["aircraft"][0]["engine"].as_array_mut().unwrap();
    let last = engine.len() - 1;
    engine[last]["timestamp"] = serde_json::json!(-5);
    fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();

    match repository.load(id) {
        Err(PersistenceError::MalformedSample { channel, index, .. }) => {
            assert_eq!(channel, ChannelKind::Engine);
            assert_eq!(index, last);
        }
        other => panic!("Expected MalformedSample, got {:?}", other.map(|f| f.info().clone())),
    }
}

#[test]
fn test_missing_channels_default_to_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("plan.json");
    fs::write(
        &path,
        r#"{
            "version": 1,
            "info": { "id": null, "title": "Plan", "description": "", "creation_time": "2024-05-01T10:00:00Z" },
            "aircraft": [
                {
                    "info": { "id": 1, "type_name": "", "tail_number": "", "time_offset": 0, "initial_airspeed": 0 },
                    "position": []
                }
            ]
        }"#,
    )
    .unwrap();

    let flight = read_flight(&path, ChannelPolicies::default()).unwrap();
    assert_eq!(flight.info().title, "Plan");
    assert!(!flight.has_recording());
    assert!(flight
        .user_aircraft()
        .engine()
        .interpolate(0, Access::Linear)
        .is_null());
}
