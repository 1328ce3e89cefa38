//! Flight storage.
//!
//! A [`FlightRepository`] stores and loads whole flights. Channels are
//! written in iteration order and rebuilt with `replace_all`, so a loaded
//! flight reads back exactly as it was stored.
//!
//! # Design
//!
//! - [`FlightDocument`] is the serialised form shared by every repository
//! - Loading is all or nothing: every sample of every aircraft is validated
//!   before the first channel is built
//! - [`MemoryRepository`] for tests and scratch sessions,
//!   [`JsonFileRepository`] for one JSON document per flight on disk

mod json;
mod memory;

pub use json::{read_flight, write_flight, JsonFileRepository};
pub use memory::MemoryRepository;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aircraft::{Aircraft, AircraftInfo, ChannelPolicies};
use crate::flight::{Flight, FlightInfo};
use crate::sample::{
    AircraftHandleSample, ChannelKind, EngineSample, LightSample, PositionSample,
    PrimaryFlightControlSample, SampleKind, SecondaryFlightControlSample,
};

/// Current flight document format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Errors from storing or loading flights.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid flight document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Flight {0} not found")]
    NotFound(u64),

    /// A sample failed validation; nothing was imported.
    #[error("Malformed {channel} sample {index} of aircraft {aircraft}: {reason}")]
    MalformedSample {
        aircraft: u64,
        channel: ChannelKind,
        index: usize,
        reason: String,
    },

    #[error("Flight document contains no aircraft")]
    EmptyFlight,

    #[error("Unsupported flight document version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PersistenceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Serialised form of one aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftDocument {
    pub info: AircraftInfo,
    #[serde(default)]
    pub position: Vec<PositionSample>,
    #[serde(default)]
    pub engine: Vec<EngineSample>,
    #[serde(default)]
    pub primary_flight_control: Vec<PrimaryFlightControlSample>,
    #[serde(default)]
    pub secondary_flight_control: Vec<SecondaryFlightControlSample>,
    #[serde(default)]
    pub aircraft_handle: Vec<AircraftHandleSample>,
    #[serde(default)]
    pub light: Vec<LightSample>,
}

impl AircraftDocument {
    pub fn from_aircraft(aircraft: &Aircraft) -> Self {
        Self {
            info: aircraft.info().clone(),
            position: aircraft.position().iter().copied().collect(),
            engine: aircraft.engine().iter().copied().collect(),
            primary_flight_control: aircraft.primary_flight_control().iter().copied().collect(),
            secondary_flight_control: aircraft.secondary_flight_control().iter().copied().collect(),
            aircraft_handle: aircraft.aircraft_handle().iter().copied().collect(),
            light: aircraft.light().iter().copied().collect(),
        }
    }

    fn validate(&self) -> Result<(), PersistenceError> {
        let id = self.info.id;
        validate_channel(id, &self.position, position_problem)?;
        validate_channel(id, &self.engine, |_| None)?;
        validate_channel(id, &self.primary_flight_control, |_| None)?;
        validate_channel(id, &self.secondary_flight_control, |_| None)?;
        validate_channel(id, &self.aircraft_handle, |_| None)?;
        validate_channel(id, &self.light, |_| None)
    }

    fn into_aircraft(self, policies: ChannelPolicies) -> Aircraft {
        let mut aircraft = Aircraft::with_policies(self.info, policies);
        aircraft.position_mut().replace_all(self.position);
        aircraft.engine_mut().replace_all(self.engine);
        aircraft
            .primary_flight_control_mut()
            .replace_all(self.primary_flight_control);
        aircraft
            .secondary_flight_control_mut()
            .replace_all(self.secondary_flight_control);
        aircraft.aircraft_handle_mut().replace_all(self.aircraft_handle);
        aircraft.light_mut().replace_all(self.light);
        aircraft
    }
}

/// Serialised form of a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDocument {
    pub version: u32,
    pub info: FlightInfo,
    #[serde(default)]
    pub user_aircraft_index: usize,
    pub aircraft: Vec<AircraftDocument>,
}

impl FlightDocument {
    pub fn from_flight(flight: &Flight) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            info: flight.info().clone(),
            user_aircraft_index: flight.user_aircraft_index(),
            aircraft: flight
                .aircraft()
                .iter()
                .map(AircraftDocument::from_aircraft)
                .collect(),
        }
    }

    /// Validate the whole document, then build the flight.
    pub fn into_flight(self, policies: ChannelPolicies) -> Result<Flight, PersistenceError> {
        if self.version != DOCUMENT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.version,
                expected: DOCUMENT_VERSION,
            });
        }
        if self.aircraft.is_empty() {
            return Err(PersistenceError::EmptyFlight);
        }
        for aircraft in &self.aircraft {
            aircraft.validate()?;
        }

        let aircraft = self
            .aircraft
            .into_iter()
            .map(|document| document.into_aircraft(policies))
            .collect();
        Flight::from_parts(self.info, aircraft, self.user_aircraft_index, policies)
            .ok_or(PersistenceError::EmptyFlight)
    }
}

/// Storage for whole flights.
pub trait FlightRepository {
    /// Store a flight and return its identifier.
    ///
    /// A flight whose info already carries an id replaces the stored flight
    /// with that id; otherwise a new id is assigned.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the flight cannot be serialised or
    /// written.
    fn store(&mut self, flight: &Flight) -> Result<u64, PersistenceError>;

    /// Load a flight by identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` for an unknown id, or the first
    /// validation error; a failed load imports nothing.
    fn load(&self, id: u64) -> Result<Flight, PersistenceError>;

    /// Identifiers of all stored flights, ascending.
    fn list(&self) -> Result<Vec<u64>, PersistenceError>;

    fn delete(&mut self, id: u64) -> Result<(), PersistenceError>;
}

fn validate_channel<S: SampleKind>(
    aircraft: u64,
    samples: &[S],
    problem: impl Fn(&S) -> Option<&'static str>,
) -> Result<(), PersistenceError> {
    for (index, sample) in samples.iter().enumerate() {
        let reason = if sample.is_null() {
            Some("missing timestamp")
        } else if sample.timestamp() < 0 {
            Some("negative timestamp")
        } else {
            problem(sample)
        };
        if let Some(reason) = reason {
            return Err(PersistenceError::MalformedSample {
                aircraft,
                channel: S::CHANNEL,
                index,
                reason: reason.to_string(),
            });
        }
    }
    Ok(())
}

fn position_problem(sample: &PositionSample) -> Option<&'static str> {
    if !(-90.0..=90.0).contains(&sample.latitude) {
        Some("latitude out of range")
    } else if !(-180.0..=180.0).contains(&sample.longitude) {
        Some("longitude out of range")
    } else if !sample.altitude.is_finite() {
        Some("altitude is not finite")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::INVALID_TIMESTAMP;

    fn flight_with_positions(count: i64) -> Flight {
        let mut flight = Flight::new();
        for i in 0..count {
            flight
                .user_aircraft_mut()
                .position_mut()
                .append_or_replace(PositionSample::at(i * 1_000, 47.0, 8.0, 500.0));
        }
        flight
    }

    #[test]
    fn test_document_round_trip_keeps_formation() {
        let mut flight = flight_with_positions(5);
        flight.add_user_aircraft();
        flight.set_user_aircraft_index(0);

        let document = FlightDocument::from_flight(&flight);
        assert_eq!(document.aircraft.len(), 2);

        let loaded = document.into_flight(ChannelPolicies::default()).unwrap();
        assert_eq!(loaded.aircraft_count(), 2);
        assert_eq!(loaded.user_aircraft_index(), 0);
        assert_eq!(loaded.user_aircraft().position().len(), 5);
        assert_eq!(loaded.total_duration(), 4_000);
    }

    #[test]
    fn test_malformed_sample_rejects_whole_document() {
        let flight = flight_with_positions(3);
        let mut document = FlightDocument::from_flight(&flight);
        document.aircraft[0].position[2].latitude = 123.0;

        let error = document.into_flight(ChannelPolicies::default()).unwrap_err();
        match error {
            PersistenceError::MalformedSample {
                channel, index, ..
            } => {
                assert_eq!(channel, ChannelKind::Position);
                assert_eq!(index, 2);
            }
            other => panic!("Expected MalformedSample, got {:?}", other),
        }
    }

    #[test]
    fn test_null_sample_is_malformed() {
        let mut document = FlightDocument::from_flight(&flight_with_positions(1));
        document.aircraft[0]
            .light
            .push(LightSample::new(INVALID_TIMESTAMP, Default::default()));

        assert!(matches!(
            document.into_flight(ChannelPolicies::default()),
            Err(PersistenceError::MalformedSample {
                channel: ChannelKind::Light,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_and_version_checks() {
        let mut document = FlightDocument::from_flight(&Flight::new());
        document.aircraft.clear();
        assert!(matches!(
            document.clone().into_flight(ChannelPolicies::default()),
            Err(PersistenceError::EmptyFlight)
        ));

        document.version = 99;
        assert!(matches!(
            document.into_flight(ChannelPolicies::default()),
            Err(PersistenceError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_unordered_document_samples_are_sorted() {
        let mut document = FlightDocument::from_flight(&Flight::new());
        document.aircraft[0].position = vec![
            PositionSample::at(2_000, 0.0, 0.0, 2.0),
            PositionSample::at(0, 0.0, 0.0, 0.0),
            PositionSample::at(1_000, 0.0, 0.0, 1.0),
        ];

        let flight = document.into_flight(ChannelPolicies::default()).unwrap();
        let timestamps: Vec<i64> = flight
            .user_aircraft()
            .position()
            .iter()
            .map(|s| s.timestamp)
            .collect();
        assert_eq!(timestamps, vec![0, 1_000, 2_000]);
    }
}
