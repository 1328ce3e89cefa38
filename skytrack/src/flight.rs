//! Recording session context.
//!
//! A [`Flight`] owns every aircraft of one recording (a formation flight has
//! several) and tracks which one is the user aircraft. It is passed
//! explicitly to the playback clock and the augmentation, one instance per
//! recording/replay session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aircraft::{Aircraft, AircraftInfo, ChannelPolicies};

/// Flight metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightInfo {
    /// Identifier assigned by a repository, once stored.
    pub id: Option<u64>,
    pub title: String,
    pub description: String,
    pub creation_time: DateTime<Utc>,
}

impl Default for FlightInfo {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            creation_time: Utc::now(),
        }
    }
}

/// One or more aircraft recorded together.
///
/// A flight always contains at least one aircraft.
#[derive(Debug, Clone)]
pub struct Flight {
    info: FlightInfo,
    aircraft: Vec<Aircraft>,
    user_aircraft_index: usize,
    next_aircraft_id: u64,
    policies: ChannelPolicies,
}

impl Default for Flight {
    fn default() -> Self {
        Self::new()
    }
}

impl Flight {
    /// Create a flight with a single empty aircraft.
    pub fn new() -> Self {
        Self::with_policies(ChannelPolicies::default())
    }

    pub fn with_policies(policies: ChannelPolicies) -> Self {
        Self {
            info: FlightInfo::default(),
            aircraft: vec![Aircraft::with_policies(AircraftInfo::new(1), policies)],
            user_aircraft_index: 0,
            next_aircraft_id: 2,
            policies,
        }
    }

    /// Rebuild a flight from stored parts.
    ///
    /// Returns `None` when `aircraft` is empty; an out of range user index
    /// falls back to the first aircraft.
    pub fn from_parts(
        info: FlightInfo,
        aircraft: Vec<Aircraft>,
        user_aircraft_index: usize,
        policies: ChannelPolicies,
    ) -> Option<Self> {
        if aircraft.is_empty() {
            return None;
        }
        let next_aircraft_id = aircraft.iter().map(Aircraft::id).max().unwrap_or(0) + 1;
        let user_aircraft_index = if user_aircraft_index < aircraft.len() {
            user_aircraft_index
        } else {
            0
        };
        Some(Self {
            info,
            aircraft,
            user_aircraft_index,
            next_aircraft_id,
            policies,
        })
    }

    pub fn info(&self) -> &FlightInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut FlightInfo {
        &mut self.info
    }

    pub fn policies(&self) -> &ChannelPolicies {
        &self.policies
    }

    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    pub fn aircraft_mut(&mut self) -> &mut [Aircraft] {
        &mut self.aircraft
    }

    pub fn aircraft_count(&self) -> usize {
        self.aircraft.len()
    }

    pub fn user_aircraft_index(&self) -> usize {
        self.user_aircraft_index
    }

    pub fn user_aircraft(&self) -> &Aircraft {
        &self.aircraft[self.user_aircraft_index]
    }

    pub fn user_aircraft_mut(&mut self) -> &mut Aircraft {
        &mut self.aircraft[self.user_aircraft_index]
    }

    /// Select the user aircraft. Returns `false` for an invalid index.
    pub fn set_user_aircraft_index(&mut self, index: usize) -> bool {
        if index >= self.aircraft.len() {
            return false;
        }
        if index != self.user_aircraft_index {
            tracing::debug!(from = self.user_aircraft_index, to = index, "User aircraft changed");
            self.user_aircraft_index = index;
        }
        true
    }

    /// Add an empty aircraft and make it the user aircraft.
    pub fn add_user_aircraft(&mut self) -> &mut Aircraft {
        let info = AircraftInfo::new(self.next_aircraft_id);
        self.next_aircraft_id += 1;
        self.aircraft.push(Aircraft::with_policies(info, self.policies));
        self.user_aircraft_index = self.aircraft.len() - 1;
        tracing::info!(
            aircraft = self.aircraft.len(),
            "Added aircraft to formation"
        );
        &mut self.aircraft[self.user_aircraft_index]
    }

    /// Remove an aircraft; the last remaining aircraft cannot be removed.
    pub fn remove_aircraft(&mut self, index: usize) -> Option<Aircraft> {
        if self.aircraft.len() <= 1 || index >= self.aircraft.len() {
            return None;
        }
        let removed = self.aircraft.remove(index);
        if self.user_aircraft_index > index || self.user_aircraft_index >= self.aircraft.len() {
            self.user_aircraft_index -= 1;
        }
        Some(removed)
    }

    /// Longest aircraft duration (ms).
    pub fn total_duration(&self) -> i64 {
        self.aircraft
            .iter()
            .map(Aircraft::duration)
            .max()
            .unwrap_or(0)
    }

    pub fn has_recording(&self) -> bool {
        self.aircraft.iter().any(Aircraft::has_recording)
    }

    /// Reset to a single empty aircraft with fresh metadata.
    pub fn clear(&mut self) {
        *self = Self::with_policies(self.policies);
    }
}
