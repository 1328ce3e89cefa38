//! In-memory flight repository.

use std::collections::BTreeMap;

use super::{FlightDocument, FlightRepository, PersistenceError};
use crate::aircraft::ChannelPolicies;
use crate::flight::Flight;

/// Keeps flight documents in memory, keyed by id.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    flights: BTreeMap<u64, FlightDocument>,
    next_id: u64,
    policies: ChannelPolicies,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::with_policies(ChannelPolicies::default())
    }

    /// Loaded flights get these channel policies.
    pub fn with_policies(policies: ChannelPolicies) -> Self {
        Self {
            flights: BTreeMap::new(),
            next_id: 1,
            policies,
        }
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Insert a raw document, bypassing serialisation of a live flight.
    pub fn insert_document(&mut self, id: u64, document: FlightDocument) {
        self.next_id = self.next_id.max(id + 1);
        self.flights.insert(id, document);
    }
}

impl FlightRepository for MemoryRepository {
    fn store(&mut self, flight: &Flight) -> Result<u64, PersistenceError> {
        let id = flight.info().id.unwrap_or(self.next_id.max(1));
        let mut document = FlightDocument::from_flight(flight);
        document.info.id = Some(id);
        self.insert_document(id, document);
        tracing::debug!(id, "Stored flight in memory");
        Ok(id)
    }

    fn load(&self, id: u64) -> Result<Flight, PersistenceError> {
        let document = self
            .flights
            .get(&id)
            .cloned()
            .ok_or(PersistenceError::NotFound(id))?;
        document.into_flight(self.policies)
    }

    fn list(&self) -> Result<Vec<u64>, PersistenceError> {
        Ok(self.flights.keys().copied().collect())
    }

    fn delete(&mut self, id: u64) -> Result<(), PersistenceError> {
        self.flights
            .remove(&id)
            .map(|_| ())
            .ok_or(PersistenceError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::PositionSample;

    #[test]
    fn test_store_assigns_ids() {
        let mut repository = MemoryRepository::new();
        let first = repository.store(&Flight::new()).unwrap();
        let second = repository.store(&Flight::new()).unwrap();
        assert_eq!((first, second), (1, 2));
        assert_eq!(repository.list().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_store_with_id_replaces() {
        let mut repository = MemoryRepository::new();
        let mut flight = Flight::new();
        let id = repository.store(&flight).unwrap();

        flight.info_mut().id = Some(id);
        flight.info_mut().title = "Second attempt".to_string();
        flight
            .user_aircraft_mut()
            .position_mut()
            .append_or_replace(PositionSample::at(0, 1.0, 2.0, 3.0));
        assert_eq!(repository.store(&flight).unwrap(), id);
        assert_eq!(repository.len(), 1);

        let loaded = repository.load(id).unwrap();
        assert_eq!(loaded.info().title, "Second attempt");
        assert_eq!(loaded.info().id, Some(id));
        assert!(loaded.has_recording());
    }

    #[test]
    fn test_missing_flight() {
        let mut repository = MemoryRepository::new();
        assert!(matches!(repository.load(7), Err(PersistenceError::NotFound(7))));
        assert!(matches!(repository.delete(7), Err(PersistenceError::NotFound(7))));
    }
}
