//! JSON file repository.
//!
//! Each flight is one pretty-printed document named `flight-<id>.json` in
//! the repository directory. Writes go to a temporary file first and are
//! renamed into place.

use std::fs;
use std::path::{Path, PathBuf};

use super::{FlightDocument, FlightRepository, PersistenceError};
use crate::aircraft::ChannelPolicies;
use crate::flight::Flight;

const FILE_PREFIX: &str = "flight-";
const FILE_EXTENSION: &str = "json";

/// Write `flight` as a JSON document to `path`.
pub fn write_flight(path: &Path, flight: &Flight) -> Result<(), PersistenceError> {
    write_document(path, &FlightDocument::from_flight(flight))
}

/// Read a flight document from `path`.
pub fn read_flight(path: &Path, policies: ChannelPolicies) -> Result<Flight, PersistenceError> {
    let contents = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
    let document: FlightDocument = serde_json::from_str(&contents)?;
    let flight = document.into_flight(policies)?;
    tracing::debug!(
        path = %path.display(),
        aircraft = flight.aircraft_count(),
        "Read flight"
    );
    Ok(flight)
}

fn write_document(path: &Path, document: &FlightDocument) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
    }
    let contents = serde_json::to_string_pretty(document)?;
    let temp = path.with_extension("json.tmp");
    fs::write(&temp, contents).map_err(|e| PersistenceError::io(&temp, e))?;
    fs::rename(&temp, path).map_err(|e| PersistenceError::io(path, e))
}

/// Stores flights as JSON documents in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    directory: PathBuf,
    policies: ChannelPolicies,
}

impl JsonFileRepository {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_policies(directory, ChannelPolicies::default())
    }

    pub fn with_policies(directory: impl Into<PathBuf>, policies: ChannelPolicies) -> Self {
        Self {
            directory: directory.into(),
            policies,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the document for flight `id`.
    pub fn flight_path(&self, id: u64) -> PathBuf {
        self.directory
            .join(format!("{}{}.{}", FILE_PREFIX, id, FILE_EXTENSION))
    }

    fn parse_id(path: &Path) -> Option<u64> {
        if path.extension()? != FILE_EXTENSION {
            return None;
        }
        path.file_stem()?
            .to_str()?
            .strip_prefix(FILE_PREFIX)?
            .parse()
            .ok()
    }
}

impl FlightRepository for JsonFileRepository {
    fn store(&mut self, flight: &Flight) -> Result<u64, PersistenceError> {
        let id = match flight.info().id {
            Some(id) => id,
            None => self.list()?.last().map_or(1, |last| last + 1),
        };

        let mut document = FlightDocument::from_flight(flight);
        document.info.id = Some(id);
        let path = self.flight_path(id);
        write_document(&path, &document)?;

        tracing::info!(id, path = %path.display(), "Stored flight");
        Ok(id)
    }

    fn load(&self, id: u64) -> Result<Flight, PersistenceError> {
        let path = self.flight_path(id);
        if !path.exists() {
            return Err(PersistenceError::NotFound(id));
        }
        read_flight(&path, self.policies)
    }

    fn list(&self) -> Result<Vec<u64>, PersistenceError> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }
        let entries =
            fs::read_dir(&self.directory).map_err(|e| PersistenceError::io(&self.directory, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PersistenceError::io(&self.directory, e))?;
            if let Some(id) = Self::parse_id(&entry.path()) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn delete(&mut self, id: u64) -> Result<(), PersistenceError> {
        let path = self.flight_path(id);
        if !path.exists() {
            return Err(PersistenceError::NotFound(id));
        }
        fs::remove_file(&path).map_err(|e| PersistenceError::io(&path, e))?;
        tracing::info!(id, "Deleted flight");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_id() {
        assert_eq!(
            JsonFileRepository::parse_id(Path::new("/tmp/flight-42.json")),
            Some(42)
        );
        assert_eq!(JsonFileRepository::parse_id(Path::new("flight-42.json.tmp")), None);
        assert_eq!(JsonFileRepository::parse_id(Path::new("notes.json")), None);
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let repository = JsonFileRepository::new(temp.path().join("missing"));
        assert!(repository.list().unwrap().is_empty());
    }

    #[test]
    fn test_store_load_delete() {
        let temp = TempDir::new().unwrap();
        let mut repository = JsonFileRepository::new(temp.path().join("flights"));

        let mut flight = Flight::new();
        flight.info_mut().title = "Local hop".to_string();
        let id = repository.store(&flight).unwrap();
        assert_eq!(id, 1);
        assert!(repository.flight_path(id).exists());
        assert_eq!(repository.store(&Flight::new()).unwrap(), 2);

        let loaded = repository.load(id).unwrap();
        assert_eq!(loaded.info().title, "Local hop");

        repository.delete(id).unwrap();
        assert_eq!(repository.list().unwrap(), vec![2]);
        assert!(matches!(repository.load(id), Err(PersistenceError::NotFound(1))));
    }

    #[test]
    fn test_invalid_json_reports_serialization_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_flight(&path, ChannelPolicies::default()),
            Err(PersistenceError::Serialization(_))
        ));
    }
}
