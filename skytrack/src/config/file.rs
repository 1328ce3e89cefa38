//! Configuration file loading and saving.
//!
//! The configuration lives at `~/.skytrack/config.ini`. A missing file is
//! not an error: every setting falls back to its default.

use ini::Ini;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use super::defaults::*;
pub use super::settings::*;

/// Errors that can occur when reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let contents = super::writer::to_config_string(self);
        fs::write(path, contents).map_err(|e| ConfigFileError::WriteError(e.to_string()))?;
        tracing::info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Write the default configuration if no file exists yet.
    ///
    /// Returns the config file path.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }
}

/// Configuration directory (`~/.skytrack`).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".skytrack")
}

/// Configuration file path (`~/.skytrack/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{RecordingMode, SampleRate};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert!(!config.replay.replay_loop);
        assert!(config.replay.absolute_seek);
        assert_eq!(config.recording.sample_rate, SampleRate::Auto);
        assert_eq!(config.channels.interpolation_window_ms, Some(2_000));
        assert_eq!(config.augmentation.approach_window_seconds, 180);
        assert_eq!(config.logging.file, "skytrack.log");
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("missing.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.replay.replay_loop = true;
        config.replay.speed_factor = 2.0;
        config.recording.sample_rate = SampleRate::Hz(10);
        config.recording.mode = RecordingMode::AddToFormation;
        config.channels.interpolation_window_ms = None;
        config.channels.repeat_canopy_open = true;
        config.augmentation.flare_pitch_deg = -6.0;
        config.storage.directory = temp.path().join("flights");
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_value_reports_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "[recording]\nsample_rate = 7\n").unwrap();

        match ConfigFile::load_from(&path) {
            Err(ConfigFileError::InvalidValue { section, key, .. }) => {
                assert_eq!(section, "recording");
                assert_eq!(key, "sample_rate");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }
}
