//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::clock::{RecordingMode, SampleRate};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Replay and seek settings
    pub replay: ReplaySettings,
    /// Recording settings
    pub recording: RecordingSettings,
    /// Channel read settings
    pub channels: ChannelSettings,
    /// Augmentation constants
    pub augmentation: AugmentationSettings,
    /// Flight storage settings
    pub storage: StorageSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Replay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySettings {
    /// Restart from the beginning when the end is reached.
    pub replay_loop: bool,
    /// Initial replay speed factor.
    pub speed_factor: f64,
    /// Skip by `seek_interval_seconds` when true, by `seek_interval_percent` otherwise.
    pub absolute_seek: bool,
    pub seek_interval_seconds: f64,
    /// Percent of the flight duration.
    pub seek_interval_percent: f64,
}

/// Recording configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSettings {
    pub sample_rate: SampleRate,
    pub mode: RecordingMode,
}

/// Channel read configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSettings {
    /// Forward jump (ms) past which the cursor switches to binary search.
    pub binary_search_threshold_ms: i64,
    /// Interpolation window for every channel except position; `None` is unbounded.
    pub interpolation_window_ms: Option<i64>,
    /// Repeat the last handle sample while the canopy is open.
    pub repeat_canopy_open: bool,
}

/// Augmentation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentationSettings {
    pub landing_velocity_kt: f64,
    pub landing_pitch_deg: f64,
    pub flare_pitch_deg: f64,
    pub approach_pitch_deg: f64,
    pub approach_window_seconds: u64,
    pub max_bank_deg: f64,
    pub bank_heading_change_deg: f64,
    pub first_movement_distance_m: f64,
}

/// Flight storage configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    /// Directory of the JSON flight repository.
    pub directory: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    /// Log file name inside `directory`.
    pub file: String,
}
