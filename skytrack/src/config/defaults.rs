//! Default values for all configuration settings.
//!
//! Contains the section-level `DEFAULT_*` constants, the default
//! directories and the `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::augmentation::{
    DEFAULT_APPROACH_PITCH_DEG, DEFAULT_APPROACH_WINDOW_MS, DEFAULT_BANK_HEADING_CHANGE_DEG,
    DEFAULT_FIRST_MOVEMENT_DISTANCE_M, DEFAULT_FLARE_PITCH_DEG, DEFAULT_LANDING_PITCH_DEG,
    DEFAULT_LANDING_VELOCITY_KT, DEFAULT_MAX_BANK_DEG,
};
use crate::channel::DEFAULT_INTERPOLATION_WINDOW_MS;
use crate::clock::{RecordingMode, SampleRate, DEFAULT_TIME_SCALE};
use crate::search::DEFAULT_BINARY_SEARCH_THRESHOLD_MS;

// =============================================================================
// Replay
// =============================================================================

pub const DEFAULT_REPLAY_LOOP: bool = false;
pub const DEFAULT_ABSOLUTE_SEEK: bool = true;
pub const DEFAULT_SEEK_INTERVAL_SECONDS: f64 = 1.0;
pub const DEFAULT_SEEK_INTERVAL_PERCENT: f64 = 5.0;

/// Accepted range for `replay.speed_factor`.
pub const MIN_SPEED_FACTOR: f64 = 0.01;
pub const MAX_SPEED_FACTOR: f64 = 64.0;

// =============================================================================
// Channels
// =============================================================================

pub const DEFAULT_REPEAT_CANOPY_OPEN: bool = false;

// =============================================================================
// Logging and storage
// =============================================================================

pub const DEFAULT_LOG_FILE: &str = "skytrack.log";

/// Default flight repository directory (`~/.skytrack/flights`).
pub fn default_storage_dir() -> PathBuf {
    super::file::config_directory().join("flights")
}

/// Default log directory (`~/.skytrack`).
pub fn default_log_dir() -> PathBuf {
    super::file::config_directory()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            replay: ReplaySettings {
                replay_loop: DEFAULT_REPLAY_LOOP,
                speed_factor: DEFAULT_TIME_SCALE,
                absolute_seek: DEFAULT_ABSOLUTE_SEEK,
                seek_interval_seconds: DEFAULT_SEEK_INTERVAL_SECONDS,
                seek_interval_percent: DEFAULT_SEEK_INTERVAL_PERCENT,
            },
            recording: RecordingSettings {
                sample_rate: SampleRate::default(),
                mode: RecordingMode::default(),
            },
            channels: ChannelSettings {
                binary_search_threshold_ms: DEFAULT_BINARY_SEARCH_THRESHOLD_MS,
                interpolation_window_ms: Some(DEFAULT_INTERPOLATION_WINDOW_MS),
                repeat_canopy_open: DEFAULT_REPEAT_CANOPY_OPEN,
            },
            augmentation: AugmentationSettings {
                landing_velocity_kt: DEFAULT_LANDING_VELOCITY_KT,
                landing_pitch_deg: DEFAULT_LANDING_PITCH_DEG,
                flare_pitch_deg: DEFAULT_FLARE_PITCH_DEG,
                approach_pitch_deg: DEFAULT_APPROACH_PITCH_DEG,
                approach_window_seconds: (DEFAULT_APPROACH_WINDOW_MS / 1_000) as u64,
                max_bank_deg: DEFAULT_MAX_BANK_DEG,
                bank_heading_change_deg: DEFAULT_BANK_HEADING_CHANGE_DEG,
                first_movement_distance_m: DEFAULT_FIRST_MOVEMENT_DISTANCE_M,
            },
            storage: StorageSettings {
                directory: default_storage_dir(),
            },
            logging: LoggingSettings {
                directory: default_log_dir(),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
