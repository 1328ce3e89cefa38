//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let interpolation_window = config
        .channels
        .interpolation_window_ms
        .map(|ms| ms.to_string())
        .unwrap_or_default();

    format!(
        r#"[replay]
; Restart from the beginning when replay reaches the end
loop = {}
; Initial replay speed factor (0.01 - 64)
speed_factor = {}
; Skip by a fixed number of seconds (true) or by a percent of the flight (false)
absolute_seek = {}
seek_interval_seconds = {}
seek_interval_percent = {}

[recording]
; Sample rate: auto (every tick) or one of 1, 2, 5, 10, 15, 20, 24, 25, 30, 45, 50, 60
sample_rate = {}
; Recording mode:
;   single    - discard the current flight when recording starts
;   formation - record an additional aircraft into the current flight
mode = {}

[channels]
; Forward jump (ms) after which sample lookup switches to binary search
binary_search_threshold_ms = {}
; Maximum gap (ms) bridged by engine, flight control and handle
; interpolation, empty for unbounded. Position and lights are never windowed.
interpolation_window_ms = {}
; Keep repeating the last canopy/handle sample while the canopy is open
repeat_canopy_open = {}

[augmentation]
; Touchdown speed (knots)
landing_velocity_kt = {}
; Pitch at touchdown, during the flare and on approach (degrees, positive nose down)
landing_pitch_deg = {}
flare_pitch_deg = {}
approach_pitch_deg = {}
; Time before touchdown that gets the approach pitch (seconds)
approach_window_seconds = {}
; Bank angle reached at bank_heading_change_deg of heading change
max_bank_deg = {}
bank_heading_change_deg = {}
; Distance (m) the aircraft must move before it counts as moving
first_movement_distance_m = {}

[storage]
; Flight repository directory
directory = {}

[logging]
directory = {}
file = {}
"#,
        config.replay.replay_loop,
        config.replay.speed_factor,
        config.replay.absolute_seek,
        config.replay.seek_interval_seconds,
        config.replay.seek_interval_percent,
        config.recording.sample_rate,
        config.recording.mode,
        config.channels.binary_search_threshold_ms,
        interpolation_window,
        config.channels.repeat_canopy_open,
        config.augmentation.landing_velocity_kt,
        config.augmentation.landing_pitch_deg,
        config.augmentation.flare_pitch_deg,
        config.augmentation.approach_pitch_deg,
        config.augmentation.approach_window_seconds,
        config.augmentation.max_bank_deg,
        config.augmentation.bank_heading_change_deg,
        config.augmentation.first_movement_distance_m,
        path_to_string(&config.storage.directory),
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert a path to a string, replacing the home directory with `~`.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
