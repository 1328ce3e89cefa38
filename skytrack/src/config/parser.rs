//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::{MAX_SPEED_FACTOR, MIN_SPEED_FACTOR};
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::clock::{RecordingMode, SampleRate};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();
    apply_ini(ini, &mut config)?;
    Ok(config)
}

/// Overlay the values present in `ini` onto `config`.
///
/// Stops at the first invalid value; fields before it are already applied.
pub(super) fn apply_ini(ini: &Ini, config: &mut ConfigFile) -> Result<(), ConfigFileError> {
    // [replay] section
    if let Some(section) = ini.section(Some("replay")) {
        if let Some(v) = section.get("loop") {
            config.replay.replay_loop = parse_bool("replay", "loop", v)?;
        }
        if let Some(v) = section.get("speed_factor") {
            let factor: f64 = parse_number("replay", "speed_factor", v, "must be a number")?;
            if !(MIN_SPEED_FACTOR..=MAX_SPEED_FACTOR).contains(&factor) {
                return Err(invalid(
                    "replay",
                    "speed_factor",
                    v,
                    &format!("must be between {} and {}", MIN_SPEED_FACTOR, MAX_SPEED_FACTOR),
                ));
            }
            config.replay.speed_factor = factor;
        }
        if let Some(v) = section.get("absolute_seek") {
            config.replay.absolute_seek = parse_bool("replay", "absolute_seek", v)?;
        }
        if let Some(v) = section.get("seek_interval_seconds") {
            config.replay.seek_interval_seconds =
                parse_non_negative("replay", "seek_interval_seconds", v)?;
        }
        if let Some(v) = section.get("seek_interval_percent") {
            let percent = parse_non_negative("replay", "seek_interval_percent", v)?;
            if percent > 100.0 {
                return Err(invalid(
                    "replay",
                    "seek_interval_percent",
                    v,
                    "must be between 0 and 100",
                ));
            }
            config.replay.seek_interval_percent = percent;
        }
    }

    // [recording] section
    if let Some(section) = ini.section(Some("recording")) {
        if let Some(v) = section.get("sample_rate") {
            config.recording.sample_rate = SampleRate::from_str(v)
                .map_err(|reason| invalid("recording", "sample_rate", v, &reason))?;
        }
        if let Some(v) = section.get("mode") {
            config.recording.mode = RecordingMode::from_str(v)
                .map_err(|_| invalid("recording", "mode", v, "must be 'single' or 'formation'"))?;
        }
    }

    // [channels] section
    if let Some(section) = ini.section(Some("channels")) {
        if let Some(v) = section.get("binary_search_threshold_ms") {
            config.channels.binary_search_threshold_ms = parse_number::<u32>(
                "channels",
                "binary_search_threshold_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )
            .map(i64::from)?;
        }
        if let Some(v) = section.get("interpolation_window_ms") {
            let v = v.trim();
            config.channels.interpolation_window_ms = if v.is_empty() || v == "none" {
                None
            } else {
                let ms: u32 = parse_number(
                    "channels",
                    "interpolation_window_ms",
                    v,
                    "must be empty or a non-negative integer (milliseconds)",
                )?;
                Some(i64::from(ms))
            };
        }
        if let Some(v) = section.get("repeat_canopy_open") {
            config.channels.repeat_canopy_open = parse_bool("channels", "repeat_canopy_open", v)?;
        }
    }

    // [augmentation] section
    if let Some(section) = ini.section(Some("augmentation")) {
        let augmentation = &mut config.augmentation;
        if let Some(v) = section.get("landing_velocity_kt") {
            augmentation.landing_velocity_kt =
                parse_non_negative("augmentation", "landing_velocity_kt", v)?;
        }
        if let Some(v) = section.get("landing_pitch_deg") {
            augmentation.landing_pitch_deg = parse_angle("augmentation", "landing_pitch_deg", v)?;
        }
        if let Some(v) = section.get("flare_pitch_deg") {
            augmentation.flare_pitch_deg = parse_angle("augmentation", "flare_pitch_deg", v)?;
        }
        if let Some(v) = section.get("approach_pitch_deg") {
            augmentation.approach_pitch_deg =
                parse_angle("augmentation", "approach_pitch_deg", v)?;
        }
        if let Some(v) = section.get("approach_window_seconds") {
            augmentation.approach_window_seconds = parse_number(
                "augmentation",
                "approach_window_seconds",
                v,
                "must be a non-negative integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("max_bank_deg") {
            augmentation.max_bank_deg = parse_angle("augmentation", "max_bank_deg", v)?;
        }
        if let Some(v) = section.get("bank_heading_change_deg") {
            let degrees = parse_angle("augmentation", "bank_heading_change_deg", v)?;
            if degrees <= 0.0 {
                return Err(invalid(
                    "augmentation",
                    "bank_heading_change_deg",
                    v,
                    "must be greater than 0",
                ));
            }
            augmentation.bank_heading_change_deg = degrees;
        }
        if let Some(v) = section.get("first_movement_distance_m") {
            augmentation.first_movement_distance_m =
                parse_non_negative("augmentation", "first_movement_distance_m", v)?;
        }
    }

    // [storage] section
    if let Some(section) = ini.section(Some("storage")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.storage.directory = expand_tilde(v);
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(section, key, value, "must be true or false")),
    }
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_non_negative(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    let number: f64 = parse_number(section, key, value, "must be a non-negative number")?;
    if number.is_finite() && number >= 0.0 {
        Ok(number)
    } else {
        Err(invalid(section, key, value, "must be a non-negative number"))
    }
}

fn parse_angle(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    let degrees: f64 = parse_number(section, key, value, "must be a number (degrees)")?;
    if (-90.0..=90.0).contains(&degrees) {
        Ok(degrees)
    } else {
        Err(invalid(section, key, value, "must be between -90 and 90 degrees"))
    }
}

/// Expand a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
