//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by `section.key` name. Setting a value runs it
//! through the same parser as the config file, so both reject the same input.

use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use super::file::{ConfigFile, ConfigFileError};
use super::parser::apply_ini;
use super::writer::path_to_string;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Replay settings
    ReplayLoop,
    ReplaySpeedFactor,
    ReplayAbsoluteSeek,
    ReplaySeekIntervalSeconds,
    ReplaySeekIntervalPercent,

    // Recording settings
    RecordingSampleRate,
    RecordingMode,

    // Channel settings
    ChannelsBinarySearchThresholdMs,
    ChannelsInterpolationWindowMs,
    ChannelsRepeatCanopyOpen,

    // Augmentation settings
    AugmentationLandingVelocityKt,
    AugmentationLandingPitchDeg,
    AugmentationFlarePitchDeg,
    AugmentationApproachPitchDeg,
    AugmentationApproachWindowSeconds,
    AugmentationMaxBankDeg,
    AugmentationBankHeadingChangeDeg,
    AugmentationFirstMovementDistanceM,

    // Storage settings
    StorageDirectory,

    // Logging settings
    LoggingDirectory,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == lowered)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Every key, in config file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ReplayLoop,
            ConfigKey::ReplaySpeedFactor,
            ConfigKey::ReplayAbsoluteSeek,
            ConfigKey::ReplaySeekIntervalSeconds,
            ConfigKey::ReplaySeekIntervalPercent,
            ConfigKey::RecordingSampleRate,
            ConfigKey::RecordingMode,
            ConfigKey::ChannelsBinarySearchThresholdMs,
            ConfigKey::ChannelsInterpolationWindowMs,
            ConfigKey::ChannelsRepeatCanopyOpen,
            ConfigKey::AugmentationLandingVelocityKt,
            ConfigKey::AugmentationLandingPitchDeg,
            ConfigKey::AugmentationFlarePitchDeg,
            ConfigKey::AugmentationApproachPitchDeg,
            ConfigKey::AugmentationApproachWindowSeconds,
            ConfigKey::AugmentationMaxBankDeg,
            ConfigKey::AugmentationBankHeadingChangeDeg,
            ConfigKey::AugmentationFirstMovementDistanceM,
            ConfigKey::StorageDirectory,
            ConfigKey::LoggingDirectory,
            ConfigKey::LoggingFile,
        ]
    }

    /// Get the canonical key name (e.g., "replay.speed_factor").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ReplayLoop => "replay.loop",
            ConfigKey::ReplaySpeedFactor => "replay.speed_factor",
            ConfigKey::ReplayAbsoluteSeek => "replay.absolute_seek",
            ConfigKey::ReplaySeekIntervalSeconds => "replay.seek_interval_seconds",
            ConfigKey::ReplaySeekIntervalPercent => "replay.seek_interval_percent",
            ConfigKey::RecordingSampleRate => "recording.sample_rate",
            ConfigKey::RecordingMode => "recording.mode",
            ConfigKey::ChannelsBinarySearchThresholdMs => "channels.binary_search_threshold_ms",
            ConfigKey::ChannelsInterpolationWindowMs => "channels.interpolation_window_ms",
            ConfigKey::ChannelsRepeatCanopyOpen => "channels.repeat_canopy_open",
            ConfigKey::AugmentationLandingVelocityKt => "augmentation.landing_velocity_kt",
            ConfigKey::AugmentationLandingPitchDeg => "augmentation.landing_pitch_deg",
            ConfigKey::AugmentationFlarePitchDeg => "augmentation.flare_pitch_deg",
            ConfigKey::AugmentationApproachPitchDeg => "augmentation.approach_pitch_deg",
            ConfigKey::AugmentationApproachWindowSeconds => "augmentation.approach_window_seconds",
            ConfigKey::AugmentationMaxBankDeg => "augmentation.max_bank_deg",
            ConfigKey::AugmentationBankHeadingChangeDeg => "augmentation.bank_heading_change_deg",
            ConfigKey::AugmentationFirstMovementDistanceM => {
                "augmentation.first_movement_distance_m"
            }
            ConfigKey::StorageDirectory => "storage.directory",
            ConfigKey::LoggingDirectory => "logging.directory",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "replay").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "speed_factor").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        let augmentation = &config.augmentation;
        match self {
            ConfigKey::ReplayLoop => config.replay.replay_loop.to_string(),
            ConfigKey::ReplaySpeedFactor => config.replay.speed_factor.to_string(),
            ConfigKey::ReplayAbsoluteSeek => config.replay.absolute_seek.to_string(),
            ConfigKey::ReplaySeekIntervalSeconds => config.replay.seek_interval_seconds.to_string(),
            ConfigKey::ReplaySeekIntervalPercent => config.replay.seek_interval_percent.to_string(),
            ConfigKey::RecordingSampleRate => config.recording.sample_rate.to_string(),
            ConfigKey::RecordingMode => config.recording.mode.to_string(),
            ConfigKey::ChannelsBinarySearchThresholdMs => {
                config.channels.binary_search_threshold_ms.to_string()
            }
            ConfigKey::ChannelsInterpolationWindowMs => config
                .channels
                .interpolation_window_ms
                .map(|ms| ms.to_string())
                .unwrap_or_default(),
            ConfigKey::ChannelsRepeatCanopyOpen => config.channels.repeat_canopy_open.to_string(),
            ConfigKey::AugmentationLandingVelocityKt => augmentation.landing_velocity_kt.to_string(),
            ConfigKey::AugmentationLandingPitchDeg => augmentation.landing_pitch_deg.to_string(),
            ConfigKey::AugmentationFlarePitchDeg => augmentation.flare_pitch_deg.to_string(),
            ConfigKey::AugmentationApproachPitchDeg => augmentation.approach_pitch_deg.to_string(),
            ConfigKey::AugmentationApproachWindowSeconds => {
                augmentation.approach_window_seconds.to_string()
            }
            ConfigKey::AugmentationMaxBankDeg => augmentation.max_bank_deg.to_string(),
            ConfigKey::AugmentationBankHeadingChangeDeg => {
                augmentation.bank_heading_change_deg.to_string()
            }
            ConfigKey::AugmentationFirstMovementDistanceM => {
                augmentation.first_movement_distance_m.to_string()
            }
            ConfigKey::StorageDirectory => path_to_string(&config.storage.directory),
            ConfigKey::LoggingDirectory => path_to_string(&config.logging.directory),
            ConfigKey::LoggingFile => config.logging.file.clone(),
        }
    }

    /// Set the value in a config file.
    ///
    /// The config is left untouched when the value is rejected.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let mut ini = Ini::new();
        ini.with_section(Some(self.section()))
            .set(self.key_name(), value);

        let mut updated = config.clone();
        apply_ini(&ini, &mut updated).map_err(|error| {
            let reason = match error {
                ConfigFileError::InvalidValue { reason, .. } => reason,
                other => other.to_string(),
            };
            ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            }
        })?;
        *config = updated;
        Ok(())
    }

    /// Check a value without applying it.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.set(&mut ConfigFile::default(), value)
    }
}
