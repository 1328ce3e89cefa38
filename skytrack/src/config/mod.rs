//! Application configuration.
//!
//! Settings are read from `~/.skytrack/config.ini` and turned into the
//! runtime configuration of each component:
//!
//! - [`ConfigFile::clock_config`] for the [`PlaybackClock`](crate::clock::PlaybackClock)
//! - [`ConfigFile::channel_policies`] for flights and repositories
//! - [`ConfigFile::augmentation_config`] for [`FlightAugmentation`](crate::augmentation::FlightAugmentation)
//!
//! # Example
//!
//! ```ignore
//! use skytrack::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let clock = PlaybackClock::new(connector, config.clock_config());
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use file::*;
pub use keys::{ConfigKey, ConfigKeyError};

use crate::augmentation::{AugmentationConfig, Aspects, Procedures};
use crate::aircraft::ChannelPolicies;
use crate::channel::ChannelPolicy;
use crate::clock::{ClockConfig, SeekInterval};

impl ConfigFile {
    pub fn clock_config(&self) -> ClockConfig {
        let seek_interval = if self.replay.absolute_seek {
            SeekInterval::Absolute {
                seconds: self.replay.seek_interval_seconds,
            }
        } else {
            SeekInterval::Percent(self.replay.seek_interval_percent)
        };
        ClockConfig {
            replay_loop: self.replay.replay_loop,
            seek_interval,
            sample_rate: self.recording.sample_rate,
            recording_mode: self.recording.mode,
            time_scale: self.replay.speed_factor,
        }
    }

    pub fn channel_policies(&self) -> ChannelPolicies {
        let policy = ChannelPolicy::default()
            .with_binary_search_threshold(self.channels.binary_search_threshold_ms);
        ChannelPolicies::uniform(policy)
            .with_interpolation_window(self.channels.interpolation_window_ms)
            .with_repeat_canopy_open(self.channels.repeat_canopy_open)
    }

    /// Augmentation constants with every procedure and aspect selected.
    pub fn augmentation_config(&self) -> AugmentationConfig {
        let settings = &self.augmentation;
        AugmentationConfig {
            procedures: Procedures::all(),
            aspects: Aspects::all(),
            landing_velocity_kt: settings.landing_velocity_kt,
            landing_pitch_deg: settings.landing_pitch_deg,
            flare_pitch_deg: settings.flare_pitch_deg,
            approach_pitch_deg: settings.approach_pitch_deg,
            approach_window_ms: (settings.approach_window_seconds as i64).saturating_mul(1_000),
            max_bank_deg: settings.max_bank_deg,
            bank_heading_change_deg: settings.bank_heading_change_deg,
            first_movement_distance_m: settings.first_movement_distance_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::HoldPolicy;

    #[test]
    fn test_default_runtime_configs() {
        let config = ConfigFile::default();
        assert_eq!(config.clock_config(), ClockConfig::default());
        assert_eq!(config.channel_policies(), ChannelPolicies::default());

        let augmentation = config.augmentation_config();
        assert_eq!(augmentation.approach_window_ms, 180_000);
        assert_eq!(augmentation.landing_velocity_kt, 140.0);
    }

    #[test]
    fn test_percent_seek_and_windowed_channels() {
        let mut config = ConfigFile::default();
        config.replay.absolute_seek = false;
        config.replay.seek_interval_percent = 10.0;
        config.channels.interpolation_window_ms = Some(2_000);
        config.channels.repeat_canopy_open = true;

        assert_eq!(config.clock_config().seek_interval, SeekInterval::Percent(10.0));

        let policies = config.channel_policies();
        assert_eq!(policies.position.interpolation_window_ms, None);
        assert_eq!(policies.engine.interpolation_window_ms, Some(2_000));
        assert_eq!(policies.aircraft_handle.hold, HoldPolicy::RepeatPrevious);
        assert_eq!(policies.light.hold, HoldPolicy::Null);
    }
}
