//! Synthesis of unrecorded channels.
//!
//! Imported flights often contain nothing but positions. [`FlightAugmentation`]
//! derives attitude and body velocities from consecutive positions and adds
//! generic start and landing key frames (engines, flaps, gear, lights) so that
//! a replay looks plausible.
//!
//! # Design
//!
//! - Attitude and velocity are computed per adjacent position pair, then
//!   written back in one `replace_all`
//! - The start sequence is anchored at timestamp 0, the landing sequence at
//!   the last position; on short flights they overlap, so every key-framed
//!   channel is sorted afterwards
//! - Augmentation never fails; an empty position channel is a no-op
//!
//! # Example
//!
//! ```ignore
//! let augmentation = FlightAugmentation::with_defaults();
//! let summary = augmentation.augment(flight.user_aircraft_mut());
//! tracing::info!(positions = summary.position_samples, "Augmented");
//! ```

pub mod analytics;
mod attitude;
mod procedures;

use bitflags::bitflags;

use crate::aircraft::Aircraft;

/// Estimated landing speed in knots.
pub const DEFAULT_LANDING_VELOCITY_KT: f64 = 140.0;

/// Pitch of the last sample when synthesising attitude.
///
/// Negative pitch means nose up.
pub const DEFAULT_LANDING_PITCH_DEG: f64 = -3.0;

/// Pitch of the last sample applied by the landing procedure.
pub const DEFAULT_FLARE_PITCH_DEG: f64 = DEFAULT_LANDING_PITCH_DEG;

/// Pitch applied to the final approach window.
pub const DEFAULT_APPROACH_PITCH_DEG: f64 = -3.0;

/// Length of the final approach window (3 minutes).
pub const DEFAULT_APPROACH_WINDOW_MS: i64 = 3 * 60 * 1000;

pub const DEFAULT_MAX_BANK_DEG: f64 = 25.0;

/// Heading change per sample that produces the maximum bank angle.
pub const DEFAULT_BANK_HEADING_CHANGE_DEG: f64 = 45.0;

/// Distance that counts as the first real movement of the aircraft.
pub const DEFAULT_FIRST_MOVEMENT_DISTANCE_M: f64 = 10.0;

bitflags! {
    /// Procedural key frame sequences.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Procedures: u8 {
        const START = 0b01;
        const LANDING = 0b10;
    }
}

bitflags! {
    /// Data aspects augmentation may overwrite.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Aspects: u8 {
        const PITCH = 0b00_0001;
        const BANK = 0b00_0010;
        const HEADING = 0b00_0100;
        const VELOCITY = 0b00_1000;
        const ENGINE = 0b01_0000;
        const LIGHT = 0b10_0000;

        const ATTITUDE = Self::PITCH.bits() | Self::BANK.bits() | Self::HEADING.bits();
        const ATTITUDE_AND_VELOCITY = Self::ATTITUDE.bits() | Self::VELOCITY.bits();
    }
}

/// Augmentation selection and constants.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentationConfig {
    pub procedures: Procedures,
    pub aspects: Aspects,
    pub landing_velocity_kt: f64,
    pub landing_pitch_deg: f64,
    pub flare_pitch_deg: f64,
    pub approach_pitch_deg: f64,
    pub approach_window_ms: i64,
    pub max_bank_deg: f64,
    pub bank_heading_change_deg: f64,
    pub first_movement_distance_m: f64,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            procedures: Procedures::all(),
            aspects: Aspects::all(),
            landing_velocity_kt: DEFAULT_LANDING_VELOCITY_KT,
            landing_pitch_deg: DEFAULT_LANDING_PITCH_DEG,
            flare_pitch_deg: DEFAULT_FLARE_PITCH_DEG,
            approach_pitch_deg: DEFAULT_APPROACH_PITCH_DEG,
            approach_window_ms: DEFAULT_APPROACH_WINDOW_MS,
            max_bank_deg: DEFAULT_MAX_BANK_DEG,
            bank_heading_change_deg: DEFAULT_BANK_HEADING_CHANGE_DEG,
            first_movement_distance_m: DEFAULT_FIRST_MOVEMENT_DISTANCE_M,
        }
    }
}

/// What an augmentation run wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AugmentationSummary {
    /// Position samples whose attitude or velocity was synthesised.
    pub position_samples: usize,
    /// Key frames written by the start and landing procedures.
    pub key_frames: usize,
}

/// Fills in attitude, velocity and procedural channels of an aircraft.
#[derive(Debug, Clone, Default)]
pub struct FlightAugmentation {
    config: AugmentationConfig,
}

impl FlightAugmentation {
    pub fn new(config: AugmentationConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    pub fn set_procedures(&mut self, procedures: Procedures) {
        self.config.procedures = procedures;
    }

    pub fn set_aspects(&mut self, aspects: Aspects) {
        self.config.aspects = aspects;
    }

    /// Augment `aircraft` in place.
    pub fn augment(&self, aircraft: &mut Aircraft) -> AugmentationSummary {
        let mut summary = AugmentationSummary::default();
        if aircraft.position().is_empty() {
            tracing::debug!(aircraft = aircraft.id(), "No positions, nothing to augment");
            return summary;
        }

        if self.config.aspects.intersects(Aspects::ATTITUDE_AND_VELOCITY) {
            summary.position_samples =
                attitude::augment_attitude_and_velocity(aircraft.position_mut(), &self.config);
        }

        if !self.config.procedures.is_empty() {
            summary.key_frames = procedures::augment_procedures(aircraft, &self.config);
        }

        tracing::info!(
            aircraft = aircraft.id(),
            positions = summary.position_samples,
            key_frames = summary.key_frames,
            duration_ms = aircraft.duration(),
            "Augmented aircraft"
        );
        summary
    }
}
