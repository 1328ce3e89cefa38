//! Sample types for the six recorded data channels.
//!
//! Every channel stores a different sample type, but all of them share the
//! same shape: a millisecond timestamp plus a set of fields, each of which is
//! either continuous (blended between the bracketing samples), circular
//! (blended along the shortest arc) or discrete (held from the left sample).
//!
//! The `define_sample!` macro generates a sample struct together with its
//! [`SampleKind`] implementation from a single field table, so the channel
//! store never needs a hand-written `interpolate` body per channel.
//!
//! # Example
//!
//! ```ignore
//! define_sample! {
//!     /// Rudder and elevator.
//!     pub struct TailSample: ChannelKind::PrimaryFlightControl {
//!         /// Normalised rudder deflection.
//!         rudder: i16 => linear,
//!         /// Yaw damper engaged.
//!         yaw_damper: bool => hold,
//!     }
//! }
//! ```

mod interpolate;

pub use interpolate::{interpolate_wrapped, AngleRange, Interpolate};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::search::Timestamped;

/// Timestamp value marking a null sample.
pub const INVALID_TIMESTAMP: i64 = i64::MIN;

/// The data category a sample type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Position,
    Engine,
    PrimaryFlightControl,
    SecondaryFlightControl,
    AircraftHandle,
    Light,
}

impl ChannelKind {
    /// All channel kinds, in storage order.
    pub fn all() -> &'static [ChannelKind] {
        &[
            ChannelKind::Position,
            ChannelKind::Engine,
            ChannelKind::PrimaryFlightControl,
            ChannelKind::SecondaryFlightControl,
            ChannelKind::AircraftHandle,
            ChannelKind::Light,
        ]
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Position => write!(f, "position"),
            ChannelKind::Engine => write!(f, "engine"),
            ChannelKind::PrimaryFlightControl => write!(f, "primary flight controls"),
            ChannelKind::SecondaryFlightControl => write!(f, "secondary flight controls"),
            ChannelKind::AircraftHandle => write!(f, "aircraft handles"),
            ChannelKind::Light => write!(f, "lights"),
        }
    }
}

/// How a single sample field behaves between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Linear blend.
    Continuous,
    /// Blend along the shortest arc, renormalised to the given range.
    Circular(AngleRange),
    /// Value of the left sample.
    Discrete,
}

/// Static description of one sample field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// A timestamped sample that can be stored in a [`crate::channel::Channel`].
pub trait SampleKind: Timestamped + Clone + Default + PartialEq + fmt::Debug {
    /// Channel this sample type is stored in.
    const CHANNEL: ChannelKind;

    fn set_timestamp(&mut self, timestamp: i64);

    /// Field table, in declaration order.
    fn fields() -> &'static [FieldInfo];

    /// Blend two samples at normalised time `tn` in [0, 1].
    ///
    /// The result carries `p1`'s timestamp; callers re-stamp it.
    fn blend(p1: &Self, p2: &Self, tn: f64) -> Self;

    /// Whether an unresolved query may repeat this sample.
    ///
    /// Only consulted by channels using [`crate::channel::HoldPolicy::RepeatPrevious`].
    fn repeats_when_unresolved(&self) -> bool {
        false
    }

    /// The null sample.
    fn null() -> Self {
        let mut sample = Self::default();
        sample.set_timestamp(INVALID_TIMESTAMP);
        sample
    }

    fn is_null(&self) -> bool {
        self.timestamp() == INVALID_TIMESTAMP
    }
}

/// Define a sample struct and its [`SampleKind`] implementation.
///
/// Field modes: `linear`, `wrap180`, `wrap360` and `hold`. An optional
/// trailing `repeat_while(sample) { ... }` block overrides
/// [`SampleKind::repeats_when_unresolved`].
macro_rules! define_sample {
    (@kind linear) => { $crate::sample::FieldKind::Continuous };
    (@kind wrap180) => {
        $crate::sample::FieldKind::Circular($crate::sample::AngleRange::Signed180)
    };
    (@kind wrap360) => {
        $crate::sample::FieldKind::Circular($crate::sample::AngleRange::Unsigned360)
    };
    (@kind hold) => { $crate::sample::FieldKind::Discrete };

    (@blend linear, $a:expr, $b:expr, $tn:expr) => {
        $crate::sample::Interpolate::interpolate($a, $b, $tn)
    };
    (@blend wrap180, $a:expr, $b:expr, $tn:expr) => {
        $crate::sample::interpolate_wrapped($a, $b, $tn, $crate::sample::AngleRange::Signed180)
    };
    (@blend wrap360, $a:expr, $b:expr, $tn:expr) => {
        $crate::sample::interpolate_wrapped($a, $b, $tn, $crate::sample::AngleRange::Unsigned360)
    };
    (@blend hold, $a:expr, $b:expr, $tn:expr) => {{
        let _ = (&$b, $tn);
        $a
    }};

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $channel:path {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty => $mode:ident
            ),* $(,)?
        }
        $( repeat_while($this:ident) $repeat:block )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
        $vis struct $name {
            /// Milliseconds since the start of the recording.
            pub timestamp: i64,
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl $crate::search::Timestamped for $name {
            fn timestamp(&self) -> i64 {
                self.timestamp
            }
        }

        impl $crate::sample::SampleKind for $name {
            const CHANNEL: $crate::sample::ChannelKind = $channel;

            fn set_timestamp(&mut self, timestamp: i64) {
                self.timestamp = timestamp;
            }

            fn fields() -> &'static [$crate::sample::FieldInfo] {
                &[
                    $(
                        $crate::sample::FieldInfo {
                            name: stringify!($field),
                            kind: define_sample!(@kind $mode),
                        },
                    )*
                ]
            }

            fn blend(p1: &Self, p2: &Self, tn: f64) -> Self {
                Self {
                    timestamp: p1.timestamp,
                    $( $field: define_sample!(@blend $mode, p1.$field, p2.$field, tn), )*
                }
            }

            $(
                fn repeats_when_unresolved(&self) -> bool {
                    let $this = self;
                    $repeat
                }
            )?
        }
    };
}

mod engine;
mod flight_control;
mod handle;
mod light;
mod position;

pub use engine::{EngineSample, ENGINE_COUNT};
pub use flight_control::{PrimaryFlightControlSample, SecondaryFlightControlSample};
pub use handle::AircraftHandleSample;
pub use light::{LightSample, LightStates};
pub use position::PositionSample;
