//! Brakes, gear, tailhook, canopy and other handle samples.

use super::ChannelKind;

define_sample! {
    /// Aircraft handle positions.
    pub struct AircraftHandleSample: ChannelKind::AircraftHandle {
        brake_left_position: i16 => linear,
        brake_right_position: i16 => linear,
        gear_steer_position: i16 => linear,
        water_rudder_handle_position: i16 => linear,
        /// Percent encoded.
        tailhook_position: u8 => linear,
        /// Percent encoded; non-zero while the canopy is open.
        canopy_open: u8 => linear,
        left_wing_folding: u8 => linear,
        right_wing_folding: u8 => linear,
        /// `true` = gear down.
        gear_handle_position: bool => hold,
        /// `true` = tailhook down.
        tailhook_handle_position: bool => hold,
        /// `true` = wings folded.
        folding_wing_handle_position: bool => hold,
        smoke_enabled: bool => hold,
    }
    repeat_while(sample) { sample.canopy_open > 0 }
}

impl AircraftHandleSample {
    pub fn with_gear_down(timestamp: i64, gear_down: bool) -> Self {
        Self {
            timestamp,
            gear_handle_position: gear_down,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleKind;

    #[test]
    fn test_repeats_only_while_canopy_open() {
        let closed = AircraftHandleSample::with_gear_down(0, true);
        assert!(!closed.repeats_when_unresolved());

        let open = AircraftHandleSample {
            canopy_open: 255,
            ..closed
        };
        assert!(open.repeats_when_unresolved());
    }
}
