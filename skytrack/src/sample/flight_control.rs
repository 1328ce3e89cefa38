//! Primary and secondary flight control samples.

use super::ChannelKind;

define_sample! {
    /// Control surface deflections, normalised.
    pub struct PrimaryFlightControlSample: ChannelKind::PrimaryFlightControl {
        rudder_position: i16 => linear,
        elevator_position: i16 => linear,
        aileron_position: i16 => linear,
    }
}

define_sample! {
    /// Flaps, slats and spoilers.
    pub struct SecondaryFlightControlSample: ChannelKind::SecondaryFlightControl {
        /// Normalised leading edge flap (slat) positions.
        left_leading_edge_flaps_position: i16 => linear,
        right_leading_edge_flaps_position: i16 => linear,
        /// Normalised trailing edge flap positions.
        left_trailing_edge_flaps_position: i16 => linear,
        right_trailing_edge_flaps_position: i16 => linear,
        /// Spoiler deployment, percent encoded.
        left_spoilers_position: u8 => linear,
        right_spoilers_position: u8 => linear,
        /// Spoilers handle, percent encoded.
        spoilers_handle_percent: u8 => linear,
        /// Detent index of the flaps handle.
        flaps_handle_index: i8 => hold,
        spoilers_armed: bool => hold,
    }
}

impl SecondaryFlightControlSample {
    /// Set both leading and trailing edge flaps symmetrically.
    pub fn with_flaps(mut self, leading_edge: i16, trailing_edge: i16) -> Self {
        self.left_leading_edge_flaps_position = leading_edge;
        self.right_leading_edge_flaps_position = leading_edge;
        self.left_trailing_edge_flaps_position = trailing_edge;
        self.right_trailing_edge_flaps_position = trailing_edge;
        self
    }
}
