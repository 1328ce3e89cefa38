//! Engine lever and state samples.

use super::ChannelKind;

/// Number of engines recorded per aircraft.
pub const ENGINE_COUNT: usize = 4;

define_sample! {
    /// Engine levers and switches for up to four engines.
    pub struct EngineSample: ChannelKind::Engine {
        /// Normalised throttle lever positions (negative = reverse).
        throttle_lever_position: [i16; ENGINE_COUNT] => linear,
        /// Normalised propeller lever positions.
        propeller_lever_position: [i16; ENGINE_COUNT] => linear,
        /// Mixture lever positions, percent encoded.
        mixture_lever_position: [u8; ENGINE_COUNT] => linear,
        /// Cowl flap positions, percent encoded.
        cowl_flap_position: [u8; ENGINE_COUNT] => linear,
        electrical_master_battery: [bool; ENGINE_COUNT] => hold,
        general_engine_starter: [bool; ENGINE_COUNT] => hold,
        general_engine_combustion: [bool; ENGINE_COUNT] => hold,
    }
}

impl EngineSample {
    /// Set the same lever positions on every engine.
    pub fn with_levers(mut self, throttle: i16, propeller: i16, mixture: u8) -> Self {
        self.throttle_lever_position = [throttle; ENGINE_COUNT];
        self.propeller_lever_position = [propeller; ENGINE_COUNT];
        self.mixture_lever_position = [mixture; ENGINE_COUNT];
        self
    }

    /// Battery and combustion on (or off) for every engine.
    pub fn with_engines_running(mut self, running: bool) -> Self {
        self.electrical_master_battery = [running; ENGINE_COUNT];
        self.general_engine_combustion = [running; ENGINE_COUNT];
        self
    }

    /// Whether every engine has battery and combustion on.
    pub fn all_engines_running(&self) -> bool {
        self.electrical_master_battery.iter().all(|&on| on)
            && self.general_engine_combustion.iter().all(|&on| on)
    }
}
