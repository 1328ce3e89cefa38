//! Light switch samples.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::ChannelKind;

bitflags! {
    /// Light switches that are on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct LightStates: u16 {
        const NAVIGATION = 0x0001;
        const BEACON = 0x0002;
        const LANDING = 0x0004;
        const TAXI = 0x0008;
        const STROBE = 0x0010;
        const PANEL = 0x0020;
        const RECOGNITION = 0x0040;
        const WING = 0x0080;
        const LOGO = 0x0100;
        const CABIN = 0x0200;
    }
}

define_sample! {
    pub struct LightSample: ChannelKind::Light {
        light_states: LightStates => hold,
    }
}

impl LightSample {
    pub fn new(timestamp: i64, light_states: LightStates) -> Self {
        Self {
            timestamp,
            light_states,
        }
    }
}
