//! Start and landing key frame sequences.
//!
//! Start key frames are anchored at timestamp 0 and clamped to the last
//! position; landing key frames are anchored at the last position and
//! clamped to 0. Offsets below are in milliseconds from the anchor.

use super::{Aspects, AugmentationConfig, Procedures};
use crate::aircraft::Aircraft;
use crate::math::{from_normalised_position, from_percent};
use crate::sample::{
    AircraftHandleSample, EngineSample, LightSample, LightStates, PositionSample,
    SecondaryFlightControlSample,
};

const SECOND: i64 = 1_000;
const MINUTE: i64 = 60 * SECOND;

struct EngineKeyFrame {
    offset: i64,
    throttle: f64,
    propeller: f64,
    mixture_percent: f64,
}

struct FlapsKeyFrame {
    offset: i64,
    handle_index: i8,
    leading_edge: f64,
    trailing_edge: f64,
    spoilers_percent: f64,
}

const START_ENGINE: [EngineKeyFrame; 3] = [
    EngineKeyFrame { offset: 0, throttle: 1.0, propeller: 1.0, mixture_percent: 100.0 },
    // Climb detent
    EngineKeyFrame { offset: 2 * MINUTE, throttle: 0.86, propeller: 0.80, mixture_percent: 85.0 },
    EngineKeyFrame { offset: 5 * MINUTE, throttle: 0.86, propeller: 0.80, mixture_percent: 75.0 },
];

const LANDING_ENGINE: [EngineKeyFrame; 3] = [
    EngineKeyFrame { offset: 5 * MINUTE, throttle: 0.86, propeller: 0.60, mixture_percent: 85.0 },
    EngineKeyFrame { offset: 2 * MINUTE, throttle: 0.86, propeller: 0.40, mixture_percent: 100.0 },
    // Reverse thrust
    EngineKeyFrame { offset: 0, throttle: -0.2, propeller: 0.0, mixture_percent: 100.0 },
];

const START_FLAPS: [FlapsKeyFrame; 2] = [
    FlapsKeyFrame { offset: 0, handle_index: 1, leading_edge: 0.666, trailing_edge: 0.286, spoilers_percent: 0.0 },
    FlapsKeyFrame { offset: 30 * SECOND, handle_index: 0, leading_edge: 0.0, trailing_edge: 0.0, spoilers_percent: 0.0 },
];

const LANDING_FLAPS: [FlapsKeyFrame; 6] = [
    FlapsKeyFrame { offset: 10 * MINUTE, handle_index: 0, leading_edge: 0.0, trailing_edge: 0.0, spoilers_percent: 20.0 },
    FlapsKeyFrame { offset: 8 * MINUTE, handle_index: 1, leading_edge: 0.666, trailing_edge: 0.286, spoilers_percent: 40.0 },
    FlapsKeyFrame { offset: 7 * MINUTE, handle_index: 2, leading_edge: 0.8157, trailing_edge: 0.4275, spoilers_percent: 60.0 },
    FlapsKeyFrame { offset: 5 * MINUTE, handle_index: 3, leading_edge: 0.8157, trailing_edge: 0.5725, spoilers_percent: 20.0 },
    FlapsKeyFrame { offset: 4 * MINUTE, handle_index: 4, leading_edge: 1.0, trailing_edge: 1.0, spoilers_percent: 0.0 },
    FlapsKeyFrame { offset: 0, handle_index: 4, leading_edge: 1.0, trailing_edge: 1.0, spoilers_percent: 100.0 },
];

/// (offset, gear down)
const START_GEAR: [(i64, bool); 2] = [(0, true), (5 * SECOND, false)];
const LANDING_GEAR: [(i64, bool); 1] = [(3 * MINUTE, true)];

fn start_lights() -> [(i64, LightStates); 3] {
    let cruise = LightStates::NAVIGATION
        | LightStates::BEACON
        | LightStates::STROBE
        | LightStates::PANEL
        | LightStates::RECOGNITION
        | LightStates::LOGO;
    [
        (0, cruise | LightStates::WING | LightStates::LANDING),
        (3 * MINUTE, cruise | LightStates::WING),
        (4 * MINUTE, cruise),
    ]
}

fn landing_lights() -> [(i64, LightStates); 3] {
    let approach = LightStates::NAVIGATION
        | LightStates::BEACON
        | LightStates::STROBE
        | LightStates::PANEL
        | LightStates::RECOGNITION
        | LightStates::WING
        | LightStates::LOGO;
    [
        (8 * MINUTE, approach),
        (6 * MINUTE, approach | LightStates::LANDING),
        (4 * MINUTE, approach | LightStates::LANDING | LightStates::TAXI),
    ]
}

/// Run the selected procedures and sort every key-framed channel.
///
/// Returns the number of key frames written.
pub(super) fn augment_procedures(aircraft: &mut Aircraft, config: &AugmentationConfig) -> usize {
    let Some(last) = aircraft.position().last().map(|s| s.timestamp) else {
        return 0;
    };

    let mut key_frames = 0;
    if config.procedures.contains(Procedures::START) {
        key_frames += start(aircraft, last, config.aspects);
    }
    if config.procedures.contains(Procedures::LANDING) {
        key_frames += landing(aircraft, last, config);
    }

    // Short flights interleave the two sequences
    aircraft.engine_mut().sort();
    aircraft.secondary_flight_control_mut().sort();
    aircraft.aircraft_handle_mut().sort();
    aircraft.light_mut().sort();
    key_frames
}

fn start(aircraft: &mut Aircraft, last: i64, aspects: Aspects) -> usize {
    let at = |offset: i64| offset.min(last);
    let mut written = 0;

    if aspects.contains(Aspects::ENGINE) {
        for frame in &START_ENGINE {
            aircraft
                .engine_mut()
                .append_or_replace(engine_sample(at(frame.offset), frame));
            written += 1;
        }
    }

    for frame in &START_FLAPS {
        aircraft
            .secondary_flight_control_mut()
            .append_or_replace(flaps_sample(at(frame.offset), frame));
        written += 1;
    }

    for &(offset, gear_down) in &START_GEAR {
        aircraft
            .aircraft_handle_mut()
            .append_or_replace(AircraftHandleSample::with_gear_down(at(offset), gear_down));
        written += 1;
    }

    if aspects.contains(Aspects::LIGHT) {
        for (offset, states) in start_lights() {
            aircraft
                .light_mut()
                .append_or_replace(LightSample::new(at(offset), states));
            written += 1;
        }
    }

    tracing::debug!(last, key_frames = written, "Start procedure");
    written
}

fn landing(aircraft: &mut Aircraft, last: i64, config: &AugmentationConfig) -> usize {
    let at = |offset: i64| (last - offset).max(0);
    let mut written = 0;

    if config.aspects.contains(Aspects::ENGINE) {
        for frame in &LANDING_ENGINE {
            aircraft.engine_mut().upsert(engine_sample(at(frame.offset), frame));
            written += 1;
        }
    }

    for frame in &LANDING_FLAPS {
        aircraft
            .secondary_flight_control_mut()
            .upsert(flaps_sample(at(frame.offset), frame));
        written += 1;
    }

    for &(offset, gear_down) in &LANDING_GEAR {
        aircraft
            .aircraft_handle_mut()
            .upsert(AircraftHandleSample::with_gear_down(at(offset), gear_down));
        written += 1;
    }

    if config.aspects.contains(Aspects::LIGHT) {
        for (offset, states) in landing_lights() {
            aircraft.light_mut().upsert(LightSample::new(at(offset), states));
            written += 1;
        }
    }

    if config.aspects.contains(Aspects::PITCH) {
        approach_pitch(aircraft, last, config);
    }

    tracing::debug!(last, key_frames = written, "Landing procedure");
    written
}

/// Flare on the last sample, fixed approach pitch on the window before it.
fn approach_pitch(aircraft: &mut Aircraft, last: i64, config: &AugmentationConfig) {
    let mut samples: Vec<PositionSample> = aircraft.position().iter().copied().collect();
    // A single sample is a stationary aircraft; it keeps its zero attitude
    let Some((final_sample, approach)) = samples.split_last_mut().filter(|(_, a)| !a.is_empty())
    else {
        return;
    };
    final_sample.pitch = config.flare_pitch_deg;

    let window_start = (last - config.approach_window_ms).max(0);
    for sample in approach
        .iter_mut()
        .rev()
        .take_while(|sample| sample.timestamp >= window_start)
    {
        sample.pitch = config.approach_pitch_deg;
    }
    aircraft.position_mut().replace_all(samples);
}

fn engine_sample(timestamp: i64, frame: &EngineKeyFrame) -> EngineSample {
    EngineSample {
        timestamp,
        ..Default::default()
    }
    .with_levers(
        from_normalised_position(frame.throttle),
        from_normalised_position(frame.propeller),
        from_percent(frame.mixture_percent),
    )
    .with_engines_running(true)
}

fn flaps_sample(timestamp: i64, frame: &FlapsKeyFrame) -> SecondaryFlightControlSample {
    SecondaryFlightControlSample {
        timestamp,
        flaps_handle_index: frame.handle_index,
        spoilers_handle_percent: from_percent(frame.spoilers_percent),
        ..Default::default()
    }
    .with_flaps(
        from_normalised_position(frame.leading_edge),
        from_normalised_position(frame.trailing_edge),
    )
}
