//! Original-rate and resampled channel reads for export.
//!
//! Resampling walks a fixed grid from 0 to the last sample and evaluates
//! [`Access::Export`] at each step, so the aircraft time offset does not
//! shift exported data. The last sample is always included.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::aircraft::Aircraft;
use crate::channel::{Access, Channel};
use crate::sample::{
    AircraftHandleSample, EngineSample, LightSample, PositionSample, PrimaryFlightControlSample,
    SampleKind, SecondaryFlightControlSample,
};
use crate::search::Timestamped;

/// Export sample period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResamplingPeriod {
    /// Every recorded sample, unmodified.
    Original,
    TenHz,
    FiveHz,
    TwoHz,
    #[default]
    OneHz,
    AFifthHz,
    ATenthHz,
}

impl ResamplingPeriod {
    pub fn all() -> &'static [ResamplingPeriod] {
        &[
            ResamplingPeriod::Original,
            ResamplingPeriod::TenHz,
            ResamplingPeriod::FiveHz,
            ResamplingPeriod::TwoHz,
            ResamplingPeriod::OneHz,
            ResamplingPeriod::AFifthHz,
            ResamplingPeriod::ATenthHz,
        ]
    }

    /// Grid step in milliseconds; `None` for original data.
    pub fn millis(&self) -> Option<i64> {
        match self {
            ResamplingPeriod::Original => None,
            ResamplingPeriod::TenHz => Some(100),
            ResamplingPeriod::FiveHz => Some(200),
            ResamplingPeriod::TwoHz => Some(500),
            ResamplingPeriod::OneHz => Some(1_000),
            ResamplingPeriod::AFifthHz => Some(5_000),
            ResamplingPeriod::ATenthHz => Some(10_000),
        }
    }
}

impl fmt::Display for ResamplingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResamplingPeriod::Original => "original",
            ResamplingPeriod::TenHz => "10hz",
            ResamplingPeriod::FiveHz => "5hz",
            ResamplingPeriod::TwoHz => "2hz",
            ResamplingPeriod::OneHz => "1hz",
            ResamplingPeriod::AFifthHz => "0.2hz",
            ResamplingPeriod::ATenthHz => "0.1hz",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ResamplingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace(' ', "");
        ResamplingPeriod::all()
            .iter()
            .copied()
            .find(|period| period.to_string() == normalised)
            .ok_or_else(|| {
                format!(
                    "invalid resampling period '{}' (expected original, 10hz, 5hz, 2hz, 1hz, 0.2hz or 0.1hz)",
                    s
                )
            })
    }
}

/// Samples of `channel` at the given period.
pub fn resample<S: SampleKind>(channel: &Channel<S>, period: ResamplingPeriod) -> Vec<S> {
    let Some(step) = period.millis() else {
        return channel.iter().cloned().collect();
    };
    let Some(last) = channel.last().map(Timestamped::timestamp) else {
        return Vec::new();
    };

    let mut samples = Vec::with_capacity((last.max(0) / step) as usize + 2);
    let mut timestamp = 0;
    while timestamp <= last {
        let sample = channel.interpolate(timestamp, Access::Export);
        if !sample.is_null() {
            samples.push(sample);
        }
        timestamp += step;
    }
    if samples.last().map(Timestamped::timestamp) != Some(last) {
        samples.push(channel.interpolate(last, Access::Export));
    }
    samples
}

/// Every channel of one aircraft, resampled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedAircraft {
    pub id: u64,
    pub position: Vec<PositionSample>,
    pub engine: Vec<EngineSample>,
    pub primary_flight_control: Vec<PrimaryFlightControlSample>,
    pub secondary_flight_control: Vec<SecondaryFlightControlSample>,
    pub aircraft_handle: Vec<AircraftHandleSample>,
    pub light: Vec<LightSample>,
}

pub fn resample_aircraft(aircraft: &Aircraft, period: ResamplingPeriod) -> ExportedAircraft {
    let exported = ExportedAircraft {
        id: aircraft.id(),
        position: resample(aircraft.position(), period),
        engine: resample(aircraft.engine(), period),
        primary_flight_control: resample(aircraft.primary_flight_control(), period),
        secondary_flight_control: resample(aircraft.secondary_flight_control(), period),
        aircraft_handle: resample(aircraft.aircraft_handle(), period),
        light: resample(aircraft.light(), period),
    };
    tracing::debug!(
        aircraft = aircraft.id(),
        period = %period,
        positions = exported.position.len(),
        "Resampled aircraft"
    );
    exported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::AircraftInfo;

    fn position_channel(points: &[(i64, f64)]) -> Channel<PositionSample> {
        let mut channel = Channel::new();
        for &(t, altitude) in points {
            channel.append_or_replace(PositionSample::at(t, 0.0, 0.0, altitude));
        }
        channel
    }

    #[test]
    fn test_period_parsing() {
        for period in ResamplingPeriod::all() {
            assert_eq!(period.to_string().parse::<ResamplingPeriod>().unwrap(), *period);
        }
        assert_eq!("10 Hz".parse::<ResamplingPeriod>().unwrap(), ResamplingPeriod::TenHz);
        assert!("3hz".parse::<ResamplingPeriod>().is_err());
    }

    #[test]
    fn test_original_returns_every_sample() {
        let channel = position_channel(&[(0, 0.0), (130, 1.0), (170, 2.0)]);
        let samples = resample(&channel, ResamplingPeriod::Original);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].timestamp, 130);
    }

    #[test]
    fn test_resample_grid_includes_last_sample() {
        let channel = position_channel(&[(0, 0.0), (2_500, 250.0)]);
        let samples = resample(&channel, ResamplingPeriod::OneHz);

        let timestamps: Vec<i64> = samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![0, 1_000, 2_000, 2_500]);
        assert!((samples[1].altitude - 100.0).abs() < 1e-9);
        assert_eq!(samples[3].altitude, 250.0);
    }

    #[test]
    fn test_resample_ignores_time_offset() {
        let mut aircraft = Aircraft::new(AircraftInfo::new(3));
        aircraft.position_mut().append_or_replace(PositionSample::at(0, 0.0, 0.0, 0.0));
        aircraft.position_mut().append_or_replace(PositionSample::at(1_000, 0.0, 0.0, 10.0));
        aircraft.set_time_offset(500);

        let exported = resample_aircraft(&aircraft, ResamplingPeriod::TwoHz);
        assert_eq!(exported.id, 3);
        assert_eq!(exported.position.len(), 3);
        assert!((exported.position[1].altitude - 5.0).abs() < 1e-9);
        assert!(exported.engine.is_empty());
    }

    #[test]
    fn test_resample_empty_channel() {
        let channel: Channel<PositionSample> = Channel::new();
        assert!(resample(&channel, ResamplingPeriod::TenHz).is_empty());
    }
}
