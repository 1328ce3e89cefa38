//! Recording and replay options.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How often a recording captures a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleRate {
    /// Capture on every tick.
    #[default]
    Auto,
    /// Capture at most this many frames per second.
    Hz(u32),
}

impl SampleRate {
    /// Fixed rates offered besides `Auto`.
    pub const SUPPORTED_HZ: [u32; 12] = [1, 2, 5, 10, 15, 20, 24, 25, 30, 45, 50, 60];

    /// Minimum interval between captured frames; `None` for `Auto`.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            SampleRate::Auto => None,
            SampleRate::Hz(hz) => Some(Duration::from_nanos(
                1_000_000_000 / u64::from((*hz).max(1)),
            )),
        }
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleRate::Auto => write!(f, "auto"),
            SampleRate::Hz(hz) => write!(f, "{}", hz),
        }
    }
}

impl FromStr for SampleRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "auto" {
            return Ok(SampleRate::Auto);
        }
        let hz: u32 = s
            .trim_end_matches("hz")
            .trim()
            .parse()
            .map_err(|_| format!("invalid sample rate '{}'", s))?;
        if Self::SUPPORTED_HZ.contains(&hz) {
            Ok(SampleRate::Hz(hz))
        } else {
            Err(format!(
                "unsupported sample rate {} Hz (expected auto or one of {:?})",
                hz,
                Self::SUPPORTED_HZ
            ))
        }
    }
}

/// What happens to the existing flight when a recording starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingMode {
    /// Discard the current flight.
    #[default]
    SingleAircraft,
    /// Record an additional aircraft into the current flight.
    AddToFormation,
}

impl fmt::Display for RecordingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingMode::SingleAircraft => write!(f, "single"),
            RecordingMode::AddToFormation => write!(f, "formation"),
        }
    }
}

impl FromStr for RecordingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(RecordingMode::SingleAircraft),
            "formation" => Ok(RecordingMode::AddToFormation),
            other => Err(format!("invalid recording mode '{}'", other)),
        }
    }
}

/// Step size of skip forward/backward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekInterval {
    Absolute { seconds: f64 },
    /// Percent of the flight duration.
    Percent(f64),
}

impl Default for SeekInterval {
    fn default() -> Self {
        SeekInterval::Absolute { seconds: 1.0 }
    }
}

impl SeekInterval {
    /// Interval in milliseconds for a flight of `duration_ms`.
    pub fn to_millis(&self, duration_ms: i64) -> i64 {
        match *self {
            SeekInterval::Absolute { seconds } => (seconds.max(0.0) * 1000.0).round() as i64,
            SeekInterval::Percent(percent) => {
                (percent.max(0.0) * duration_ms as f64 / 100.0).round() as i64
            }
        }
    }
}
