//! Simulator connector interface.
//!
//! A connector is the bridge to a running simulator: during recording it
//! supplies one [`AircraftFrame`] per tick, during replay it receives the
//! interpolated frames of every aircraft. The playback clock only talks to
//! the simulator through this trait.
//!
//! [`PathCreator`] is a synthetic connector that produces a plausible
//! random flight path, for demos and tests.

mod path_creator;

pub use path_creator::{PathCreator, PathCreatorConfig};

use thiserror::Error;

use crate::aircraft::AircraftFrame;
use crate::channel::Access;

/// Errors reported by a connector.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// No simulator connection is established.
    #[error("Not connected to the simulator")]
    NotConnected,

    /// Establishing the connection failed.
    #[error("Failed to connect to the simulator: {0}")]
    ConnectionFailed(String),

    /// The simulator rejected or dropped transmitted data.
    #[error("Failed to transmit data to the simulator: {0}")]
    Transmit(String),
}

/// Bridge between the playback clock and a simulator.
pub trait SimConnector {
    /// Human-readable connector name, used in logs.
    fn name(&self) -> &str;

    fn is_connected(&self) -> bool;

    /// Try once to connect.
    fn connect(&mut self) -> Result<(), ConnectorError>;

    fn disconnect(&mut self) {}

    fn on_start_recording(&mut self) {}

    /// Recording stopped after `elapsed_ms` of clock time.
    ///
    /// Returns the end timestamp the simulator measured; defaults to the
    /// clock's own measurement.
    fn on_stop_recording(&mut self, elapsed_ms: i64) -> i64 {
        elapsed_ms
    }

    /// Sample the user aircraft for the recording timestamp.
    fn sample_frame(&mut self, timestamp: i64) -> Result<AircraftFrame, ConnectorError>;

    fn on_start_replay(&mut self, _timestamp: i64) {}

    fn on_stop_replay(&mut self) {}

    /// Send one frame per aircraft, in flight order.
    fn send_frames(&mut self, frames: &[AircraftFrame], access: Access)
        -> Result<(), ConnectorError>;
}

impl<C: SimConnector + ?Sized> SimConnector for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn connect(&mut self) -> Result<(), ConnectorError> {
        (**self).connect()
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn on_start_recording(&mut self) {
        (**self).on_start_recording()
    }

    fn on_stop_recording(&mut self, elapsed_ms: i64) -> i64 {
        (**self).on_stop_recording(elapsed_ms)
    }

    fn sample_frame(&mut self, timestamp: i64) -> Result<AircraftFrame, ConnectorError> {
        (**self).sample_frame(timestamp)
    }

    fn on_start_replay(&mut self, timestamp: i64) {
        (**self).on_start_replay(timestamp)
    }

    fn on_stop_replay(&mut self) {
        (**self).on_stop_replay()
    }

    fn send_frames(
        &mut self,
        frames: &[AircraftFrame],
        access: Access,
    ) -> Result<(), ConnectorError> {
        (**self).send_frames(frames, access)
    }
}
