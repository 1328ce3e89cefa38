//! SkyTrack - flight simulator telemetry recording and replay
//!
//! This library records the state of one or more aircraft as timestamped
//! samples, stores them per data channel, and replays them by interpolating
//! between samples at wall-clock driven timestamps.
//!
//! # Modules
//!
//! - [`search`] and [`channel`]: ordered sample stores with cached bracket search
//! - [`sample`]: the six sample types and their interpolation rules
//! - [`aircraft`] and [`flight`]: per-aircraft channel sets and the recording session
//! - [`clock`]: the record/replay state machine
//! - [`augmentation`]: synthesised attitude, velocity and procedures for imported paths
//! - [`connect`]: the simulator connector interface
//! - [`persistence`] and [`export`]: flight storage and resampled export
//! - [`config`] and [`logging`]: application configuration and tracing setup

pub mod aircraft;
pub mod augmentation;
pub mod channel;
pub mod clock;
pub mod config;
pub mod connect;
pub mod export;
pub mod flight;
pub mod logging;
pub mod math;
pub mod persistence;
pub mod sample;
pub mod search;

pub use aircraft::{Aircraft, AircraftFrame, AircraftInfo, ChannelPolicies};
pub use augmentation::{AugmentationConfig, FlightAugmentation};
pub use channel::{Access, Channel, ChannelPolicy, HoldPolicy};
pub use clock::{ClockConfig, PlaybackClock, PlaybackState, Tick, TickEvent};
pub use connect::{ConnectorError, SimConnector};
pub use flight::{Flight, FlightInfo};
