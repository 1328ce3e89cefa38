//! CLI command implementations.
//!
//! - `augment` - synthesise attitude and procedures for recorded flights
//! - `common` - shared flight locations, progress styles and shutdown handling
//! - `config` - configuration management
//! - `info` - flight summaries and stored flight listing
//! - `record` - record a synthetic flight path
//! - `replay` - replay a flight to the terminal
//! - `resample` - export channel data at a fixed period

pub mod augment;
pub mod common;
pub mod config;
pub mod info;
pub mod record;
pub mod replay;
pub mod resample;
