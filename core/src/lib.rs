//! Telemetry-processing core for embedded drone sensor channels.
//!
//! Each cycle a channel reads one raw 12-bit sample, converts it to volts and
//! degrees through a named calibration, smooths it with a low-pass filter,
//! checks the flight envelope and classifies the device state.

pub mod acquisition;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod math;
pub mod prelude;
pub mod processing;

pub use config::{ChannelConfig, ChannelHandle, PipelineConfig};
pub use prelude::{ProcessingStage, StageConfig, StageError, StageResult};
