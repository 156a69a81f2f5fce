pub mod classifier;
pub mod converter;
pub mod filter;
pub mod pipeline;
pub mod range;

pub use classifier::{classify, DeviceState, FlightReadings, Telemetry, TemperatureStatus};
pub use converter::{Calibration, Conversion, ConversionStage, UnitConverter};
pub use filter::{FilterConfig, FilterSeed, FilterStage, LowPassFilter, MovingAverage};
pub use pipeline::{ChannelPipeline, CycleReport, SensorReading};
pub use range::{
    check_range, validate_all, Bounds, FlightEnvelope, RangeCheck, RangeValidator,
    RangeViolation, ValidationReport,
};
