use crate::acquisition::{RawSample, SampleSource};
use crate::diagnostics::{LogManager, MetricsRecorder};
use crate::prelude::{ProcessingStage, StageConfig, StageResult};
use crate::processing::classifier::{FlightReadings, Telemetry, TemperatureStatus};
use crate::processing::converter::ConversionStage;
use crate::processing::filter::FilterStage;
use crate::processing::range::{FlightEnvelope, RangeValidator, ValidationReport};
use serde::Serialize;
use std::sync::Arc;

/// One raw reading carried through conversion and smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorReading {
    pub raw: RawSample,
    pub voltage: f32,
    pub temperature: f32,
    pub filtered: f32,
    pub status: TemperatureStatus,
}

/// Everything one telemetry cycle produced, for display or logging collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub channel: String,
    pub cycle: u64,
    pub sensor: SensorReading,
    pub telemetry: Telemetry,
    pub validation: ValidationReport,
}

/// Source, conversion, smoothing, validation and classification for a single
/// sensor channel. Filter history belongs to this channel alone.
pub struct ChannelPipeline {
    name: String,
    source: Box<dyn SampleSource>,
    conversion: ConversionStage,
    filter: FilterStage,
    envelope: FlightEnvelope,
    validator: RangeValidator,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
    cycle: u64,
}

impl ChannelPipeline {
    pub fn new(
        name: impl Into<String>,
        config: &StageConfig,
        envelope: FlightEnvelope,
        source: Box<dyn SampleSource>,
        metrics: Arc<MetricsRecorder>,
    ) -> StageResult<Self> {
        let name = name.into();
        envelope.validate_bounds()?;

        let mut conversion = ConversionStage::new(LogManager::for_channel(name.as_str()));
        conversion.initialize(config)?;
        let mut filter = FilterStage::new(LogManager::for_channel(name.as_str()));
        filter.initialize(config)?;

        let logger = LogManager::for_channel(name.as_str());
        logger.record(&format!("channel ready, reading from {}", source.describe()));

        Ok(Self {
            validator: RangeValidator::new(LogManager::for_channel(name.as_str())),
            name,
            source,
            conversion,
            filter,
            envelope,
            logger,
            metrics,
            cycle: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycle
    }

    /// Converts and smooths a reading without touching the source or the flight state.
    pub fn process_sample(&mut self, raw: RawSample) -> StageResult<SensorReading> {
        let conversion = self.conversion.execute(raw)?;
        let filtered = self.filter.execute(conversion.temperature)?;
        Ok(SensorReading {
            raw,
            voltage: conversion.voltage,
            temperature: conversion.temperature,
            filtered,
            status: TemperatureStatus::from_celsius(conversion.temperature),
        })
    }

    /// Runs one full cycle. An error ends the cycle; range violations do not.
    pub fn run_cycle(&mut self, readings: FlightReadings) -> StageResult<CycleReport> {
        match self.execute_cycle(readings) {
            Ok(report) => {
                self.metrics
                    .record_cycle(report.validation.violation_count());
                Ok(report)
            }
            Err(err) => {
                self.metrics.record_failure();
                self.logger
                    .warn(&format!("cycle {} aborted: {}", self.cycle, err));
                Err(err)
            }
        }
    }

    fn execute_cycle(&mut self, readings: FlightReadings) -> StageResult<CycleReport> {
        let raw = self.source.read()?;
        let sensor = self.process_sample(raw)?;
        let telemetry = Telemetry::from_readings(readings);
        let validation = self
            .validator
            .validate_all(&self.envelope.checks(&telemetry, sensor.filtered));

        let cycle = self.cycle;
        self.cycle += 1;
        self.logger.record(&format!(
            "cycle {} raw {} temp {:.1} filtered {:.1} [{}] state {}",
            cycle,
            raw.value(),
            sensor.temperature,
            sensor.filtered,
            sensor.status.name(),
            telemetry.state()
        ));

        Ok(CycleReport {
            channel: self.name.clone(),
            cycle,
            sensor,
            telemetry,
            validation,
        })
    }

    /// Tears the stages down; the channel must be rebuilt before further use.
    pub fn shutdown(&mut self) {
        self.conversion.cleanup();
        self.filter.cleanup();
        self.logger
            .record(&format!("channel stopped after {} cycles", self.cycle));
    }
}
