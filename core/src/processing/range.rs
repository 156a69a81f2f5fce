use crate::diagnostics::LogManager;
use crate::prelude::{StageError, StageResult};
use crate::processing::classifier::Telemetry;
use serde::{Deserialize, Serialize};

pub const ALTITUDE_LABEL: &str = "Altitude (m)";
pub const BATTERY_LABEL: &str = "Battery (%)";
pub const TEMPERATURE_LABEL: &str = "Temperature (C)";

/// Inclusive `[min, max]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    pub fn new(min: f32, max: f32) -> StageResult<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> StageResult<()> {
        if self.min.is_nan() || self.max.is_nan() || self.min > self.max {
            return Err(StageError::Config(format!(
                "bounds [{}, {}] are not an ordered interval",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn contains(&self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }
}

/// A value that fell outside its declared bounds.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
#[error("{label} out of range: {value} (min: {min}, max: {max})")]
pub struct RangeViolation {
    pub label: String,
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

/// `Ok` iff `min <= value <= max`; NaN never passes.
pub fn check_range(value: f32, min: f32, max: f32, label: &str) -> Result<(), RangeViolation> {
    if min <= value && value <= max {
        Ok(())
    } else {
        Err(RangeViolation {
            label: label.to_string(),
            value,
            min,
            max,
        })
    }
}

/// One field queued for [`validate_all`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCheck<'a> {
    pub label: &'a str,
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl<'a> RangeCheck<'a> {
    pub fn new(label: &'a str, value: f32, bounds: Bounds) -> Self {
        Self {
            label,
            value,
            min: bounds.min,
            max: bounds.max,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub checked: usize,
    pub violations: Vec<RangeViolation>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.checked += other.checked;
        self.violations.extend(other.violations);
    }
}

/// Checks every field and collects the violations in input order.
pub fn validate_all(fields: &[RangeCheck<'_>]) -> ValidationReport {
    let violations = fields
        .iter()
        .filter_map(|field| check_range(field.value, field.min, field.max, field.label).err())
        .collect();
    ValidationReport {
        checked: fields.len(),
        violations,
    }
}

/// Range checking with per-field diagnostics sent to the channel log.
pub struct RangeValidator {
    logger: LogManager,
}

impl RangeValidator {
    pub fn new(logger: LogManager) -> Self {
        Self { logger }
    }

    pub fn validate_all(&self, fields: &[RangeCheck<'_>]) -> ValidationReport {
        let report = validate_all(fields);
        for violation in &report.violations {
            self.logger.warn(&format!("[ERROR] {}", violation));
        }
        if report.is_ok() {
            self.logger
                .detail(&format!("all {} parameters OK", report.checked));
        } else {
            self.logger.warn(&format!(
                "{} of {} parameters out of range",
                report.violation_count(),
                report.checked
            ));
        }
        report
    }
}

/// Declared limits for the whole airframe, checked once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightEnvelope {
    pub altitude: Bounds,
    pub battery: Bounds,
    pub temperature: Bounds,
}

impl Default for FlightEnvelope {
    fn default() -> Self {
        Self {
            altitude: Bounds {
                min: 0.0,
                max: 500.0,
            },
            battery: Bounds {
                min: 0.0,
                max: 100.0,
            },
            temperature: Bounds {
                min: -20.0,
                max: 60.0,
            },
        }
    }
}

impl FlightEnvelope {
    pub fn validate_bounds(&self) -> StageResult<()> {
        self.altitude.validate()?;
        self.battery.validate()?;
        self.temperature.validate()
    }

    pub fn checks(&self, telemetry: &Telemetry, temperature: f32) -> [RangeCheck<'static>; 3] {
        [
            RangeCheck::new(ALTITUDE_LABEL, telemetry.altitude_m() as f32, self.altitude),
            RangeCheck::new(BATTERY_LABEL, telemetry.battery_percent() as f32, self.battery),
            RangeCheck::new(TEMPERATURE_LABEL, temperature, self.temperature),
        ]
    }

    pub fn validate(&self, telemetry: &Telemetry, temperature: f32) -> ValidationReport {
        validate_all(&self.checks(telemetry, temperature))
    }
}
