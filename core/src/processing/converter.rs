use crate::acquisition::RawSample;
use crate::diagnostics::LogManager;
use crate::prelude::{ProcessingStage, StageConfig, StageError, StageResult};
use serde::{Deserialize, Serialize};

/// Linear mapping constants for one sensor model.
///
/// `temperature = (voltage - offset_volts) * scale + baseline`, where
/// `voltage = raw / ADC_MAX * full_scale_volts`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub full_scale_volts: f32,
    pub offset_volts: f32,
    pub scale: f32,
    #[serde(default)]
    pub baseline: f32,
}

impl Calibration {
    /// TMP36-style analog sensor: 0.5 V offset, 10 mV per degree.
    pub fn tmp36() -> Self {
        Self {
            full_scale_volts: 3.3,
            offset_volts: 0.5,
            scale: 100.0,
            baseline: 0.0,
        }
    }

    /// Sensor spanning -40 °C at 0 V to 85 °C at full scale.
    pub fn linear_span() -> Self {
        Self {
            full_scale_volts: 3.3,
            offset_volts: 0.0,
            scale: 125.0 / 3.3,
            baseline: -40.0,
        }
    }

    pub fn validate(&self) -> StageResult<()> {
        if !self.full_scale_volts.is_finite() || self.full_scale_volts <= 0.0 {
            return Err(StageError::Config(format!(
                "full-scale voltage must be positive, got {}",
                self.full_scale_volts
            )));
        }
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(StageError::Config(format!(
                "calibration scale must be finite and non-zero, got {}",
                self.scale
            )));
        }
        if !self.offset_volts.is_finite() || !self.baseline.is_finite() {
            return Err(StageError::Config(
                "calibration offset and baseline must be finite".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::tmp36()
    }
}

/// One raw reading carried through both unit conversions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conversion {
    pub raw: RawSample,
    pub voltage: f32,
    pub temperature: f32,
}

/// Maps raw converter codes to volts and degrees for a single calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    calibration: Calibration,
}

impl UnitConverter {
    pub fn new(calibration: Calibration) -> StageResult<Self> {
        calibration.validate()?;
        Ok(Self { calibration })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn raw_to_voltage(&self, raw: RawSample) -> f32 {
        raw.fraction() * self.calibration.full_scale_volts
    }

    pub fn voltage_to_temperature(&self, voltage: f32) -> f32 {
        (voltage - self.calibration.offset_volts) * self.calibration.scale
            + self.calibration.baseline
    }

    pub fn convert(&self, raw: RawSample) -> Conversion {
        let voltage = self.raw_to_voltage(raw);
        Conversion {
            raw,
            voltage,
            temperature: self.voltage_to_temperature(voltage),
        }
    }
}

/// First pipeline stage: raw code to voltage and temperature.
pub struct ConversionStage {
    converter: Option<UnitConverter>,
    logger: LogManager,
}

impl ConversionStage {
    pub fn new(logger: LogManager) -> Self {
        Self {
            converter: None,
            logger,
        }
    }

    pub fn converter(&self) -> Option<&UnitConverter> {
        self.converter.as_ref()
    }
}

impl ProcessingStage for ConversionStage {
    type Input = RawSample;
    type Output = Conversion;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        self.converter = Some(UnitConverter::new(config.calibration)?);
        Ok(())
    }

    fn execute(&mut self, input: RawSample) -> StageResult<Conversion> {
        let converter = self
            .converter
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let conversion = converter.convert(input);
        self.logger.detail(&format!(
            "raw {} -> {:.4} V -> {:.2} C",
            input, conversion.voltage, conversion.temperature
        ));
        Ok(conversion)
    }

    fn cleanup(&mut self) {
        self.converter = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(raw: u16) -> RawSample {
        RawSample::new(raw).unwrap()
    }

    #[test]
    fn voltage_spans_zero_to_full_scale() {
        let converter = UnitConverter::new(Calibration::tmp36()).unwrap();
        assert_eq!(converter.raw_to_voltage(RawSample::MIN), 0.0);
        assert_eq!(converter.raw_to_voltage(RawSample::MAX), 3.3);
    }

    #[test]
    fn tmp36_mid_scale_reading() {
        let converter = UnitConverter::new(Calibration::tmp36()).unwrap();
        let conversion = converter.convert(sample(2048));
        let expected_voltage = (2048.0_f32 / 4095.0) * 3.3;
        assert!((conversion.voltage - expected_voltage).abs() < 1e-6);
        let expected_temp = (expected_voltage - 0.5) * 100.0;
        assert!((conversion.temperature - expected_temp).abs() < 1e-4);
    }

    #[test]
    fn linear_span_hits_both_ends() {
        let converter = UnitConverter::new(Calibration::linear_span()).unwrap();
        let low = converter.convert(RawSample::MIN).temperature;
        let high = converter.convert(RawSample::MAX).temperature;
        assert!((low + 40.0).abs() < 1e-4);
        assert!((high - 85.0).abs() < 1e-3);
    }

    #[test]
    fn rejects_degenerate_calibration() {
        let mut calibration = Calibration::tmp36();
        calibration.full_scale_volts = 0.0;
        assert!(matches!(
            UnitConverter::new(calibration),
            Err(StageError::Config(_))
        ));

        let mut calibration = Calibration::tmp36();
        calibration.scale = f32::NAN;
        assert!(UnitConverter::new(calibration).is_err());
    }

    #[test]
    fn stage_requires_initialization() {
        let mut stage = ConversionStage::new(LogManager::new());
        let err = stage.execute(sample(100)).unwrap_err();
        assert!(matches!(err, StageError::Internal(_)));

        stage.initialize(&StageConfig::default()).unwrap();
        let output = stage.execute(sample(4095)).unwrap();
        assert_eq!(output.voltage, 3.3);
        stage.cleanup();
        assert!(stage.converter().is_none());
    }

    #[test]
    fn baseline_defaults_to_zero_when_omitted() {
        let calibration: Calibration =
            serde_yaml::from_str("full_scale_volts: 5.0\noffset_volts: 0.0\nscale: 10.0\n")
                .unwrap();
        assert_eq!(calibration.baseline, 0.0);
    }
}
