use crate::prelude::{StageError, StageResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution of the simulated analog-to-digital converter.
pub const ADC_RESOLUTION_BITS: u32 = 12;

/// Largest code a 12-bit conversion can produce.
pub const ADC_MAX: u16 = (1 << ADC_RESOLUTION_BITS) - 1;

/// Quantized reading straight off the converter, guaranteed to be in `0..=ADC_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct RawSample(u16);

impl RawSample {
    pub const MIN: RawSample = RawSample(0);
    pub const MAX: RawSample = RawSample(ADC_MAX);

    /// Accepts `raw` only when it fits the 12-bit domain.
    pub fn new(raw: u16) -> StageResult<Self> {
        if raw > ADC_MAX {
            return Err(StageError::SampleOutOfRange(raw));
        }
        Ok(Self(raw))
    }

    /// Saturates `raw` to the 12-bit domain.
    pub fn clamped(raw: u16) -> Self {
        Self(raw.min(ADC_MAX))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Position of the sample within the converter span, in `[0, 1]`.
    pub fn fraction(self) -> f32 {
        self.0 as f32 / ADC_MAX as f32
    }
}

impl TryFrom<u16> for RawSample {
    type Error = StageError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<RawSample> for u16 {
    fn from(sample: RawSample) -> Self {
        sample.0
    }
}

impl fmt::Display for RawSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:03X})", self.0, self.0)
    }
}
