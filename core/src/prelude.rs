use crate::processing::converter::Calibration;
use crate::processing::filter::FilterConfig;
use serde::{Deserialize, Serialize};

/// Shared configuration for each processing stage of a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub calibration: Calibration,
    pub filter: FilterConfig,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("raw sample {0} outside the 12-bit range 0..=4095")]
    SampleOutOfRange(u16),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("sample source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing one step of the per-cycle sensor pipeline.
pub trait ProcessingStage {
    type Input;
    type Output;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()>;
    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output>;
    fn cleanup(&mut self);
}
