use crate::diagnostics::LogManager;
use crate::math::stats::StatsHelper;
use crate::prelude::{ProcessingStage, StageConfig, StageError, StageResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How a fresh filter treats its first input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSeed {
    /// History starts at 0.0; early outputs are biased toward zero.
    #[default]
    Zero,
    /// History starts at the first input, so the first output equals it.
    FirstSample,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub alpha: f32,
    pub seed: FilterSeed,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            seed: FilterSeed::Zero,
        }
    }
}

/// Exponential smoothing: `out = alpha * input + (1 - alpha) * last_out`.
#[derive(Debug, Clone, PartialEq)]
pub struct LowPassFilter {
    alpha: f32,
    seed: FilterSeed,
    last_output: f32,
    primed: bool,
}

impl LowPassFilter {
    pub fn new(alpha: f32, seed: FilterSeed) -> StageResult<Self> {
        if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
            return Err(StageError::InvalidInput(format!(
                "filter alpha must lie in (0, 1], got {}",
                alpha
            )));
        }
        Ok(Self {
            alpha,
            seed,
            last_output: 0.0,
            primed: false,
        })
    }

    pub fn from_config(config: &FilterConfig) -> StageResult<Self> {
        Self::new(config.alpha, config.seed)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn last_output(&self) -> f32 {
        self.last_output
    }

    pub fn apply(&mut self, input: f32) -> f32 {
        if !self.primed {
            self.primed = true;
            if self.seed == FilterSeed::FirstSample {
                self.last_output = input;
                return input;
            }
        }
        self.last_output = self.alpha * input + (1.0 - self.alpha) * self.last_output;
        self.last_output
    }

    pub fn reset(&mut self) {
        self.last_output = 0.0;
        self.primed = false;
    }
}

/// Arithmetic mean over the most recent `capacity` values.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: VecDeque<f32>,
    capacity: usize,
}

impl MovingAverage {
    pub fn new(capacity: usize) -> StageResult<Self> {
        if capacity == 0 {
            return Err(StageError::InvalidInput(
                "moving-average window must hold at least one value".into(),
            ));
        }
        Ok(Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    pub fn push(&mut self, value: f32) -> f32 {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(value);
        StatsHelper::mean(self.window.make_contiguous())
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

/// Smoothing stage; keeps its filter history between cycles until cleanup.
pub struct FilterStage {
    filter: Option<LowPassFilter>,
    logger: LogManager,
}

impl FilterStage {
    pub fn new(logger: LogManager) -> Self {
        Self {
            filter: None,
            logger,
        }
    }

    pub fn filter(&self) -> Option<&LowPassFilter> {
        self.filter.as_ref()
    }
}

impl ProcessingStage for FilterStage {
    type Input = f32;
    type Output = f32;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        self.filter = Some(LowPassFilter::from_config(&config.filter)?);
        Ok(())
    }

    fn execute(&mut self, input: f32) -> StageResult<f32> {
        let filter = self
            .filter
            .as_mut()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let output = filter.apply(input);
        self.logger
            .detail(&format!("filter in {:.3} out {:.3}", input, output));
        Ok(output)
    }

    fn cleanup(&mut self) {
        self.filter = None;
    }
}
