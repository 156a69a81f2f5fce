use crate::acquisition::{FeedSender, SourceConfig};
use crate::diagnostics::MetricsRecorder;
use crate::prelude::{StageConfig, StageError, StageResult};
use crate::processing::converter::Calibration;
use crate::processing::filter::FilterConfig;
use crate::processing::pipeline::ChannelPipeline;
use crate::processing::range::FlightEnvelope;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Settings for one sensor channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    #[serde(default)]
    pub calibration: Calibration,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

impl ChannelConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calibration: Calibration::default(),
            filter: FilterConfig::default(),
            source: SourceConfig::default(),
        }
    }

    pub fn to_stage_config(&self) -> StageConfig {
        StageConfig {
            calibration: self.calibration,
            filter: self.filter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub channels: Vec<ChannelConfig>,
    #[serde(default)]
    pub envelope: FlightEnvelope,
}

/// A configured channel and, for externally fed channels, the handle that fills it.
pub struct ChannelHandle {
    pub pipeline: ChannelPipeline,
    pub feed: Option<FeedSender>,
}

impl PipelineConfig {
    /// Reads a YAML (`.yaml`/`.yml`) or JSON (`.json`) pipeline description.
    pub fn load<P: AsRef<Path>>(path: P) -> StageResult<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)?;
        let extension = path_ref
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let config: PipelineConfig = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents).map_err(|err| {
                StageError::Config(format!("parsing {}: {}", path_ref.display(), err))
            })?,
            Some("json") => serde_json::from_str(&contents).map_err(|err| {
                StageError::Config(format!("parsing {}: {}", path_ref.display(), err))
            })?,
            _ => {
                return Err(StageError::Config(format!(
                    "unsupported config format for {}",
                    path_ref.display()
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn single(channel: ChannelConfig) -> Self {
        Self {
            channels: vec![channel],
            envelope: FlightEnvelope::default(),
        }
    }

    pub fn validate(&self) -> StageResult<()> {
        if self.channels.is_empty() {
            return Err(StageError::Config("at least one channel is required".into()));
        }
        let mut seen = HashSet::new();
        for channel in &self.channels {
            if !seen.insert(channel.name.as_str()) {
                return Err(StageError::Config(format!(
                    "duplicate channel name '{}'",
                    channel.name
                )));
            }
            channel.calibration.validate()?;
        }
        self.envelope.validate_bounds()
    }

    /// Builds one pipeline per channel; all of them report into `metrics`.
    pub fn build_channels(&self, metrics: Arc<MetricsRecorder>) -> StageResult<Vec<ChannelHandle>> {
        self.validate()?;
        self.channels
            .iter()
            .map(|channel| -> StageResult<ChannelHandle> {
                let built = channel.source.build()?;
                let pipeline = ChannelPipeline::new(
                    channel.name.as_str(),
                    &channel.to_stage_config(),
                    self.envelope,
                    built.source,
                    metrics.clone(),
                )?;
                Ok(ChannelHandle {
                    pipeline,
                    feed: built.feed,
                })
            })
            .collect()
    }
}
