use crate::acquisition::sample::RawSample;
use crate::prelude::{StageError, StageResult};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

/// Codes served by the simulated sensor table when nothing else is configured.
pub const DEFAULT_SENSOR_TABLE: [u16; 4] = [512, 1024, 2048, 4095];

/// Supplies one raw reading per telemetry cycle.
pub trait SampleSource {
    fn read(&mut self) -> StageResult<RawSample>;
    fn describe(&self) -> String;
}

/// Replays a fixed table of readings, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct FixedTable {
    samples: Vec<RawSample>,
    cursor: usize,
}

impl FixedTable {
    pub fn new(samples: Vec<RawSample>) -> StageResult<Self> {
        if samples.is_empty() {
            return Err(StageError::Config("fixed table needs at least one sample".into()));
        }
        Ok(Self { samples, cursor: 0 })
    }

    pub fn from_raw(raw: &[u16]) -> StageResult<Self> {
        let samples = raw
            .iter()
            .map(|&code| RawSample::new(code))
            .collect::<StageResult<Vec<_>>>()?;
        Self::new(samples)
    }

    /// Looks up the reading wired to `channel`; indices wrap modulo the table length.
    pub fn sample_at(&self, channel: usize) -> RawSample {
        self.samples[channel % self.samples.len()]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for FixedTable {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SENSOR_TABLE
                .iter()
                .map(|&code| RawSample::clamped(code))
                .collect(),
            cursor: 0,
        }
    }
}

impl SampleSource for FixedTable {
    fn read(&mut self) -> StageResult<RawSample> {
        let sample = self.sample_at(self.cursor);
        self.cursor = (self.cursor + 1) % self.samples.len();
        Ok(sample)
    }

    fn describe(&self) -> String {
        format!("fixed table ({} samples)", self.samples.len())
    }
}

/// Uniform pseudo-random readings, reproducible for a given seed.
pub struct RandomGenerator {
    rng: StdRng,
    min: u16,
    max: u16,
    seed: u64,
}

impl RandomGenerator {
    pub fn new(seed: u64, min: RawSample, max: RawSample) -> StageResult<Self> {
        if min > max {
            return Err(StageError::Config(format!(
                "random source range is inverted: {} > {}",
                min.value(),
                max.value()
            )));
        }
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            min: min.value(),
            max: max.value(),
            seed,
        })
    }
}

impl SampleSource for RandomGenerator {
    fn read(&mut self) -> StageResult<RawSample> {
        RawSample::new(self.rng.gen_range(self.min..=self.max))
    }

    fn describe(&self) -> String {
        format!(
            "random generator (seed {}, range {}..={})",
            self.seed, self.min, self.max
        )
    }
}

/// Readings pushed in by an acquisition collaborator over a bounded channel.
pub struct ExternalFeed {
    receiver: mpsc::Receiver<RawSample>,
    capacity: usize,
}

/// Producer half of an [`ExternalFeed`].
#[derive(Clone)]
pub struct FeedSender {
    sender: mpsc::Sender<RawSample>,
}

impl ExternalFeed {
    pub fn channel(capacity: usize) -> StageResult<(Self, FeedSender)> {
        if capacity == 0 {
            return Err(StageError::Config("external feed capacity must be non-zero".into()));
        }
        let (sender, receiver) = mpsc::channel(capacity);
        Ok((Self { receiver, capacity }, FeedSender { sender }))
    }
}

impl SampleSource for ExternalFeed {
    fn read(&mut self) -> StageResult<RawSample> {
        match self.receiver.try_recv() {
            Ok(sample) => Ok(sample),
            Err(TryRecvError::Empty) => Err(StageError::SourceUnavailable(
                "no sample pending on external feed".into(),
            )),
            Err(TryRecvError::Disconnected) => Err(StageError::SourceUnavailable(
                "external feed disconnected".into(),
            )),
        }
    }

    fn describe(&self) -> String {
        format!("external feed (capacity {})", self.capacity)
    }
}

impl FeedSender {
    /// Queues a raw reading; codes outside the 12-bit domain never enter the feed.
    pub fn push(&self, raw: u16) -> StageResult<()> {
        let sample = RawSample::new(raw)?;
        self.sender.try_send(sample).map_err(|err| match err {
            TrySendError::Full(_) => StageError::SourceUnavailable("external feed is full".into()),
            TrySendError::Closed(_) => {
                StageError::SourceUnavailable("external feed receiver dropped".into())
            }
        })
    }
}

/// Declarative description of where a channel's readings come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    FixedTable {
        samples: Vec<RawSample>,
    },
    Random {
        #[serde(default)]
        seed: u64,
        #[serde(default = "default_random_min")]
        min: RawSample,
        #[serde(default = "default_random_max")]
        max: RawSample,
    },
    External {
        #[serde(default = "default_feed_capacity")]
        capacity: usize,
    },
}

fn default_random_min() -> RawSample {
    RawSample::MIN
}

fn default_random_max() -> RawSample {
    RawSample::MAX
}

fn default_feed_capacity() -> usize {
    16
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::FixedTable {
            samples: DEFAULT_SENSOR_TABLE
                .iter()
                .map(|&code| RawSample::clamped(code))
                .collect(),
        }
    }
}

/// A constructed source plus, for external feeds, the handle used to fill it.
pub struct BuiltSource {
    pub source: Box<dyn SampleSource>,
    pub feed: Option<FeedSender>,
}

impl SourceConfig {
    pub fn build(&self) -> StageResult<BuiltSource> {
        match self {
            SourceConfig::FixedTable { samples } => Ok(BuiltSource {
                source: Box::new(FixedTable::new(samples.clone())?),
                feed: None,
            }),
            SourceConfig::Random { seed, min, max } => Ok(BuiltSource {
                source: Box::new(RandomGenerator::new(*seed, *min, *max)?),
                feed: None,
            }),
            SourceConfig::External { capacity } => {
                let (feed, sender) = ExternalFeed::channel(*capacity)?;
                Ok(BuiltSource {
                    source: Box::new(feed),
                    feed: Some(sender),
                })
            }
        }
    }
}
