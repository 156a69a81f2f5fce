pub mod sample;
pub mod source;

pub use sample::{RawSample, ADC_MAX, ADC_RESOLUTION_BITS};
pub use source::{
    BuiltSource, ExternalFeed, FeedSender, FixedTable, RandomGenerator, SampleSource, SourceConfig,
};
