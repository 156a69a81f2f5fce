use log::{debug, info, warn};

/// Thin front over the `log` facade, tagging every record with the channel it belongs to.
pub struct LogManager {
    channel: String,
}

impl LogManager {
    pub fn new() -> Self {
        Self::for_channel("sensor")
    }

    pub fn for_channel(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.channel, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.channel, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.channel, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
