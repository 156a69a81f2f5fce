use serde::Serialize;
use std::sync::Mutex;

/// Cycle counters shared by every channel of a pipeline.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub cycles: usize,
    pub violations: usize,
    pub failed_cycles: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_cycle(&self, violations: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.cycles += 1;
            metrics.violations += violations;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed_cycles += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
