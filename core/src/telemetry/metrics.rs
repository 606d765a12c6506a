use std::sync::Mutex;

/// Frame counters shared between an acquisition worker and its observers.
pub struct AcquisitionMetrics {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub decoded: usize,
    pub dropped: usize,
    pub published: usize,
}

struct Metrics {
    decoded: usize,
    dropped: usize,
    published: usize,
}

impl AcquisitionMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                decoded: 0,
                dropped: 0,
                published: 0,
            }),
        }
    }

    pub fn record_decoded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.decoded += 1;
        }
    }

    pub fn record_dropped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.dropped += 1;
        }
    }

    pub fn record_published(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.published += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                decoded: metrics.decoded,
                dropped: metrics.dropped,
                published: metrics.published,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for AcquisitionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
