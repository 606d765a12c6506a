use serde::{Deserialize, Serialize};
use tofcore::acquisition::WorkerStatus;
use tofcore::render::FrameDrawables;
use tofcore::telemetry::MetricsSnapshot;

/// Counters behind `GET /status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCounters {
    pub rendered: usize,
    pub published: u64,
    pub decoded: usize,
    pub dropped: usize,
}

impl FrameCounters {
    pub fn new(rendered: usize, published: u64, metrics: MetricsSnapshot) -> Self {
        Self {
            rendered,
            published,
            decoded: metrics.decoded,
            dropped: metrics.dropped,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusModel {
    pub worker: WorkerStatus,
    pub frames: FrameCounters,
}

impl Default for StatusModel {
    fn default() -> Self {
        Self {
            worker: WorkerStatus::Starting,
            frames: FrameCounters::default(),
        }
    }
}

/// Latest frame and status, as served to remote viewers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualizationModel {
    pub frame: FrameDrawables,
    pub status: StatusModel,
}
