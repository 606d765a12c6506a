//! Acquisition workers: producers that turn a transport or a recorded log into
//! published point clouds on their own thread and schedule.

pub mod live;
pub mod replay;
pub mod slot;
pub mod transport;
pub mod worker;

pub use live::LiveAcquirer;
pub use replay::{PlayState, ReplayAcquirer, ReplayCursor, ReplayDirection};
pub use slot::{FrameSlot, PublishedFrame};
pub use transport::{open_serial, LineSource, RecordSource};
pub use worker::WorkerHandle;

use crate::cloud::{CloudPool, SphericalMapper};
use crate::prelude::AcquisitionResult;
use crate::sensor::Reading;
use crate::telemetry::AcquisitionMetrics;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Discrete playback commands forwarded to the active worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackControl {
    TogglePlayback,
    ToggleDirection,
    StepForward,
    StepBackward,
}

/// Worker state for info panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WorkerStatus {
    Starting,
    Live {
        decoded: usize,
        dropped: usize,
    },
    Replay {
        index: usize,
        len: usize,
        state: PlayState,
        direction: ReplayDirection,
    },
}

/// State a worker shares with the session: the frame slot, a status line and
/// frame counters.
pub struct WorkerShared {
    pub frame: FrameSlot,
    pub metrics: AcquisitionMetrics,
    status: RwLock<WorkerStatus>,
}

impl WorkerShared {
    pub fn new() -> Self {
        Self {
            frame: FrameSlot::new(),
            metrics: AcquisitionMetrics::new(),
            status: RwLock::new(WorkerStatus::Starting),
        }
    }

    pub fn status(&self) -> WorkerStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_status(&self, status: WorkerStatus) {
        *self.status.write().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Maps `reading` into a pooled cloud and publishes it. Returns `false`
    /// when the reading has no point-cloud form.
    pub fn map_and_publish(
        &self,
        mapper: &SphericalMapper,
        pool: &mut CloudPool,
        reading: &Reading,
        frame_index: usize,
    ) -> bool {
        let mut cloud = pool.checkout(reading.slot_count(), reading.targets_per_zone.into());
        if !mapper.map_into(reading, &mut cloud) {
            pool.release(cloud);
            return false;
        }
        let displaced = self.frame.publish(PublishedFrame {
            cloud,
            frame_index,
            silicon_temp_degc: reading.silicon_temp_degc,
        });
        // reuse the old buffer unless a reader still holds it
        if let Some(Ok(frame)) = displaced.map(Arc::try_unwrap) {
            pool.release(frame.cloud);
        }
        self.metrics.record_published();
        true
    }
}

impl Default for WorkerShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer behind a [`WorkerHandle`].
///
/// `initialize` runs on the caller's thread before the worker thread starts;
/// everything else runs on the worker thread.
pub trait Acquirer: Send {
    fn name(&self) -> &'static str;
    /// Publishes the first frame when one is available.
    fn initialize(&mut self, shared: &WorkerShared) -> AcquisitionResult<()>;
    fn tick(&mut self, shared: &WorkerShared);
    fn handle_control(&mut self, control: PlaybackControl, shared: &WorkerShared);
    /// Final flush before the thread exits.
    fn cleanup(&mut self) -> AcquisitionResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::reading::tests::uniform_reading;
    use crate::sensor::Resolution;

    #[test]
    fn displaced_frames_return_to_the_pool() {
        let shared = WorkerShared::new();
        let mapper = SphericalMapper::default();
        let mut pool = CloudPool::with_capacity(2);
        let reading = uniform_reading(|_| 400);

        assert!(shared.map_and_publish(&mapper, &mut pool, &reading, 0));
        assert_eq!(pool.available(), 0);
        assert!(shared.map_and_publish(&mapper, &mut pool, &reading, 1));
        assert_eq!(pool.available(), 1);

        // a reader holding the latest frame keeps it out of the pool
        let held = shared.frame.latest();
        assert!(shared.map_and_publish(&mapper, &mut pool, &reading, 2));
        assert_eq!(pool.available(), 0);
        assert_eq!(held.map(|frame| frame.frame_index), Some(1));
        assert_eq!(shared.metrics.snapshot().published, 3);
    }

    #[test]
    fn unmappable_readings_leave_the_slot_alone() {
        let shared = WorkerShared::new();
        let mut pool = CloudPool::with_capacity(2);
        let mut coarse = uniform_reading(|_| 400);
        coarse.resolution = Resolution::Grid4x4;
        coarse.zones.truncate(16);

        assert!(!shared.map_and_publish(&SphericalMapper::default(), &mut pool, &coarse, 0));
        assert!(shared.frame.latest().is_none());
        assert_eq!(pool.available(), 1);
    }
}
