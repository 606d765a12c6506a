use crate::cloud::PointCloud;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A point cloud as handed to the render loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedFrame {
    pub cloud: PointCloud,
    /// Index of the source reading in the worker's log.
    pub frame_index: usize,
    pub silicon_temp_degc: i16,
}

/// Latest-wins hand-off between one producer and any number of readers.
///
/// The producer swaps in a complete frame behind an `Arc`; readers clone the
/// `Arc` and keep a consistent frame for as long as they hold it. The lock only
/// guards the pointer swap.
#[derive(Default)]
pub struct FrameSlot {
    latest: RwLock<Option<Arc<PublishedFrame>>>,
    sequence: AtomicU64,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `frame` and returns the frame it displaced.
    pub fn publish(&self, frame: PublishedFrame) -> Option<Arc<PublishedFrame>> {
        let frame = Arc::new(frame);
        let previous = {
            let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
            latest.replace(frame)
        };
        self.sequence.fetch_add(1, Ordering::Release);
        previous
    }

    pub fn latest(&self) -> Option<Arc<PublishedFrame>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of frames published so far.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }
}
