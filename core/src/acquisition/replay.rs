use crate::acquisition::{Acquirer, PlaybackControl, WorkerShared, WorkerStatus};
use crate::cloud::{CloudPool, SphericalMapper};
use crate::prelude::{AcquisitionError, AcquisitionResult, ReadingLogError};
use crate::sensor::ReadingLog;
use crate::telemetry::LogManager;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const POOL_CAPACITY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayDirection {
    Forward,
    Reverse,
}

/// Position in a replayed log. Moves wrap at both ends, so playback loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayCursor {
    index: usize,
    len: usize,
    state: PlayState,
    direction: ReplayDirection,
}

impl ReplayCursor {
    /// Paused at the first reading, facing forward. `len` must be non-zero.
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
            state: PlayState::Paused,
            direction: ReplayDirection::Forward,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn direction(&self) -> ReplayDirection {
        self.direction
    }

    pub fn step_forward(&mut self) {
        self.index = (self.index + 1) % self.len;
    }

    pub fn step_backward(&mut self) {
        self.index = self.index.checked_sub(1).unwrap_or(self.len - 1);
    }

    pub fn toggle_playback(&mut self) {
        self.state = match self.state {
            PlayState::Paused => PlayState::Playing,
            PlayState::Playing => PlayState::Paused,
        };
    }

    pub fn toggle_direction(&mut self) {
        self.direction = match self.direction {
            ReplayDirection::Forward => ReplayDirection::Reverse,
            ReplayDirection::Reverse => ReplayDirection::Forward,
        };
    }

    /// Advances one step in the current direction while playing. Returns
    /// whether the cursor moved.
    pub fn advance(&mut self) -> bool {
        if self.state == PlayState::Paused {
            return false;
        }
        match self.direction {
            ReplayDirection::Forward => self.step_forward(),
            ReplayDirection::Reverse => self.step_backward(),
        }
        true
    }

    /// Applies a control and returns whether the index changed.
    pub fn apply(&mut self, control: PlaybackControl) -> bool {
        match control {
            PlaybackControl::TogglePlayback => {
                self.toggle_playback();
                false
            }
            PlaybackControl::ToggleDirection => {
                self.toggle_direction();
                false
            }
            PlaybackControl::StepForward => {
                self.step_forward();
                true
            }
            PlaybackControl::StepBackward => {
                self.step_backward();
                true
            }
        }
    }

    fn status(&self) -> WorkerStatus {
        WorkerStatus::Replay {
            index: self.index,
            len: self.len,
            state: self.state,
            direction: self.direction,
        }
    }
}

/// Plays back a recorded log at a fixed rate under user control.
pub struct ReplayAcquirer {
    log: ReadingLog,
    cursor: ReplayCursor,
    mapper: SphericalMapper,
    pool: CloudPool,
    logger: LogManager,
}

impl ReplayAcquirer {
    /// Fails on an empty log: there would be nothing to show.
    pub fn new(log: ReadingLog, mapper: SphericalMapper) -> Result<Self, ReadingLogError> {
        if log.is_empty() {
            return Err(ReadingLogError::Empty);
        }
        Ok(Self {
            cursor: ReplayCursor::new(log.len()),
            log,
            mapper,
            pool: CloudPool::with_capacity(POOL_CAPACITY),
            logger: LogManager::new("replay"),
        })
    }

    pub fn open<P: AsRef<Path>>(path: P, mapper: SphericalMapper) -> AcquisitionResult<Self> {
        let path = path.as_ref();
        let load_failure = |source: ReadingLogError| AcquisitionError::LogLoadFailure {
            path: PathBuf::from(path),
            source,
        };
        let log = ReadingLog::load(path).map_err(load_failure)?;
        Self::new(log, mapper).map_err(load_failure)
    }

    pub fn cursor(&self) -> &ReplayCursor {
        &self.cursor
    }

    fn publish_current(&mut self, shared: &WorkerShared) {
        let index = self.cursor.index();
        if let Some(reading) = self.log.get(index) {
            if !shared.map_and_publish(&self.mapper, &mut self.pool, reading, index) {
                self.logger
                    .detail(&format!("frame {index} has no point cloud, keeping previous"));
            }
        }
        shared.set_status(self.cursor.status());
    }
}

impl Acquirer for ReplayAcquirer {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn initialize(&mut self, shared: &WorkerShared) -> AcquisitionResult<()> {
        self.logger
            .record(&format!("replaying {} readings", self.log.len()));
        self.publish_current(shared);
        Ok(())
    }

    fn tick(&mut self, shared: &WorkerShared) {
        if self.cursor.advance() {
            self.publish_current(shared);
        }
    }

    fn handle_control(&mut self, control: PlaybackControl, shared: &WorkerShared) {
        if self.cursor.apply(control) {
            self.publish_current(shared);
        } else {
            shared.set_status(self.cursor.status());
        }
        self.logger.detail(&format!("{control:?} -> {:?}", self.cursor));
    }

    fn cleanup(&mut self) -> AcquisitionResult<()> {
        Ok(())
    }
}
