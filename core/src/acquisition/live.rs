use crate::acquisition::transport::RecordSource;
use crate::acquisition::{Acquirer, PlaybackControl, WorkerShared, WorkerStatus};
use crate::cloud::{CloudPool, SphericalMapper};
use crate::prelude::{AcquisitionError, AcquisitionResult};
use crate::sensor::{parse_record, ReadingLog};
use crate::telemetry::LogManager;
use std::path::PathBuf;

const POOL_CAPACITY: usize = 4;

/// Reads records from a transport, logs every decoded reading and publishes
/// the ones that map to a point cloud. The log is written once, on cleanup.
pub struct LiveAcquirer {
    source: Box<dyn RecordSource>,
    mapper: SphericalMapper,
    pool: CloudPool,
    log: ReadingLog,
    output_path: PathBuf,
    logger: LogManager,
}

impl LiveAcquirer {
    pub fn new(source: Box<dyn RecordSource>, mapper: SphericalMapper, output_path: PathBuf) -> Self {
        Self {
            source,
            mapper,
            pool: CloudPool::with_capacity(POOL_CAPACITY),
            log: ReadingLog::new(),
            output_path,
            logger: LogManager::new("live"),
        }
    }

    pub fn log(&self) -> &ReadingLog {
        &self.log
    }

    fn poll(&mut self, shared: &WorkerShared) {
        let line = match self.source.poll_record() {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(err) => {
                self.logger.warn(&format!("transport read failed: {err}"));
                return;
            }
        };

        match parse_record(&line) {
            Ok(reading) => {
                shared.metrics.record_decoded();
                let frame_index = self.log.len();
                if !shared.map_and_publish(&self.mapper, &mut self.pool, &reading, frame_index) {
                    self.logger.detail(&format!(
                        "frame {frame_index} logged without point cloud ({} zones)",
                        reading.zones.len()
                    ));
                }
                self.log.push(reading);
            }
            Err(err) => {
                shared.metrics.record_dropped();
                self.logger.detail(&format!("dropped frame: {err}"));
            }
        }

        let counts = shared.metrics.snapshot();
        shared.set_status(WorkerStatus::Live {
            decoded: counts.decoded,
            dropped: counts.dropped,
        });
    }
}

impl Acquirer for LiveAcquirer {
    fn name(&self) -> &'static str {
        "live"
    }

    fn initialize(&mut self, shared: &WorkerShared) -> AcquisitionResult<()> {
        shared.set_status(WorkerStatus::Live {
            decoded: 0,
            dropped: 0,
        });
        self.logger
            .record(&format!("recording to {}", self.output_path.display()));
        self.poll(shared);
        Ok(())
    }

    fn tick(&mut self, shared: &WorkerShared) {
        self.poll(shared);
    }

    fn handle_control(&mut self, control: PlaybackControl, _shared: &WorkerShared) {
        self.logger
            .detail(&format!("{control:?} has no effect on a live stream"));
    }

    fn cleanup(&mut self) -> AcquisitionResult<()> {
        self.log
            .save_atomic(&self.output_path)
            .map_err(|source| AcquisitionError::LogPersistFailure {
                path: self.output_path.clone(),
                source,
            })?;
        self.logger.record(&format!(
            "saved {} readings to {}",
            self.log.len(),
            self.output_path.display()
        ));
        Ok(())
    }
}
