use crate::acquisition::{Acquirer, PlaybackControl, PublishedFrame, WorkerShared, WorkerStatus};
use crate::prelude::{AcquisitionError, AcquisitionResult};
use crate::telemetry::{LogManager, MetricsSnapshot};
use crossbeam_channel::{bounded, select, tick, unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Owns an acquisition thread. Dropping the handle stops and joins it.
pub struct WorkerHandle {
    name: &'static str,
    control_tx: Sender<PlaybackControl>,
    terminator_tx: Sender<bool>,
    thread: Option<JoinHandle<AcquisitionResult<()>>>,
    shared: Arc<WorkerShared>,
}

impl WorkerHandle {
    /// Initializes `acquirer` on the calling thread, then drives it from a
    /// dedicated thread every `period`.
    pub fn spawn(mut acquirer: Box<dyn Acquirer>, period: Duration) -> AcquisitionResult<Self> {
        let name = acquirer.name();
        let shared = Arc::new(WorkerShared::new());
        acquirer.initialize(&shared)?;

        let (control_tx, control_rx) = unbounded();
        let (terminator_tx, terminator_rx) = bounded(1);
        let thread = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(format!("{name}-worker"))
                .spawn(move || run(acquirer, &shared, period, control_rx, terminator_rx))
                .map_err(AcquisitionError::WorkerSpawn)?
        };
        LogManager::new(name).record(&format!("worker started, period {period:?}"));

        Ok(Self {
            name,
            control_tx,
            terminator_tx,
            thread: Some(thread),
            shared,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Queues a playback command; ignored once the worker has stopped.
    pub fn send_control(&self, control: PlaybackControl) {
        if self.control_tx.send(control).is_err() {
            LogManager::new(self.name).detail("control dropped, worker stopped");
        }
    }

    /// State observers can poll without going through the session.
    pub fn shared(&self) -> Arc<WorkerShared> {
        Arc::clone(&self.shared)
    }

    pub fn latest_frame(&self) -> Option<Arc<PublishedFrame>> {
        self.shared.frame.latest()
    }

    pub fn frame_sequence(&self) -> u64 {
        self.shared.frame.sequence()
    }

    pub fn status(&self) -> WorkerStatus {
        self.shared.status()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    /// Stops the thread and returns the outcome of the acquirer's cleanup.
    pub fn shutdown(mut self) -> AcquisitionResult<()> {
        self.join()
    }

    fn join(&mut self) -> AcquisitionResult<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        // the thread may already be gone, in which case the send fails harmlessly
        let _ = self.terminator_tx.send(true);
        thread.join().map_err(|_| AcquisitionError::WorkerPanicked)?
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        if let Err(err) = self.join() {
            LogManager::new(self.name).warn(&format!("shutdown failed: {err}"));
        }
    }
}

fn run(
    mut acquirer: Box<dyn Acquirer>,
    shared: &WorkerShared,
    period: Duration,
    control_rx: Receiver<PlaybackControl>,
    terminator_rx: Receiver<bool>,
) -> AcquisitionResult<()> {
    let ticker = tick(period);
    loop {
        select! {
            recv(terminator_rx) -> _ => break,
            recv(control_rx) -> control => match control {
                Ok(control) => acquirer.handle_control(control, shared),
                Err(_) => break,
            },
            recv(ticker) -> _ => acquirer.tick(shared),
        }
    }
    LogManager::new(acquirer.name()).record("worker stopping");
    acquirer.cleanup()
}
