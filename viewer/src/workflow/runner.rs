use crate::gui_bridge::bridge::GuiBridge;
use crate::gui_bridge::surface::BridgeSurface;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{info, warn};
use std::thread;
use tofcore::session::{run_render_loop, SurfaceEvent};
use tofcore::telemetry::MetricsSnapshot;
use tofcore::Session;
use tokio::runtime::Builder;
use tokio::signal;

pub struct WorkflowResult {
    pub rendered_frames: usize,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Runs until Ctrl+C.
    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let (events_tx, events_rx) = unbounded();
        spawn_ctrl_c_watcher(events_tx.clone())?;
        self.execute_with_events(events_tx, events_rx)
    }

    /// Runs until a [`SurfaceEvent::Quit`] arrives on `events_rx`.
    pub fn execute_with_events(
        &self,
        events_tx: Sender<SurfaceEvent>,
        events_rx: Receiver<SurfaceEvent>,
    ) -> anyhow::Result<WorkflowResult> {
        let mut session =
            Session::start(self.config.session.clone()).context("starting session")?;
        let bridge = GuiBridge::new(self.config.bind, events_tx)?;
        bridge.publish_status(&format!(
            "serving frames on http://{} (Ctrl+C to stop)",
            bridge.address()
        ));

        let mut surface = BridgeSurface::new(
            bridge,
            events_rx,
            session.worker_shared(),
            self.config.session.render_hz as usize,
        );
        let rendered_frames = run_render_loop(&mut session, &mut surface);
        let metrics = session.metrics();
        session.shutdown().context("shutting down session")?;
        info!(
            "session ended: {} frames rendered, {} decoded, {} dropped",
            rendered_frames, metrics.decoded, metrics.dropped
        );

        Ok(WorkflowResult {
            rendered_frames,
            metrics,
        })
    }
}

/// Turns Ctrl+C into a quit event for the render loop.
fn spawn_ctrl_c_watcher(events: Sender<SurfaceEvent>) -> anyhow::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for signal handling")?;
    thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            runtime.block_on(async {
                match signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Ctrl+C received, stopping");
                        let _ = events.send(SurfaceEvent::Quit);
                    }
                    Err(err) => warn!("cannot listen for Ctrl+C: {err}"),
                }
            })
        })
        .context("spawning Ctrl+C watcher")?;
    Ok(())
}
