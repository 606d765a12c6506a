use crate::gui_bridge::bridge::GuiBridge;
use crate::gui_bridge::model::{FrameCounters, StatusModel};
use crossbeam_channel::Receiver;
use log::info;
use std::sync::Arc;
use tofcore::acquisition::WorkerShared;
use tofcore::render::FrameDrawables;
use tofcore::session::{DrawSurface, SurfaceEvent};

/// Draw surface that hands every frame to the HTTP bridge.
pub struct BridgeSurface {
    bridge: GuiBridge,
    events: Receiver<SurfaceEvent>,
    worker: Arc<WorkerShared>,
    frames: usize,
    report_every: usize,
}

impl BridgeSurface {
    /// `report_every` is the number of frames between stats lines, normally
    /// the render rate.
    pub fn new(
        bridge: GuiBridge,
        events: Receiver<SurfaceEvent>,
        worker: Arc<WorkerShared>,
        report_every: usize,
    ) -> Self {
        Self {
            bridge,
            events,
            worker,
            frames: 0,
            report_every: report_every.max(1),
        }
    }

    #[cfg(test)]
    pub fn frames(&self) -> usize {
        self.frames
    }

    #[cfg(test)]
    pub fn bridge(&self) -> &GuiBridge {
        &self.bridge
    }
}

impl DrawSurface for BridgeSurface {
    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        self.events.try_iter().collect()
    }

    fn present(&mut self, frame: &FrameDrawables) {
        self.frames += 1;
        let status = StatusModel {
            worker: self.worker.status(),
            frames: FrameCounters::new(
                self.frames,
                self.worker.frame.sequence(),
                self.worker.metrics.snapshot(),
            ),
        };
        if self.frames % self.report_every == 0 {
            info!(
                "[GUI] frame {} -> {} points, {} polygons, worker {:?}",
                self.frames,
                frame.points.len(),
                frame.polygons.len(),
                status.worker
            );
        }
        self.bridge.publish(frame, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::net::SocketAddr;
    use tofcore::session::ControlEvent;

    #[test]
    fn present_publishes_and_events_drain() {
        let (events_tx, events_rx) = unbounded();
        let bridge = GuiBridge::new(SocketAddr::from(([127, 0, 0, 1], 0)), events_tx.clone()).unwrap();
        let mut surface = BridgeSurface::new(bridge, events_rx, Arc::new(WorkerShared::new()), 60);

        events_tx
            .send(SurfaceEvent::Control(ControlEvent::PitchDown))
            .unwrap();
        events_tx.send(SurfaceEvent::Quit).unwrap();
        assert_eq!(
            surface.poll_events(),
            vec![
                SurfaceEvent::Control(ControlEvent::PitchDown),
                SurfaceEvent::Quit
            ]
        );
        assert!(surface.poll_events().is_empty());

        let frame = FrameDrawables {
            frame_index: Some(2),
            ..Default::default()
        };
        surface.present(&frame);
        surface.present(&frame);

        let snapshot = surface.bridge().snapshot();
        assert_eq!(surface.frames(), 2);
        assert_eq!(snapshot.frame.frame_index, Some(2));
        assert_eq!(snapshot.status.frames.rendered, 2);
        assert_eq!(snapshot.status.frames.published, 0);
    }
}
