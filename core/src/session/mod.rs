//! The render-facing side of the viewer: one acquisition worker, one camera
//! and the reference room, advanced one frame per [`Session::tick`].

pub mod config;
pub mod control;
pub mod render_loop;

pub use config::{SessionConfig, SourceConfig};
pub use control::ControlEvent;
pub use render_loop::{run_render_loop, DrawSurface, SurfaceEvent};

use crate::acquisition::{
    open_serial, LiveAcquirer, ReplayAcquirer, WorkerHandle, WorkerShared, WorkerStatus,
};
use crate::cloud::SphericalMapper;
use crate::prelude::{AcquisitionResult, Rgb};
use crate::render::{reference_room, Camera, FrameDrawables, Object3D, Projection, ViewTransform};
use crate::sensor::timestamped_log_path;
use crate::telemetry::{LogManager, MetricsSnapshot};
use std::sync::Arc;
use std::time::Duration;

pub struct Session {
    config: SessionConfig,
    worker: WorkerHandle,
    camera: Camera,
    projection: Projection,
    room: Vec<Object3D>,
    drawables: FrameDrawables,
    logger: LogManager,
}

impl Session {
    /// Opens the configured source and starts its worker. Every startup
    /// failure is reported here, before the first render tick.
    pub fn start(config: SessionConfig) -> AcquisitionResult<Self> {
        config.validate()?;
        let mapper = SphericalMapper::new(config.filter.clone())
            .with_quarter_turns(config.sensor_quarter_turns);

        let worker = match &config.source {
            SourceConfig::Live {
                transport_address,
                transport_rate,
                output_log_path,
                read_timeout_ms,
                ..
            } => {
                let source = open_serial(
                    transport_address,
                    *transport_rate,
                    Duration::from_millis(*read_timeout_ms),
                )?;
                let output = output_log_path.clone().unwrap_or_else(timestamped_log_path);
                let acquirer = LiveAcquirer::new(Box::new(source), mapper, output);
                WorkerHandle::spawn(Box::new(acquirer), config.acquisition_period())?
            }
            SourceConfig::Replay { input_log_path, .. } => {
                let acquirer = ReplayAcquirer::open(input_log_path, mapper)?;
                WorkerHandle::spawn(Box::new(acquirer), config.acquisition_period())?
            }
        };
        Ok(Self::from_worker(config, worker))
    }

    /// Wraps an already running worker.
    pub fn from_worker(config: SessionConfig, worker: WorkerHandle) -> Self {
        let camera = Camera::new(config.camera.clone());
        let projection = Projection::new(&config.camera, config.viewport);
        let logger = LogManager::new("session");
        logger.record(&format!("{} session ready", worker.name()));
        Self {
            config,
            worker,
            camera,
            projection,
            room: reference_room(Rgb::GRAY25),
            drawables: FrameDrawables::default(),
            logger,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Projects the room and the latest published cloud for this frame.
    pub fn tick(&mut self) -> &FrameDrawables {
        let view = ViewTransform::new(&self.camera, &self.projection);
        let polygons = self
            .room
            .iter()
            .flat_map(|object| view.project_object(object))
            .collect();
        let latest = self.worker.latest_frame();
        self.drawables = FrameDrawables {
            polygons,
            points: latest
                .as_ref()
                .map(|frame| view.project_cloud(&frame.cloud))
                .unwrap_or_default(),
            frame_index: latest.map(|frame| frame.frame_index),
        };
        &self.drawables
    }

    pub fn current_drawables(&self) -> &FrameDrawables {
        &self.drawables
    }

    /// Camera events apply here; playback events go to the worker.
    pub fn handle_control_event(&mut self, event: ControlEvent) {
        if let Some(control) = event.playback() {
            self.worker.send_control(control);
            return;
        }
        let speed = self.camera.config().rotation_speed;
        match event {
            ControlEvent::YawLeft => self.camera.yaw(-speed),
            ControlEvent::YawRight => self.camera.yaw(speed),
            ControlEvent::PitchUp => self.camera.pitch(speed),
            ControlEvent::PitchDown => self.camera.pitch(-speed),
            ControlEvent::Move(direction) => self.camera.move_by(direction),
            ControlEvent::ResetCamera => self.camera.reset(),
            _ => {}
        }
    }

    pub fn status(&self) -> WorkerStatus {
        self.worker.status()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.worker.metrics()
    }

    pub fn frame_sequence(&self) -> u64 {
        self.worker.frame_sequence()
    }

    pub fn worker_shared(&self) -> Arc<WorkerShared> {
        self.worker.shared()
    }

    /// Stops the worker; for live sessions this is when the log is written.
    pub fn shutdown(self) -> AcquisitionResult<()> {
        self.logger.record("shutting down");
        self.worker.shutdown()
    }
}
