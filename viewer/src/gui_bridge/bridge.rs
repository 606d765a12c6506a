use crate::gui_bridge::model::{StatusModel, VisualizationModel};
use anyhow::Context;
use crossbeam_channel::Sender;
use log::info;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
    thread,
};
use tofcore::render::FrameDrawables;
use tofcore::session::{ControlEvent, SurfaceEvent};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

type SharedModel = Arc<RwLock<VisualizationModel>>;

fn routes(
    state: SharedModel,
    events: Sender<SurfaceEvent>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let events_filter = warp::any().map(move || events.clone());

    let frame_route = warp::path("frame")
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedModel| {
            let model = state.read().unwrap_or_else(PoisonError::into_inner);
            warp::reply::json(&model.frame)
        });

    let status_route = warp::path("status")
        .and(warp::get())
        .and(state_filter)
        .map(|state: SharedModel| {
            let model = state.read().unwrap_or_else(PoisonError::into_inner);
            warp::reply::json(&model.status)
        });

    let control_route = warp::path("control")
        .and(warp::post())
        .and(warp::body::json())
        .and(events_filter)
        .map(|event: ControlEvent, events: Sender<SurfaceEvent>| {
            match events.send(SurfaceEvent::Control(event)) {
                Ok(()) => warp::reply::with_status(
                    warp::reply::json(&json!({"status": "queued"})),
                    StatusCode::ACCEPTED,
                ),
                Err(_) => warp::reply::with_status(
                    warp::reply::json(&json!({"status": "render loop stopped"})),
                    StatusCode::SERVICE_UNAVAILABLE,
                ),
            }
        });

    frame_route.or(status_route).or(control_route)
}

/// HTTP endpoint serving rendered frames and taking control events.
///
/// `GET /frame` and `GET /status` read the last published model;
/// `POST /control` queues a [`ControlEvent`] for the render loop.
pub struct GuiBridge {
    state: SharedModel,
    address: SocketAddr,
}

impl GuiBridge {
    pub fn new(bind: SocketAddr, events: Sender<SurfaceEvent>) -> anyhow::Result<Self> {
        let state: SharedModel = Arc::new(RwLock::new(VisualizationModel::default()));
        let routes = routes(state.clone(), events);

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for the GUI bridge")?;
        let (address, server) = runtime
            .block_on(async { warp::serve(routes).try_bind_ephemeral(bind) })
            .with_context(|| format!("binding GUI bridge to {bind}"))?;

        // detached: the server lives as long as the process
        thread::Builder::new()
            .name("gui-bridge".into())
            .spawn(move || runtime.block_on(server))
            .context("spawning GUI bridge thread")?;

        Ok(Self { state, address })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn publish(&self, frame: &FrameDrawables, status: StatusModel) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        guard.frame.clone_from(frame);
        guard.status = status;
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
