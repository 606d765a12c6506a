use crate::render::FrameDrawables;
use crate::session::{ControlEvent, Session};
use crate::telemetry::LogManager;
use crossbeam_channel::tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Control(ControlEvent),
    Quit,
}

/// Whatever puts pixels in front of the user and collects their input.
pub trait DrawSurface {
    /// Events received since the previous call.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;
    fn present(&mut self, frame: &FrameDrawables);
}

/// Drives `session` at its render rate until the surface asks to quit.
/// Returns the number of presented frames.
pub fn run_render_loop<S: DrawSurface + ?Sized>(session: &mut Session, surface: &mut S) -> usize {
    let logger = LogManager::new("render");
    let ticker = tick(session.config().render_period());
    let mut frames = 0;

    while ticker.recv().is_ok() {
        let mut quit = false;
        for event in surface.poll_events() {
            match event {
                SurfaceEvent::Control(control) => session.handle_control_event(control),
                SurfaceEvent::Quit => quit = true,
            }
        }
        if quit {
            break;
        }
        surface.present(session.tick());
        frames += 1;
    }

    logger.record(&format!("render loop stopped after {frames} frames"));
    frames
}
