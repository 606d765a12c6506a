use crate::acquisition::PlaybackControl;
use crate::render::MoveDirection;
use serde::{Deserialize, Serialize};

/// Discrete input event from the draw surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlEvent {
    TogglePlayback,
    ToggleDirection,
    StepForward,
    StepBackward,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
    Move(MoveDirection),
    ResetCamera,
}

impl ControlEvent {
    /// The worker-side command, for events that belong to the worker.
    pub fn playback(self) -> Option<PlaybackControl> {
        match self {
            ControlEvent::TogglePlayback => Some(PlaybackControl::TogglePlayback),
            ControlEvent::ToggleDirection => Some(PlaybackControl::ToggleDirection),
            ControlEvent::StepForward => Some(PlaybackControl::StepForward),
            ControlEvent::StepBackward => Some(PlaybackControl::StepBackward),
            _ => None,
        }
    }
}

impl From<PlaybackControl> for ControlEvent {
    fn from(control: PlaybackControl) -> Self {
        match control {
            PlaybackControl::TogglePlayback => ControlEvent::TogglePlayback,
            PlaybackControl::ToggleDirection => ControlEvent::ToggleDirection,
            PlaybackControl::StepForward => ControlEvent::StepForward,
            PlaybackControl::StepBackward => ControlEvent::StepBackward,
        }
    }
}
