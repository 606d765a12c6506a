use crate::cloud::TargetFilter;
use crate::prelude::{AcquisitionError, AcquisitionResult};
use crate::render::{CameraConfig, Viewport};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_poll_hz() -> u32 {
    60
}

fn default_read_timeout_ms() -> u64 {
    100
}

fn default_playback_hz() -> u32 {
    5
}

fn default_render_hz() -> u32 {
    60
}

/// Where readings come from. Chosen once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SourceConfig {
    Live {
        transport_address: String,
        transport_rate: u32,
        /// Defaults to a timestamped file in the working directory.
        #[serde(default)]
        output_log_path: Option<PathBuf>,
        #[serde(default = "default_poll_hz")]
        poll_hz: u32,
        #[serde(default = "default_read_timeout_ms")]
        read_timeout_ms: u64,
    },
    Replay {
        input_log_path: PathBuf,
        #[serde(default = "default_playback_hz")]
        playback_frequency_hz: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub filter: TargetFilter,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_render_hz")]
    pub render_hz: u32,
    /// Counter-clockwise quarter turns applied to each reading before mapping.
    #[serde(default)]
    pub sensor_quarter_turns: u8,
}

impl SessionConfig {
    fn with_source(source: SourceConfig) -> Self {
        Self {
            source,
            filter: TargetFilter::default(),
            camera: CameraConfig::default(),
            viewport: Viewport::default(),
            render_hz: default_render_hz(),
            sensor_quarter_turns: 0,
        }
    }

    pub fn live(address: impl Into<String>, rate: u32, output_log_path: Option<PathBuf>) -> Self {
        Self::with_source(SourceConfig::Live {
            transport_address: address.into(),
            transport_rate: rate,
            output_log_path,
            poll_hz: default_poll_hz(),
            read_timeout_ms: default_read_timeout_ms(),
        })
    }

    pub fn replay(input_log_path: impl Into<PathBuf>, playback_frequency_hz: u32) -> Self {
        Self::with_source(SourceConfig::Replay {
            input_log_path: input_log_path.into(),
            playback_frequency_hz,
        })
    }

    pub fn validate(&self) -> AcquisitionResult<()> {
        let invalid = |reason: &str| Err(AcquisitionError::InvalidConfig(reason.to_string()));
        match &self.source {
            SourceConfig::Live {
                transport_address,
                transport_rate,
                poll_hz,
                ..
            } => {
                if transport_address.trim().is_empty() {
                    return invalid("transport address is empty");
                }
                if *transport_rate == 0 {
                    return invalid("transport rate must be positive");
                }
                if *poll_hz == 0 {
                    return invalid("poll rate must be positive");
                }
            }
            SourceConfig::Replay {
                playback_frequency_hz,
                ..
            } => {
                if *playback_frequency_hz == 0 {
                    return invalid("playback frequency must be positive");
                }
            }
        }
        if self.render_hz == 0 {
            return invalid("render rate must be positive");
        }
        if self.sensor_quarter_turns > 3 {
            return invalid("sensor quarter turns must be 0 to 3");
        }
        if self.viewport.width < 2 || self.viewport.height < 2 {
            return invalid("viewport is too small");
        }
        if !(self.camera.near_plane > 0.0 && self.camera.far_plane > self.camera.near_plane) {
            return invalid("camera planes must satisfy 0 < near < far");
        }
        Ok(())
    }

    /// Tick period of the acquisition worker.
    pub fn acquisition_period(&self) -> Duration {
        match self.source {
            SourceConfig::Live { poll_hz, .. } => period(poll_hz),
            SourceConfig::Replay {
                playback_frequency_hz,
                ..
            } => period(playback_frequency_hz),
        }
    }

    pub fn render_period(&self) -> Duration {
        period(self.render_hz)
    }
}

fn period(hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(hz.max(1)))
}
