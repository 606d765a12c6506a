use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::acquisition::{Acquirer, PlaybackControl, WorkerShared, WorkerStatus};

/// 8-bit RGB colour used for faces and points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
    pub const GRAY25: Rgb = Rgb(64, 64, 64);
}

/// Failure to decode a single sensor frame.
///
/// These never escape the acquisition worker; the frame is dropped and the
/// previously published point cloud stays on screen.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid resolution {0}, expected 16 or 64 zones")]
    InvalidResolution(i64),
    #[error("invalid targets per zone {0}, expected 1 to 4")]
    InvalidTargetsPerZone(u32),
    #[error("malformed {field} token {token:?} at position {index}")]
    MalformedToken {
        index: usize,
        field: &'static str,
        token: String,
    },
    #[error("truncated frame: needed {expected} tokens, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },
}

pub type FrameResult<T> = Result<T, FrameError>;

/// Failure while loading or persisting a reading log.
#[derive(thiserror::Error, Debug)]
pub enum ReadingLogError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("log contains no readings")]
    Empty,
}

/// Session-level failures. Startup variants are reported before the render
/// loop begins.
#[derive(thiserror::Error, Debug)]
pub enum AcquisitionError {
    #[error("transport {address} unavailable: {source}")]
    TransportUnavailable {
        address: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to load reading log {}: {source}", path.display())]
    LogLoadFailure {
        path: PathBuf,
        #[source]
        source: ReadingLogError,
    },
    #[error("failed to persist reading log {}: {source}", path.display())]
    LogPersistFailure {
        path: PathBuf,
        #[source]
        source: ReadingLogError,
    },
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),
    #[error("worker thread panicked")]
    WorkerPanicked,
}

pub type AcquisitionResult<T> = Result<T, AcquisitionError>;
