//! Core of the multi-zone time-of-flight viewer.
//!
//! Raw sensor records are decoded into [`sensor::Reading`]s, mapped onto a
//! fixed-capacity [`cloud::PointCloud`] by the spherical mapper, handed from an
//! acquisition worker to the render loop through a latest-wins slot, and finally
//! projected to screen space by the software transform pipeline in [`render`].

pub mod acquisition;
pub mod cloud;
pub mod math;
pub mod prelude;
pub mod render;
pub mod sensor;
pub mod session;
pub mod telemetry;

pub use prelude::{AcquisitionError, FrameError, Rgb};
pub use session::{Session, SessionConfig};
