pub mod camera;
pub mod object;
pub mod pipeline;
pub mod projection;

pub use camera::{Camera, CameraConfig, MoveDirection};
pub use object::{checkerboard, reference_room, Face, Object3D};
pub use pipeline::{FrameDrawables, ScreenPoint, ScreenPolygon, ViewTransform};
pub use projection::{Projection, Viewport};
