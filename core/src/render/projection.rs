use crate::render::camera::CameraConfig;
use ndarray::{arr2, Array2};
use serde::{Deserialize, Serialize};

/// Pixel size of the draw surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Viewport {
    pub fn half_width(&self) -> f64 {
        f64::from(self.width / 2)
    }

    pub fn half_height(&self) -> f64 {
        f64::from(self.height / 2)
    }

    pub fn aspect(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width)
    }
}

/// Perspective projection plus the NDC-to-pixel mapping.
#[derive(Debug, Clone)]
pub struct Projection {
    viewport: Viewport,
    projection_matrix: Array2<f64>,
    to_screen_matrix: Array2<f64>,
}

impl Projection {
    pub fn new(camera: &CameraConfig, viewport: Viewport) -> Self {
        let h_fov = camera.h_fov;
        let v_fov = h_fov * viewport.aspect();
        let (near, far) = (camera.near_plane, camera.far_plane);

        let right = (h_fov / 2.0).tan();
        let left = -right;
        let top = (v_fov / 2.0).tan();
        let bottom = -top;

        let m00 = 2.0 / (right - left);
        let m11 = 2.0 / (top - bottom);
        let m22 = (far + near) / (far - near);
        let m32 = -2.0 * near * far / (far - near);

        let projection_matrix = arr2(&[
            [m00, 0.0, 0.0, 0.0],
            [0.0, m11, 0.0, 0.0],
            [0.0, 0.0, m22, 1.0],
            [0.0, 0.0, m32, 0.0],
        ]);

        let (hw, hh) = (viewport.half_width(), viewport.half_height());
        let to_screen_matrix = arr2(&[
            [hw, 0.0, 0.0, 0.0],
            [0.0, -hh, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [hw, hh, 0.0, 1.0],
        ]);

        Self {
            viewport,
            projection_matrix,
            to_screen_matrix,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn projection_matrix(&self) -> &Array2<f64> {
        &self.projection_matrix
    }

    pub fn to_screen_matrix(&self) -> &Array2<f64> {
        &self.to_screen_matrix
    }
}
