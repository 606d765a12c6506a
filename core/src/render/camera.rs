use crate::math::{rotate_x, rotate_y, translate, MatrixHelper};
use ndarray::{arr2, Array2};
use serde::{Deserialize, Serialize};

/// Home pose and speeds of the free-flying camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f64; 3],
    /// Horizontal field of view in radians.
    pub h_fov: f64,
    pub near_plane: f64,
    pub far_plane: f64,
    pub moving_speed: f64,
    pub rotation_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.5, 1.0, -7.0],
            h_fov: std::f64::consts::FRAC_PI_3,
            near_plane: 0.1,
            far_plane: 100.0,
            moving_speed: 0.05,
            rotation_speed: 0.025,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Left,
    Right,
    Forward,
    Backward,
    Up,
    Down,
}

/// Camera with an orthonormal `{right, up, forward}` basis.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    position: [f64; 3],
    forward: [f64; 3],
    up: [f64; 3],
    right: [f64; 3],
}

const FORWARD: [f64; 3] = [0.0, 0.0, 1.0];
const UP: [f64; 3] = [0.0, 1.0, 0.0];
const RIGHT: [f64; 3] = [1.0, 0.0, 0.0];

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            position: config.position,
            forward: FORWARD,
            up: UP,
            right: RIGHT,
            config,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    pub fn basis(&self) -> ([f64; 3], [f64; 3], [f64; 3]) {
        (self.right, self.up, self.forward)
    }

    /// Back to the configured home pose.
    pub fn reset(&mut self) {
        self.position = self.config.position;
        self.forward = FORWARD;
        self.up = UP;
        self.right = RIGHT;
    }

    pub fn move_by(&mut self, direction: MoveDirection) {
        let (axis, sign) = match direction {
            MoveDirection::Left => (self.right, -1.0),
            MoveDirection::Right => (self.right, 1.0),
            MoveDirection::Forward => (self.forward, 1.0),
            MoveDirection::Backward => (self.forward, -1.0),
            MoveDirection::Up => (self.up, 1.0),
            MoveDirection::Down => (self.up, -1.0),
        };
        let step = sign * self.config.moving_speed;
        for (p, a) in self.position.iter_mut().zip(axis) {
            *p += a * step;
        }
    }

    /// Rotation about world Y.
    pub fn yaw(&mut self, angle: f64) {
        self.rotate_basis(&rotate_y(angle));
    }

    /// Rotation about world X.
    pub fn pitch(&mut self, angle: f64) {
        self.rotate_basis(&rotate_x(angle));
    }

    fn rotate_basis(&mut self, rotation: &Array2<f64>) {
        self.forward = MatrixHelper::transform_direction(self.forward, rotation);
        self.right = MatrixHelper::transform_direction(self.right, rotation);
        self.up = MatrixHelper::transform_direction(self.up, rotation);
    }

    pub fn translate_matrix(&self) -> Array2<f64> {
        let [x, y, z] = self.position;
        translate([-x, -y, -z])
    }

    pub fn rotate_matrix(&self) -> Array2<f64> {
        let [rx, ry, rz] = self.right;
        let [ux, uy, uz] = self.up;
        let [fx, fy, fz] = self.forward;
        arr2(&[
            [rx, ux, fx, 0.0],
            [ry, uy, fy, 0.0],
            [rz, uz, fz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn camera_matrix(&self) -> Array2<f64> {
        MatrixHelper::multiply(self.translate_matrix().view(), self.rotate_matrix().view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn basis_stays_orthonormal_after_rotations() {
        let mut camera = Camera::new(CameraConfig::default());
        for i in 0..200 {
            if i % 3 == 0 {
                camera.pitch(0.07);
            } else {
                camera.yaw(-0.11);
            }
        }
        let (r, u, f) = camera.basis();
        for v in [r, u, f] {
            assert!((dot(v, v) - 1.0).abs() < 1e-9);
        }
        assert!(dot(r, u).abs() < 1e-9);
        assert!(dot(r, f).abs() < 1e-9);
        assert!(dot(u, f).abs() < 1e-9);
    }

    #[test]
    fn moves_along_basis_and_resets() {
        let mut camera = Camera::new(CameraConfig {
            position: [0.0, 0.0, 0.0],
            moving_speed: 0.5,
            ..Default::default()
        });
        camera.move_by(MoveDirection::Forward);
        camera.move_by(MoveDirection::Right);
        camera.move_by(MoveDirection::Down);
        assert_eq!(camera.position(), [0.5, -0.5, 0.5]);

        camera.yaw(0.3);
        camera.reset();
        assert_eq!(camera.position(), [0.0, 0.0, 0.0]);
        assert_eq!(camera.basis(), (RIGHT, UP, FORWARD));
    }

    #[test]
    fn camera_matrix_moves_camera_to_origin() {
        let camera = Camera::new(CameraConfig {
            position: [1.0, 2.0, 3.0],
            ..Default::default()
        });
        let p = ndarray::arr1(&[1.0, 2.0, 3.0, 1.0]).dot(&camera.camera_matrix());
        assert_eq!(p.to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
    }
}
