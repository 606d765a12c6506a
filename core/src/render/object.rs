use crate::math::{rotate_x, rotate_y, rotate_z, scale, translate};
use crate::prelude::Rgb;
use ndarray::{Array2, ArrayView2};
use std::f64::consts::FRAC_PI_2;

/// Polygon given as indices into the owning object's vertex list.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub indices: Vec<usize>,
    pub color: Rgb,
}

/// Static geometry: homogeneous vertices (one row each) plus coloured faces.
#[derive(Debug, Clone)]
pub struct Object3D {
    vertices: Array2<f64>,
    faces: Vec<Face>,
}

impl Object3D {
    pub fn new(vertices: Array2<f64>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    pub fn vertices(&self) -> ArrayView2<'_, f64> {
        self.vertices.view()
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    fn apply(&mut self, matrix: Array2<f64>) {
        self.vertices = self.vertices.dot(&matrix);
    }

    pub fn translate(&mut self, offset: [f64; 3]) {
        self.apply(translate(offset));
    }

    pub fn scale(&mut self, factor: f64) {
        self.apply(scale(factor));
    }

    pub fn rotate_x(&mut self, angle: f64) {
        self.apply(rotate_x(angle));
    }

    pub fn rotate_y(&mut self, angle: f64) {
        self.apply(rotate_y(angle));
    }

    pub fn rotate_z(&mut self, angle: f64) {
        self.apply(rotate_z(angle));
    }
}

/// Flat checkerboard in the z = 0 plane, built from diagonal pairs of square
/// cells so only every other cell is filled.
pub fn checkerboard(board_size: (f64, f64), cell_size: (f64, f64), color: Rgb) -> Object3D {
    let n_rows = (board_size.0 / cell_size.0 + 1e-9).floor() as usize;
    let n_cols = (board_size.1 / cell_size.1 + 1e-9).floor() as usize;

    const CELL_OFFSETS: [[(f64, f64); 4]; 2] = [
        [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)],
        [(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)],
    ];

    let mut flat = Vec::new();
    let mut faces = Vec::new();
    // each diagonal pair spans two cells, so a pair must fit in full
    for r in (0..n_rows.saturating_sub(1)).step_by(2) {
        for c in (0..n_cols.saturating_sub(1)).step_by(2) {
            for offsets in CELL_OFFSETS {
                let first = flat.len() / 4;
                for (dr, dc) in offsets {
                    flat.extend_from_slice(&[
                        (r as f64 + dr) * cell_size.0,
                        (c as f64 + dc) * cell_size.1,
                        0.0,
                        1.0,
                    ]);
                }
                faces.push(Face {
                    indices: (first..first + 4).collect(),
                    color,
                });
            }
        }
    }

    let rows = flat.len() / 4;
    let vertices = Array2::from_shape_vec((rows, 4), flat)
        .unwrap_or_else(|_| Array2::zeros((0, 4)));
    Object3D::new(vertices, faces)
}

/// Floor and rear wall framing the sensor's field of view, to make depth
/// easier to perceive.
pub fn reference_room(color: Rgb) -> Vec<Object3D> {
    let mut floor = checkerboard((2.0, 1.5), (0.1, 0.1), color);
    floor.rotate_x(FRAC_PI_2);
    floor.translate([-1.0, -0.5, 0.0]);

    let mut rear_wall = checkerboard((2.0, 1.5), (0.1, 0.1), color);
    rear_wall.translate([-1.0, -0.5, 1.6]);

    vec![floor, rear_wall]
}
