pub mod matrix;

pub use matrix::{rotate_x, rotate_y, rotate_z, scale, translate, MatrixHelper};
