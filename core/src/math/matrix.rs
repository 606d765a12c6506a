//! 4x4 homogeneous transforms in row-vector convention: a point `p` is
//! transformed as `p · M`, so translations live in the bottom row.

use ndarray::{arr1, arr2, Array2, ArrayView2};

pub struct MatrixHelper;

impl MatrixHelper {
    pub fn multiply(lhs: ArrayView2<f64>, rhs: ArrayView2<f64>) -> Array2<f64> {
        lhs.dot(&rhs)
    }

    /// Applies `matrix` to a direction (w = 0), ignoring translation.
    pub fn transform_direction(direction: [f64; 3], matrix: &Array2<f64>) -> [f64; 3] {
        let v = arr1(&[direction[0], direction[1], direction[2], 0.0]).dot(matrix);
        [v[0], v[1], v[2]]
    }
}

pub fn translate(offset: [f64; 3]) -> Array2<f64> {
    let [tx, ty, tz] = offset;
    arr2(&[
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [tx, ty, tz, 1.0],
    ])
}

pub fn rotate_x(angle: f64) -> Array2<f64> {
    let (s, c) = angle.sin_cos();
    arr2(&[
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, s, 0.0],
        [0.0, -s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotate_y(angle: f64) -> Array2<f64> {
    let (s, c) = angle.sin_cos();
    arr2(&[
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotate_z(angle: f64) -> Array2<f64> {
    let (s, c) = angle.sin_cos();
    arr2(&[
        [c, s, 0.0, 0.0],
        [-s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn scale(factor: f64) -> Array2<f64> {
    arr2(&[
        [factor, 0.0, 0.0, 0.0],
        [0.0, factor, 0.0, 0.0],
        [0.0, 0.0, factor, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn apply(point: [f64; 3], matrix: &Array2<f64>) -> Vec<f64> {
        arr1(&[point[0], point[1], point[2], 1.0])
            .dot(matrix)
            .iter()
            .map(|v| (v * 1e9).round() / 1e9)
            .collect()
    }

    #[test]
    fn translation_moves_points_not_directions() {
        let m = translate([1.0, -2.0, 3.0]);
        assert_eq!(apply([0.0, 0.0, 0.0], &m), vec![1.0, -2.0, 3.0, 1.0]);
        assert_eq!(
            MatrixHelper::transform_direction([0.0, 0.0, 1.0], &m),
            [0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn quarter_turns_about_each_axis() {
        assert_eq!(
            apply([0.0, 1.0, 0.0], &rotate_x(FRAC_PI_2)),
            vec![0.0, 0.0, 1.0, 1.0]
        );
        assert_eq!(
            apply([1.0, 0.0, 0.0], &rotate_y(FRAC_PI_2)),
            vec![0.0, 0.0, -1.0, 1.0]
        );
        assert_eq!(
            apply([1.0, 0.0, 0.0], &rotate_z(FRAC_PI_2)),
            vec![0.0, 1.0, 0.0, 1.0]
        );
    }

    #[test]
    fn multiply_composes_left_to_right() {
        let m = MatrixHelper::multiply(scale(2.0).view(), translate([1.0, 0.0, 0.0]).view());
        assert_eq!(apply([1.0, 1.0, 1.0], &m), vec![3.0, 2.0, 2.0, 1.0]);
    }
}
