use crate::cloud::filter::TargetFilter;
use crate::cloud::point_cloud::PointCloud;
use crate::sensor::{Reading, Resolution};
use std::f64::consts::PI;

/// Horizontal angle of column `col` in the 8x8 grid. Column 0 is leftmost at
/// -7/64 pi, each column adds 2/64 pi.
pub fn theta_x(col: usize) -> f64 {
    ((-7.0 + 2.0 * col as f64) / 64.0) * PI
}

/// Vertical angle of row `row` in the 8x8 grid. Row 0 is the top at 7/64 pi.
pub fn theta_y(row: usize) -> f64 {
    ((7.0 - 2.0 * row as f64) / 64.0) * PI
}

/// Point at range `hypotenuse` along the given angles, ordered `(y, x, z, 1)`.
pub fn spherical_point(hypotenuse: f64, theta_x: f64, theta_y: f64) -> [f64; 4] {
    let y = hypotenuse * theta_y.sin();
    let adjacent = hypotenuse * theta_y.cos();
    let x = adjacent * theta_x.sin();
    let z = adjacent * theta_x.cos();
    [y, x, z, 1.0]
}

/// Maps readings onto point clouds.
#[derive(Debug, Clone, Default)]
pub struct SphericalMapper {
    filter: TargetFilter,
    quarter_turns: u8,
}

impl SphericalMapper {
    pub fn new(filter: TargetFilter) -> Self {
        Self {
            filter,
            quarter_turns: 0,
        }
    }

    /// Rotates every reading counter-clockwise `turns` times before mapping,
    /// for sensors mounted on their side.
    pub fn with_quarter_turns(mut self, turns: u8) -> Self {
        self.quarter_turns = turns % 4;
        self
    }

    pub fn filter(&self) -> &TargetFilter {
        &self.filter
    }

    /// Builds a fresh point cloud. Returns `None` for 4x4 frames, which have no
    /// angular calibration.
    pub fn map(&self, reading: &Reading) -> Option<PointCloud> {
        let mut cloud = PointCloud::with_slots(reading.slot_count(), reading.targets_per_zone.into());
        self.map_into(reading, &mut cloud).then_some(cloud)
    }

    /// Fills `cloud` in place. Returns `false`, leaving `cloud` untouched, for
    /// unsupported resolutions.
    pub fn map_into(&self, reading: &Reading, cloud: &mut PointCloud) -> bool {
        if reading.resolution != Resolution::Grid8x8 {
            return false;
        }

        let rotated;
        let reading = if self.quarter_turns == 0 {
            reading
        } else {
            let mut copy = reading.clone();
            for _ in 0..self.quarter_turns {
                copy.rotate_ccw();
            }
            rotated = copy;
            &rotated
        };

        let row_len = reading.row_len();
        let targets_per_zone = usize::from(reading.targets_per_zone);
        cloud.reset(reading.slot_count(), targets_per_zone);

        for (zone_index, zone) in reading.zones.iter().enumerate() {
            let theta_x = theta_x(zone_index % row_len);
            let theta_y = theta_y(zone_index / row_len);
            for (rank, target) in zone.targets.iter().take(targets_per_zone).enumerate() {
                let point = spherical_point(target.distance_m(), theta_x, theta_y);
                let style = self.filter.classify(target, rank, zone.target_count);
                cloud.set(cloud.slot_index(zone_index, rank), point, style);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::reading::tests::uniform_reading;
    use crate::sensor::{Target, Zone};

    const EPS: f64 = 1e-12;

    fn assert_point(actual: ndarray::ArrayView1<f64>, expected: [f64; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < EPS, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn corner_zone_angles() {
        assert!((theta_x(0) + 7.0 * PI / 64.0).abs() < EPS);
        assert!((theta_y(0) - 7.0 * PI / 64.0).abs() < EPS);
        assert!((theta_x(63 % 8) - 7.0 * PI / 64.0).abs() < EPS);
        assert!((theta_y(63 / 8) + 7.0 * PI / 64.0).abs() < EPS);
    }

    #[test]
    fn zone_zero_at_one_metre() {
        let cloud = SphericalMapper::default()
            .map(&uniform_reading(|_| 1000))
            .unwrap();
        let (tx, ty) = (-7.0 * PI / 64.0, 7.0 * PI / 64.0);
        assert_point(
            cloud.point(0),
            [ty.sin(), ty.cos() * tx.sin(), ty.cos() * tx.cos(), 1.0],
        );
        // top-left zone sits up and to the left
        assert!(cloud.point(0)[0] > 0.0);
        assert!(cloud.point(0)[1] < 0.0);
        // bottom-right zone mirrors it
        assert_point(
            cloud.point(63),
            [-ty.sin(), ty.cos() * -tx.sin(), ty.cos() * tx.cos(), 1.0],
        );
    }

    #[test]
    fn point_norm_equals_range() {
        let cloud = SphericalMapper::default()
            .map(&uniform_reading(|i| 200 + 10 * i as i16))
            .unwrap();
        for slot in 0..cloud.len() {
            let p = cloud.point(slot);
            let norm = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((norm - (0.2 + 0.01 * slot as f64)).abs() < 1e-9);
        }
    }

    #[test]
    fn low_resolution_has_no_point_cloud() {
        let zones = vec![
            Zone {
                ambient_per_spad: 1,
                target_count: 1,
                spads_enabled: 1,
                targets: vec![Target::new(1, 1, 500, 1, 5)],
            };
            16
        ];
        let reading = Reading::new(Resolution::Grid4x4, 1, 25, zones).unwrap();
        let mut cloud = PointCloud::with_slots(1, 1);
        assert!(SphericalMapper::default().map(&reading).is_none());
        assert!(!SphericalMapper::default().map_into(&reading, &mut cloud));
        assert_eq!(cloud.len(), 1);
    }

    #[test]
    fn slots_follow_zone_then_rank() {
        let zones = (0..64)
            .map(|i| Zone {
                ambient_per_spad: 0,
                target_count: if i == 5 { 2 } else { 1 },
                spads_enabled: 0,
                targets: vec![
                    Target::new(1, 1, 300, 1, 5),
                    Target::new(1, 1, 600, 1, 5),
                ],
            })
            .collect();
        let reading = Reading::new(Resolution::Grid8x8, 2, 25, zones).unwrap();
        let cloud = SphericalMapper::default().map(&reading).unwrap();
        assert_eq!(cloud.len(), 128);
        assert!(cloud.style(10).drawable);
        assert!(cloud.style(11).drawable);
        assert!(!cloud.style(13).drawable);
        assert_eq!(cloud.drawable_count(), 65);
        assert_eq!(cloud.style(11).color, crate::prelude::Rgb::CYAN);
    }

    #[test]
    fn quarter_turn_rotates_before_mapping() {
        let reading = uniform_reading(|i| if i == 7 { 400 } else { 1000 });
        let cloud = SphericalMapper::default()
            .with_quarter_turns(1)
            .map(&reading)
            .unwrap();
        // zone 7 (top-right) lands in slot 0 (top-left) after one turn
        let p = cloud.point(0);
        let norm = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!((norm - 0.4).abs() < 1e-9);
    }
}
