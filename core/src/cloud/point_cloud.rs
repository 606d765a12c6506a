use crate::cloud::filter::PointStyle;
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Fixed-capacity point cloud: one homogeneous `(y, x, z, 1)` row per
/// `(zone, rank)` slot, with a parallel style array.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    targets_per_zone: usize,
    vertices: Array2<f64>,
    styles: Vec<PointStyle>,
}

impl PointCloud {
    pub fn with_slots(slots: usize, targets_per_zone: usize) -> Self {
        Self {
            targets_per_zone,
            vertices: Self::origin_vertices(slots),
            styles: vec![PointStyle::default(); slots],
        }
    }

    fn origin_vertices(slots: usize) -> Array2<f64> {
        let mut vertices = Array2::zeros((slots, 4));
        vertices.column_mut(3).fill(1.0);
        vertices
    }

    /// Resets every slot, reallocating only when the shape changes.
    pub fn reset(&mut self, slots: usize, targets_per_zone: usize) {
        self.targets_per_zone = targets_per_zone;
        if self.vertices.nrows() != slots {
            self.vertices = Self::origin_vertices(slots);
        } else {
            self.vertices.fill(0.0);
            self.vertices.column_mut(3).fill(1.0);
        }
        self.styles.clear();
        self.styles.resize(slots, PointStyle::default());
    }

    pub fn set(&mut self, slot: usize, point: [f64; 4], style: PointStyle) {
        for (axis, value) in point.into_iter().enumerate() {
            self.vertices[[slot, axis]] = value;
        }
        self.styles[slot] = style;
    }

    pub fn slot_index(&self, zone: usize, rank: usize) -> usize {
        zone * self.targets_per_zone + rank
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn targets_per_zone(&self) -> usize {
        self.targets_per_zone
    }

    pub fn vertices(&self) -> ArrayView2<'_, f64> {
        self.vertices.view()
    }

    pub fn point(&self, slot: usize) -> ArrayView1<'_, f64> {
        self.vertices.row(slot)
    }

    pub fn style(&self, slot: usize) -> &PointStyle {
        &self.styles[slot]
    }

    pub fn styles(&self) -> &[PointStyle] {
        &self.styles
    }

    pub fn drawable_count(&self) -> usize {
        self.styles.iter().filter(|style| style.drawable).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cloud_is_homogeneous_origin() {
        let cloud = PointCloud::with_slots(3, 1);
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.point(2).to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(cloud.drawable_count(), 0);
    }

    #[test]
    fn reset_clears_previous_frame() {
        let mut cloud = PointCloud::with_slots(4, 2);
        cloud.set(
            3,
            [1.0, 2.0, 3.0, 1.0],
            PointStyle {
                drawable: true,
                ..Default::default()
            },
        );
        assert_eq!(cloud.drawable_count(), 1);
        cloud.reset(4, 2);
        assert_eq!(cloud.point(3).to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(cloud.drawable_count(), 0);
        cloud.reset(8, 4);
        assert_eq!(cloud.len(), 8);
        assert_eq!(cloud.slot_index(1, 3), 7);
    }
}
