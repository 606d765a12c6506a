use crate::cloud::PointCloud;
use crate::math::MatrixHelper;
use crate::prelude::Rgb;
use crate::render::camera::Camera;
use crate::render::object::Object3D;
use crate::render::projection::Projection;
use ndarray::{s, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Screen-space point, centre in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub radius_px: u32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenPolygon {
    pub vertices: Vec<[f64; 2]>,
    pub color: Rgb,
}

/// Everything the draw surface needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameDrawables {
    pub polygons: Vec<ScreenPolygon>,
    pub points: Vec<ScreenPoint>,
    /// Index of the reading the points came from, if any were published yet.
    pub frame_index: Option<usize>,
}

/// Camera, projection and screen matrices for one render tick.
pub struct ViewTransform {
    view_projection: Array2<f64>,
    to_screen: Array2<f64>,
    half_width: f64,
    half_height: f64,
}

impl ViewTransform {
    pub fn new(camera: &Camera, projection: &Projection) -> Self {
        let view_projection = MatrixHelper::multiply(
            camera.camera_matrix().view(),
            projection.projection_matrix().view(),
        );
        let viewport = projection.viewport();
        Self {
            view_projection,
            to_screen: projection.to_screen_matrix().clone(),
            half_width: viewport.half_width(),
            half_height: viewport.half_height(),
        }
    }

    /// Projects homogeneous rows to `(x, y)` pixels. Components leaving the
    /// normalized cube after the perspective divide collapse to 0, which lands
    /// on the half-width/half-height sentinel used by the cull test.
    pub fn project(&self, vertices: ArrayView2<f64>) -> Array2<f64> {
        let mut clip = vertices.dot(&self.view_projection);
        for mut row in clip.rows_mut() {
            let w = row[3];
            row.mapv_inplace(|c| {
                let ndc = c / w;
                if ndc.is_finite() && (-1.0..=1.0).contains(&ndc) {
                    ndc
                } else {
                    0.0
                }
            });
        }
        clip.dot(&self.to_screen).slice(s![.., ..2]).to_owned()
    }

    /// A projected vertex touching either sentinel was clipped.
    pub fn is_clipped(&self, vertex: ArrayView1<f64>) -> bool {
        vertex
            .iter()
            .any(|&c| c == self.half_width || c == self.half_height)
    }

    /// Faces of `object` that survive culling.
    pub fn project_object(&self, object: &Object3D) -> Vec<ScreenPolygon> {
        let screen = self.project(object.vertices());
        object
            .faces()
            .iter()
            .filter_map(|face| {
                let corners = face
                    .indices
                    .iter()
                    .map(|&index| {
                        (index < screen.nrows())
                            .then(|| screen.row(index))
                            .filter(|vertex| !self.is_clipped(vertex.view()))
                            .map(|vertex| [vertex[0], vertex[1]])
                    })
                    .collect::<Option<Vec<_>>>()?;
                (corners.len() >= 3).then(|| ScreenPolygon {
                    vertices: corners,
                    color: face.color,
                })
            })
            .collect()
    }

    /// Drawable, unclipped slots of the cloud.
    pub fn project_cloud(&self, cloud: &PointCloud) -> Vec<ScreenPoint> {
        let screen = self.project(cloud.vertices());
        screen
            .rows()
            .into_iter()
            .zip(cloud.styles())
            .filter(|(vertex, style)| style.drawable && !self.is_clipped(vertex.view()))
            .map(|(vertex, style)| ScreenPoint {
                x: vertex[0],
                y: vertex[1],
                radius_px: style.size_px,
                color: style.color,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::PointStyle;
    use crate::render::camera::CameraConfig;
    use crate::render::object::{reference_room, Face};
    use crate::render::projection::Viewport;
    use ndarray::arr2;

    fn origin_view() -> ViewTransform {
        let config = CameraConfig {
            position: [0.0, 0.0, 0.0],
            ..Default::default()
        };
        let camera = Camera::new(config.clone());
        ViewTransform::new(&camera, &Projection::new(&config, Viewport::default()))
    }

    #[test]
    fn forward_axis_projects_to_screen_centre() {
        let view = origin_view();
        let screen = view.project(arr2(&[[0.0, 0.0, 5.0, 1.0], [0.0, 0.0, 50.0, 1.0]]).view());
        for row in screen.rows() {
            assert_eq!((row[0], row[1]), (960.0, 540.0));
        }
    }

    #[test]
    fn off_axis_points_land_on_the_right_side() {
        let view = origin_view();
        let screen = view.project(arr2(&[[0.5, 0.25, 5.0, 1.0]]).view());
        assert!(screen[[0, 0]] > 960.0);
        assert!(screen[[0, 1]] < 540.0);
        assert!(!view.is_clipped(screen.row(0)));
    }

    #[test]
    fn out_of_frustum_component_collapses_to_sentinel() {
        let view = origin_view();
        // far outside the horizontal field of view
        let screen = view.project(arr2(&[[100.0, 0.1, 5.0, 1.0]]).view());
        assert_eq!(screen[[0, 0]], 960.0);
        assert!(view.is_clipped(screen.row(0)));
    }

    #[test]
    fn polygons_with_clipped_or_missing_vertices_are_skipped() {
        let view = origin_view();
        let vertices = arr2(&[
            [-0.1, -0.1, 5.0, 1.0],
            [-0.1, 0.1, 5.0, 1.0],
            [0.1, 0.1, 5.0, 1.0],
            [100.0, 0.1, 5.0, 1.0],
        ]);
        let faces = vec![
            Face {
                indices: vec![0, 1, 2],
                color: Rgb::GRAY25,
            },
            Face {
                indices: vec![0, 1, 3],
                color: Rgb::GRAY25,
            },
            Face {
                indices: vec![0, 1],
                color: Rgb::GRAY25,
            },
            Face {
                indices: vec![0, 1, 9],
                color: Rgb::GRAY25,
            },
        ];
        let polygons = view.project_object(&Object3D::new(vertices, faces));
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].vertices.len(), 3);
    }

    #[test]
    fn only_drawable_points_are_emitted() {
        let view = origin_view();
        let mut cloud = PointCloud::with_slots(3, 1);
        let visible = PointStyle {
            drawable: true,
            size_px: 7,
            color: Rgb::CYAN,
        };
        cloud.set(0, [0.1, 0.2, 1.0, 1.0], visible);
        cloud.set(1, [0.1, 0.2, 1.0, 1.0], PointStyle::default());
        cloud.set(2, [100.0, 0.2, 1.0, 1.0], visible);
        let points = view.project_cloud(&cloud);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].radius_px, 7);
        assert_eq!(points[0].color, Rgb::CYAN);
    }

    #[test]
    fn reference_room_is_visible_from_home_pose() {
        let config = CameraConfig::default();
        let view = ViewTransform::new(
            &Camera::new(config.clone()),
            &Projection::new(&config, Viewport::default()),
        );
        let drawn: usize = reference_room(Rgb::GRAY25)
            .iter()
            .map(|object| view.project_object(object).len())
            .sum();
        assert!(drawn > 0);
    }
}
