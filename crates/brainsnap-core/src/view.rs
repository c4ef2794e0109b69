//! Named views, rotation sequences and the camera transforms they produce.
//!
//! Meshes are in RAS coordinates (x right, y anterior, z superior). The
//! camera sits on the +Z screen axis looking at the origin with +Y up, so a
//! view is just a rotation taking RAS into screen space.

use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::BoundingSphere;

/// Canonical viewing directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// From -x, anterior to the screen left. Lateral for a left hemisphere.
    #[default]
    Left,
    /// From +x, anterior to the screen right.
    Right,
    /// From -y.
    Back,
    /// From +y.
    Front,
    /// From +z, anterior up.
    Top,
    /// From -z, anterior up.
    Bottom,
}

impl ViewKind {
    pub const ALL: [ViewKind; 6] = [
        ViewKind::Left,
        ViewKind::Right,
        ViewKind::Back,
        ViewKind::Front,
        ViewKind::Top,
        ViewKind::Bottom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Left => "left",
            ViewKind::Right => "right",
            ViewKind::Back => "back",
            ViewKind::Front => "front",
            ViewKind::Top => "top",
            ViewKind::Bottom => "bottom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    /// Rotation from RAS into screen coordinates for this view.
    pub fn base_rotation(self) -> Mat3 {
        // Each column is the screen-space image of the RAS x, y, z axes.
        let (x, y, z) = match self {
            ViewKind::Left => (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
            ViewKind::Right => (Vec3::Z, Vec3::X, Vec3::Y),
            ViewKind::Back => (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            ViewKind::Front => (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            ViewKind::Top => (Vec3::X, Vec3::Y, Vec3::Z),
            ViewKind::Bottom => (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
        };
        Mat3::from_cols(x, y, z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Camera framing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub view: ViewKind,
    /// Degrees about the screen vertical, applied after the base view.
    pub azimuth: f32,
    /// Degrees about the screen horizontal, applied last.
    pub elevation: f32,
    /// 1 fits the bounding sphere to the frame height; larger zooms out.
    pub zoom: f32,
    pub projection: ProjectionMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewKind::default())
    }
}

impl ViewState {
    pub fn new(view: ViewKind) -> Self {
        Self {
            view,
            azimuth: 0.0,
            elevation: 0.0,
            zoom: 1.0,
            projection: ProjectionMode::default(),
        }
    }

    #[must_use]
    pub fn with_azimuth(mut self, degrees: f32) -> Self {
        self.azimuth = degrees;
        self
    }

    #[must_use]
    pub fn with_elevation(mut self, degrees: f32) -> Self {
        self.elevation = degrees;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionMode) -> Self {
        self.projection = projection;
        self
    }

    /// `R_x(elevation) * R_y(azimuth) * base(view)`.
    pub fn orientation(&self) -> Mat3 {
        Mat3::from_rotation_x(self.elevation.to_radians())
            * Mat3::from_rotation_y(self.azimuth.to_radians())
            * self.view.base_rotation()
    }

    /// One state per frame of a full turn starting at this state.
    pub fn rotation_sequence(&self, total_frames: usize) -> Vec<ViewState> {
        rotation_azimuths(total_frames)
            .into_iter()
            .map(|a| Self {
                azimuth: self.azimuth + a,
                ..*self
            })
            .collect()
    }
}

/// Azimuths `360 * i / total_frames` for `i` in `0..total_frames`.
///
/// The last angle stops one step short of a full turn.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn rotation_azimuths(total_frames: usize) -> Vec<f32> {
    (0..total_frames)
        .map(|i| (360.0 * i as f64 / total_frames as f64) as f32)
        .collect()
}

/// Matrices handed to the renderer for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// Inverse transpose of the model matrix, for normals.
    pub normal_matrix: Mat4,
    pub camera_position: Vec3,
}

impl ViewTransforms {
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.model
    }
}

/// Projection settings for a render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
}

impl CameraRig {
    pub const DEFAULT_FOV_DEGREES: f32 = 20.0;
    const ORTHO_DISTANCE: f32 = 3.0;

    pub fn new(width: u32, height: u32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
        Self {
            fov_y: Self::DEFAULT_FOV_DEGREES.to_radians(),
            aspect_ratio,
        }
    }

    /// Camera distance at which the unit sphere spans `zoom` times the frame height.
    pub fn camera_distance(&self, state: &ViewState) -> f32 {
        match state.projection {
            ProjectionMode::Perspective => state.zoom / (self.fov_y * 0.5).sin(),
            ProjectionMode::Orthographic => Self::ORTHO_DISTANCE,
        }
    }

    /// Transforms that center `bounds`, scale it to unit radius, apply the
    /// view orientation and project.
    pub fn transforms(&self, bounds: BoundingSphere, state: &ViewState) -> ViewTransforms {
        let radius = if bounds.radius > f32::EPSILON {
            bounds.radius
        } else {
            1.0
        };
        let model = Mat4::from_mat3(state.orientation())
            * Mat4::from_scale(Vec3::splat(1.0 / radius))
            * Mat4::from_translation(-bounds.center);

        let distance = self.camera_distance(state);
        let camera_position = Vec3::new(0.0, 0.0, distance);
        let view = Mat4::look_at_rh(camera_position, Vec3::ZERO, Vec3::Y);

        let projection = match state.projection {
            ProjectionMode::Perspective => Mat4::perspective_rh(
                self.fov_y,
                self.aspect_ratio,
                (distance - 1.5).max(0.01),
                distance + 1.5,
            ),
            ProjectionMode::Orthographic => {
                let half_height = state.zoom;
                let half_width = half_height * self.aspect_ratio;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    0.01,
                    2.0 * distance,
                )
            }
        };

        ViewTransforms {
            model,
            view,
            projection,
            normal_matrix: model.inverse().transpose(),
            camera_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_mat(a: Mat3, b: Mat3) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn test_left_view_maps_axes() {
        let m = ViewKind::Left.base_rotation();
        // Lateral surface of the left hemisphere faces the camera.
        assert_eq!(m * Vec3::NEG_X, Vec3::Z);
        // Anterior points to the screen left, superior up.
        assert_eq!(m * Vec3::Y, Vec3::NEG_X);
        assert_eq!(m * Vec3::Z, Vec3::Y);
    }

    #[test]
    fn test_named_views_are_azimuth_rotations_of_left() {
        let left = ViewKind::Left.base_rotation();
        let rot = |deg: f32| Mat3::from_rotation_y(deg.to_radians()) * left;
        assert!(approx_mat(rot(180.0), ViewKind::Right.base_rotation()));
        assert!(approx_mat(rot(90.0), ViewKind::Front.base_rotation()));
        assert!(approx_mat(rot(-90.0), ViewKind::Back.base_rotation()));
    }

    #[test]
    fn test_top_and_bottom_keep_anterior_up() {
        for view in [ViewKind::Top, ViewKind::Bottom] {
            assert_eq!(view.base_rotation() * Vec3::Y, Vec3::Y);
        }
        assert_eq!(ViewKind::Top.base_rotation() * Vec3::Z, Vec3::Z);
        assert_eq!(ViewKind::Bottom.base_rotation() * Vec3::NEG_Z, Vec3::Z);
    }

    #[test]
    fn test_rotation_azimuths_36() {
        let angles = rotation_azimuths(36);
        assert_eq!(angles.len(), 36);
        for (i, a) in angles.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = 10.0 * i as f32;
            assert_eq!(*a, expected);
        }
        assert_eq!(angles.last(), Some(&350.0));
    }

    #[test]
    fn test_rotation_sequence_offsets_start() {
        let start = ViewState::new(ViewKind::Right).with_azimuth(15.0);
        let seq = start.rotation_sequence(4);
        let az: Vec<f32> = seq.iter().map(|s| s.azimuth).collect();
        assert_eq!(az, [15.0, 105.0, 195.0, 285.0]);
        assert!(seq.iter().all(|s| s.view == ViewKind::Right));
    }

    #[test]
    fn test_transforms_center_and_fit() {
        let rig = CameraRig::new(400, 400);
        let bounds = BoundingSphere {
            center: Vec3::new(10.0, -4.0, 2.0),
            radius: 5.0,
        };
        let t = rig.transforms(bounds, &ViewState::default());
        let c = t.model.transform_point3(bounds.center);
        assert!(c.length() < 1e-5);

        // A point on the sphere's top lands on the top edge of the frame.
        let top = t.model.inverse().transform_point3(Vec3::Y);
        let clip = t.model_view_projection().project_point3(top);
        assert!(clip.y > 0.9 && clip.y <= 1.0 + 1e-4);
    }

    #[test]
    fn test_zoom_out_moves_camera_back() {
        let rig = CameraRig::new(640, 480);
        let near = rig.camera_distance(&ViewState::default());
        let far = rig.camera_distance(&ViewState::default().with_zoom(2.0));
        assert!((far - 2.0 * near).abs() < 1e-4);
    }

    #[test]
    fn test_orthographic_half_height_is_zoom() {
        let rig = CameraRig::new(200, 100);
        let state = ViewState::default()
            .with_projection(ProjectionMode::Orthographic)
            .with_zoom(2.0);
        let t = rig.transforms(
            BoundingSphere {
                center: Vec3::ZERO,
                radius: 1.0,
            },
            &state,
        );
        let p = t.projection * t.view;
        let edge = p.project_point3(Vec3::new(4.0, 2.0, 0.0));
        assert!((edge.x - 1.0).abs() < 1e-5);
        assert!((edge.y - 1.0).abs() < 1e-5);
    }
}
