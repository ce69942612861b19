//! Projection transforms.

use crate::matrix::Matrix4;

/// Parameters for a left-handed perspective projection with a fixed vertical
/// field of view.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveProjection {
    /// Vertical field of view, in radians.
    pub vertical_field_of_view: f32,
    /// Width divided by height of the viewport.
    pub aspect_ratio: f32,
    pub near_distance: f32,
    pub far_distance: f32,
}

impl PerspectiveProjection {
    /// Creates a new perspective projection with the given parameters.
    pub const fn new(
        vertical_field_of_view: f32,
        aspect_ratio: f32,
        near_distance: f32,
        far_distance: f32,
    ) -> Self {
        Self {
            vertical_field_of_view,
            aspect_ratio,
            near_distance,
            far_distance,
        }
    }

    /// Computes the projection matrix. See [`perspective_fov_lh`].
    pub fn matrix(&self) -> Matrix4 {
        perspective_fov_lh(
            self.vertical_field_of_view,
            self.aspect_ratio,
            self.near_distance,
            self.far_distance,
        )
    }
}

/// Creates a left-handed perspective projection matrix (the camera looks
/// along +z) in the row-vector convention. Depths between `near_distance` and
/// `far_distance` are mapped to normalized depths from -1 to 1 after
/// perspective division, and the vertical field of view spans -1 to 1 in
/// normalized y.
///
/// The parameters are not validated: a zero field of view, zero aspect ratio
/// or equal near and far distances give non-finite elements.
pub fn perspective_fov_lh(
    vertical_field_of_view: f32,
    aspect_ratio: f32,
    near_distance: f32,
    far_distance: f32,
) -> Matrix4 {
    let y_scale = (0.5 * vertical_field_of_view).tan().recip();
    let x_scale = y_scale / aspect_ratio;
    let depth_range = far_distance - near_distance;
    let depth_scale = (far_distance + near_distance) / depth_range;
    let depth_offset = -2.0 * far_distance * near_distance / depth_range;

    Matrix4::from_rows([
        [x_scale, 0.0, 0.0, 0.0],
        [0.0, y_scale, 0.0, 0.0],
        [0.0, 0.0, depth_scale, 1.0],
        [0.0, 0.0, depth_offset, 0.0],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_6;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn near_and_far_planes_map_to_unit_depth_bounds() {
        let projection = perspective_fov_lh(FRAC_PI_6, 2.0, 1.0, 1000.0);

        let near = projection.project_point(&Vector3::new(0.0, 0.0, 1.0));
        let far = projection.project_point(&Vector3::new(0.0, 0.0, 1000.0));

        assert_abs_diff_eq!(near.z(), -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(far.z(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn field_of_view_edges_map_to_unit_bounds() {
        let half_fov = 0.5 * FRAC_PI_6;
        let aspect_ratio = 2.0;
        let projection = perspective_fov_lh(FRAC_PI_6, aspect_ratio, 1.0, 100.0);

        let depth = 10.0;
        let top = projection.project_point(&Vector3::new(0.0, depth * half_fov.tan(), depth));
        let right = projection.project_point(&Vector3::new(
            aspect_ratio * depth * half_fov.tan(),
            0.0,
            depth,
        ));

        assert_abs_diff_eq!(top.y(), 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(right.x(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn projection_matrix_uses_depth_as_w() {
        let projection = PerspectiveProjection::new(FRAC_PI_6, 2.0, 1.0, 1000.0).matrix();
        assert!(!projection.is_affine());
        let clip = projection.transform(&Vector3::new(0.5, 0.5, 7.0).extended(1.0));
        assert_abs_diff_eq!(clip.w(), 7.0);
    }
}
