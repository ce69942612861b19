//! Building and composing affine transforms.
//!
//! All matrices use the row-vector convention of [`Matrix4`], so composing a
//! sequence of transforms multiplies their matrices from left to right and
//! the first transform in the sequence is the first one applied to a point.
//!
//! Rotations are right-handed: a positive angle rotates counterclockwise when
//! looking from the positive end of the rotation axis towards the origin. In
//! the row-vector convention this puts `+sin` at `(1, 2)` for rotations about
//! x, at `(2, 0)` for rotations about y and at `(0, 1)` for rotations about z.

use crate::{error::SingularMatrixError, matrix::Matrix4, vector::Vector3};

/// A single translation, scaling or axis rotation. Angles are in radians.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ElementaryTransform {
    Translation(Vector3),
    Scale(Vector3),
    RotationX(f32),
    RotationY(f32),
    RotationZ(f32),
}

/// An ordered sequence of [`ElementaryTransform`]s.
///
/// There is no canonical order: the transforms are applied in exactly the
/// order they were added.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformSpec {
    steps: Vec<ElementaryTransform>,
}

/// Creates a matrix translating by `(x, y, z)`.
#[inline]
pub const fn translation(x: f32, y: f32, z: f32) -> Matrix4 {
    Matrix4::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [x, y, z, 1.0],
    ])
}

/// Creates a matrix scaling by `x`, `y` and `z` along the respective axes.
/// Zero and negative factors are allowed.
#[inline]
pub const fn scale(x: f32, y: f32, z: f32) -> Matrix4 {
    Matrix4::from_rows([
        [x, 0.0, 0.0, 0.0],
        [0.0, y, 0.0, 0.0],
        [0.0, 0.0, z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Creates a matrix rotating by `angle` radians about the x-axis.
#[inline]
pub fn rotation_x(angle: f32) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    Matrix4::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, cos, sin, 0.0],
        [0.0, -sin, cos, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Creates a matrix rotating by `angle` radians about the y-axis.
#[inline]
pub fn rotation_y(angle: f32) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    Matrix4::from_rows([
        [cos, 0.0, -sin, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [sin, 0.0, cos, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Creates a matrix rotating by `angle` radians about the z-axis.
#[inline]
pub fn rotation_z(angle: f32) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    Matrix4::from_rows([
        [cos, sin, 0.0, 0.0],
        [-sin, cos, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Computes the matrix product `a * b`, the transform applying `a` first and
/// then `b`.
#[inline]
pub fn multiply(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    a.multiply(b)
}

/// Computes the inverse of the given matrix.
///
/// # Errors
/// Returns [`SingularMatrixError`] if the matrix has no inverse.
#[inline]
pub fn invert(matrix: &Matrix4) -> Result<Matrix4, SingularMatrixError> {
    matrix.inverted()
}

/// Computes the view matrix of a camera with the given world transform.
///
/// # Errors
/// Returns [`SingularMatrixError`] if the camera transform has no inverse.
#[inline]
pub fn view_from_camera(camera_world: &Matrix4) -> Result<Matrix4, SingularMatrixError> {
    camera_world.inverted()
}

/// Composes the given transforms into a single matrix by starting from the
/// identity and right-multiplying with each transform's matrix in turn. An
/// empty sequence gives the identity matrix.
pub fn compose<'a>(transforms: impl IntoIterator<Item = &'a ElementaryTransform>) -> Matrix4 {
    transforms
        .into_iter()
        .fold(Matrix4::identity(), |world, transform| {
            world.multiply(&transform.to_matrix())
        })
}

impl ElementaryTransform {
    /// Creates the matrix for this transform.
    pub fn to_matrix(&self) -> Matrix4 {
        match *self {
            Self::Translation(offset) => translation(offset.x(), offset.y(), offset.z()),
            Self::Scale(factors) => scale(factors.x(), factors.y(), factors.z()),
            Self::RotationX(angle) => rotation_x(angle),
            Self::RotationY(angle) => rotation_y(angle),
            Self::RotationZ(angle) => rotation_z(angle),
        }
    }

    /// Returns the transform undoing this one.
    ///
    /// # Errors
    /// Returns [`SingularMatrixError`] for a scaling with a zero factor or
    /// with a factor whose reciprocal is not a finite `f32`.
    pub fn inverse(&self) -> Result<Self, SingularMatrixError> {
        Ok(match *self {
            Self::Translation(offset) => Self::Translation(-offset),
            Self::Scale(factors) => {
                let reciprocals = factors.to_array().map(f32::recip);
                if !reciprocals.iter().all(|factor| factor.is_finite()) {
                    let [x, y, z] = factors.to_array();
                    return Err(SingularMatrixError::new(x * y * z));
                }
                Self::Scale(Vector3::from_array(reciprocals))
            }
            Self::RotationX(angle) => Self::RotationX(-angle),
            Self::RotationY(angle) => Self::RotationY(-angle),
            Self::RotationZ(angle) => Self::RotationZ(-angle),
        })
    }
}

impl TransformSpec {
    /// Creates an empty sequence, which composes to the identity.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Creates the sequence the labs use for world matrices: scaling, then
    /// rotation about z, x and y (in that order), then translation.
    pub fn world(scaling: Vector3, rotation: Vector3, offset: Vector3) -> Self {
        Self::new()
            .then_scale(scaling)
            .then_rotate_z(rotation.z())
            .then_rotate_x(rotation.x())
            .then_rotate_y(rotation.y())
            .then_translate(offset)
    }

    /// Appends the given transform to the sequence.
    #[must_use]
    pub fn then(mut self, step: ElementaryTransform) -> Self {
        self.push(step);
        self
    }

    /// Appends a translation to the sequence.
    #[must_use]
    pub fn then_translate(self, offset: Vector3) -> Self {
        self.then(ElementaryTransform::Translation(offset))
    }

    /// Appends a scaling to the sequence.
    #[must_use]
    pub fn then_scale(self, factors: Vector3) -> Self {
        self.then(ElementaryTransform::Scale(factors))
    }

    /// Appends a rotation about the x-axis to the sequence.
    #[must_use]
    pub fn then_rotate_x(self, angle: f32) -> Self {
        self.then(ElementaryTransform::RotationX(angle))
    }

    /// Appends a rotation about the y-axis to the sequence.
    #[must_use]
    pub fn then_rotate_y(self, angle: f32) -> Self {
        self.then(ElementaryTransform::RotationY(angle))
    }

    /// Appends a rotation about the z-axis to the sequence.
    #[must_use]
    pub fn then_rotate_z(self, angle: f32) -> Self {
        self.then(ElementaryTransform::RotationZ(angle))
    }

    /// Appends the given transform to the sequence in place.
    pub fn push(&mut self, step: ElementaryTransform) {
        self.steps.push(step);
    }

    /// The transforms in the order they are applied.
    pub fn steps(&self) -> &[ElementaryTransform] {
        &self.steps
    }

    /// The number of transforms in the sequence.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Composes the sequence into a single matrix. See [`compose`].
    pub fn compose(&self) -> Matrix4 {
        compose(&self.steps)
    }

    /// Returns the sequence undoing this one: the inverse of each transform,
    /// in reverse order.
    ///
    /// # Errors
    /// Returns [`SingularMatrixError`] if the sequence contains a scaling with
    /// a zero factor.
    pub fn inverse(&self) -> Result<Self, SingularMatrixError> {
        self.steps
            .iter()
            .rev()
            .map(ElementaryTransform::inverse)
            .collect()
    }
}

impl From<Vec<ElementaryTransform>> for TransformSpec {
    fn from(steps: Vec<ElementaryTransform>) -> Self {
        Self { steps }
    }
}

impl FromIterator<ElementaryTransform> for TransformSpec {
    fn from_iter<I: IntoIterator<Item = ElementaryTransform>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TransformSpec {
    type Item = &'a ElementaryTransform;
    type IntoIter = std::slice::Iter<'a, ElementaryTransform>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector4;
    use approx::{abs_diff_eq, assert_abs_diff_eq, assert_relative_eq, relative_eq};
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-6;

    prop_compose! {
        fn offset_strategy(max_coord: f32)(
            x in -max_coord..max_coord,
            y in -max_coord..max_coord,
            z in -max_coord..max_coord,
        ) -> Vector3 {
            Vector3::new(x, y, z)
        }
    }

    prop_compose! {
        fn scale_factor_strategy()(
            magnitude in 0.5_f32..2.0,
            negative in any::<bool>(),
        ) -> f32 {
            if negative { -magnitude } else { magnitude }
        }
    }

    prop_compose! {
        fn scaling_strategy()(
            x in scale_factor_strategy(),
            y in scale_factor_strategy(),
            z in scale_factor_strategy(),
        ) -> Vector3 {
            Vector3::new(x, y, z)
        }
    }

    fn angle_strategy() -> impl Strategy<Value = f32> {
        -PI..PI
    }

    fn elementary_transform_strategy() -> impl Strategy<Value = ElementaryTransform> {
        prop_oneof![
            offset_strategy(5.0).prop_map(ElementaryTransform::Translation),
            scaling_strategy().prop_map(ElementaryTransform::Scale),
            angle_strategy().prop_map(ElementaryTransform::RotationX),
            angle_strategy().prop_map(ElementaryTransform::RotationY),
            angle_strategy().prop_map(ElementaryTransform::RotationZ),
        ]
    }

    prop_compose! {
        fn transform_spec_strategy()(
            steps in prop::collection::vec(elementary_transform_strategy(), 0..4),
        ) -> TransformSpec {
            TransformSpec::from(steps)
        }
    }

    #[test]
    fn composing_nothing_gives_identity_exactly() {
        let no_steps: [ElementaryTransform; 0] = [];
        assert_eq!(compose(&no_steps), Matrix4::identity());
        assert_eq!(TransformSpec::new().compose(), Matrix4::identity());
    }

    #[test]
    fn translation_matrix_has_offset_in_last_row() {
        let matrix = compose(&[ElementaryTransform::Translation(Vector3::new(
            1.5, -2.0, 3.0,
        ))]);
        assert_eq!(matrix.translation_part(), Vector3::new(1.5, -2.0, 3.0));
        assert_eq!(matrix.linear_part(), Matrix4::identity().linear_part());
        assert_eq!(matrix.column(3), Vector4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn scale_matrix_is_diagonal() {
        let matrix = scale(2.0, -1.0, 0.0);
        assert_eq!(
            matrix,
            Matrix4::from_diagonal(&Vector4::new(2.0, -1.0, 0.0, 1.0))
        );
    }

    #[test]
    fn rotations_are_right_handed() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        let z = Vector3::new(0.0, 0.0, 1.0);

        assert_abs_diff_eq!(rotation_x(FRAC_PI_2).transform_vector(&y), z, epsilon = EPSILON);
        assert_abs_diff_eq!(rotation_y(FRAC_PI_2).transform_vector(&z), x, epsilon = EPSILON);
        assert_abs_diff_eq!(rotation_z(FRAC_PI_2).transform_vector(&x), y, epsilon = EPSILON);
    }

    #[test]
    fn rotation_sign_pattern_is_consistent_across_axes() {
        let angle = 0.3_f32;
        let sin = angle.sin();
        assert_abs_diff_eq!(rotation_x(angle).element(1, 2), sin, epsilon = EPSILON);
        assert_abs_diff_eq!(rotation_x(angle).element(2, 1), -sin, epsilon = EPSILON);
        assert_abs_diff_eq!(rotation_y(angle).element(2, 0), sin, epsilon = EPSILON);
        assert_abs_diff_eq!(rotation_y(angle).element(0, 2), -sin, epsilon = EPSILON);
        assert_abs_diff_eq!(rotation_z(angle).element(0, 1), sin, epsilon = EPSILON);
        assert_abs_diff_eq!(rotation_z(angle).element(1, 0), -sin, epsilon = EPSILON);
    }

    #[test]
    fn rotations_agree_with_glam() {
        let angle = 0.7_f32;
        assert_abs_diff_eq!(
            rotation_x(angle),
            Matrix4::from_glam(&glam::Mat4::from_rotation_x(angle)),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            rotation_y(angle),
            Matrix4::from_glam(&glam::Mat4::from_rotation_y(angle)),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            rotation_z(angle),
            Matrix4::from_glam(&glam::Mat4::from_rotation_z(angle)),
            epsilon = EPSILON
        );
    }

    #[test]
    fn composed_scale_rotation_translation_maps_point_as_expected() {
        let world = compose(&[
            ElementaryTransform::Scale(Vector3::new(2.0, 1.0, 1.0)),
            ElementaryTransform::RotationZ(0.0),
            ElementaryTransform::Translation(Vector3::new(0.0, 3.0, 0.0)),
        ]);
        let transformed = Vector4::new(1.0, 0.0, 0.0, 1.0) * world;
        assert_abs_diff_eq!(
            transformed,
            Vector4::new(2.0, 3.0, 0.0, 1.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn multiplying_pure_translations_adds_offsets() {
        let product = multiply(&translation(1.0, 0.0, 0.0), &translation(0.0, 2.0, 0.0));
        assert_eq!(product.translation_part(), Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(product, translation(1.0, 2.0, 0.0));
    }

    #[test]
    fn multiplication_is_not_commutative() {
        let a = translation(1.0, 0.0, 0.0);
        let b = rotation_z(FRAC_PI_2);
        assert!(!abs_diff_eq!(multiply(&a, &b), multiply(&b, &a), epsilon = EPSILON));
    }

    #[test]
    fn composition_order_changes_result() {
        let offset = ElementaryTransform::Translation(Vector3::new(0.0, 3.0, 0.0));
        let scaling = ElementaryTransform::Scale(Vector3::new(2.0, 2.0, 2.0));

        let scale_first = compose(&[scaling, offset]);
        let translate_first = compose(&[offset, scaling]);

        assert_eq!(scale_first.translation_part(), Vector3::new(0.0, 3.0, 0.0));
        assert_eq!(translate_first.translation_part(), Vector3::new(0.0, 6.0, 0.0));
    }

    #[test]
    fn inverting_zero_scale_fails() {
        assert!(invert(&scale(0.0, 1.0, 1.0)).is_err());
        assert!(
            ElementaryTransform::Scale(Vector3::new(0.0, 1.0, 1.0))
                .inverse()
                .is_err()
        );
    }

    #[test]
    fn inverting_scales_of_extreme_magnitude_gives_finite_inverse() {
        let tiny = invert(&scale(1e-20, 1e-20, 1.0)).unwrap();
        assert_relative_eq!(tiny, scale(1e20, 1e20, 1.0), max_relative = 1e-5);

        let huge = invert(&scale(1e13, 1e13, 1e13)).unwrap();
        assert_relative_eq!(huge, scale(1e-13, 1e-13, 1e-13), max_relative = 1e-5);
    }

    #[test]
    fn inverting_scale_with_unrepresentable_reciprocal_fails() {
        assert!(invert(&scale(1e-39, 1.0, 1.0)).is_err());
        assert!(
            ElementaryTransform::Scale(Vector3::new(1e-39, 1.0, 1.0))
                .inverse()
                .is_err()
        );
    }

    #[test]
    fn view_matrix_moves_camera_position_to_origin() {
        let camera_position = Vector3::new(0.0, 0.0, -20.0);
        let camera_world = translation(camera_position.x(), camera_position.y(), camera_position.z());
        let view = view_from_camera(&camera_world).unwrap();

        assert_abs_diff_eq!(
            view.transform_point(&camera_position),
            Vector3::zeros(),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            view.translation_part(),
            Vector3::new(0.0, 0.0, 20.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn world_spec_uses_scale_z_x_y_translation_order() {
        let spec = TransformSpec::world(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.1, 0.2, 0.3),
            Vector3::new(4.0, 5.0, 6.0),
        );
        assert_eq!(
            spec.steps(),
            &[
                ElementaryTransform::Scale(Vector3::new(1.0, 2.0, 3.0)),
                ElementaryTransform::RotationZ(0.3),
                ElementaryTransform::RotationX(0.1),
                ElementaryTransform::RotationY(0.2),
                ElementaryTransform::Translation(Vector3::new(4.0, 5.0, 6.0)),
            ]
        );
        assert_eq!(spec.len(), 5);
    }

    #[test]
    fn collecting_steps_preserves_order() {
        let steps = [
            ElementaryTransform::RotationY(1.0),
            ElementaryTransform::Translation(Vector3::ones()),
        ];
        let spec: TransformSpec = steps.iter().copied().collect();
        assert_eq!(spec.steps(), &steps);
        assert_eq!((&spec).into_iter().count(), 2);
        assert!(!spec.is_empty());
    }

    proptest! {
        #[test]
        fn translation_component_matches_offset(offset in offset_strategy(1e3)) {
            let matrix = compose(&[ElementaryTransform::Translation(offset)]);
            prop_assert_eq!(matrix.translation_part(), offset);
            prop_assert_eq!(matrix.linear_part(), Matrix4::identity().linear_part());
        }

        #[test]
        fn rotating_back_gives_identity(angle in -10.0_f32..10.0) {
            let steps = [
                ElementaryTransform::RotationX(angle),
                ElementaryTransform::RotationX(-angle),
            ];
            prop_assert!(abs_diff_eq!(compose(&steps), Matrix4::identity(), epsilon = 1e-5));
            prop_assert!(abs_diff_eq!(
                multiply(&rotation_y(angle), &rotation_y(-angle)),
                Matrix4::identity(),
                epsilon = 1e-5
            ));
            prop_assert!(abs_diff_eq!(
                multiply(&rotation_z(angle), &rotation_z(-angle)),
                Matrix4::identity(),
                epsilon = 1e-5
            ));
        }

        #[test]
        fn multiplication_is_associative(
            a in transform_spec_strategy(),
            b in transform_spec_strategy(),
            c in transform_spec_strategy(),
        ) {
            let (a, b, c) = (a.compose(), b.compose(), c.compose());
            let left = multiply(&multiply(&a, &b), &c);
            let right = multiply(&a, &multiply(&b, &c));
            prop_assert!(relative_eq!(left, right, epsilon = 1e-2, max_relative = 1e-3));
        }

        #[test]
        fn inverting_twice_gives_original(spec in transform_spec_strategy()) {
            let matrix = spec.compose();
            let twice_inverted = invert(&invert(&matrix).unwrap()).unwrap();
            prop_assert!(relative_eq!(twice_inverted, matrix, epsilon = 1e-2, max_relative = 1e-3));
        }

        #[test]
        fn inverse_spec_composes_to_inverse_matrix(spec in transform_spec_strategy()) {
            let inverse_from_spec = spec.inverse().unwrap().compose();
            let inverse_from_matrix = invert(&spec.compose()).unwrap();
            prop_assert!(relative_eq!(
                inverse_from_spec,
                inverse_from_matrix,
                epsilon = 1e-2,
                max_relative = 1e-3
            ));
        }
    }
}
