//! Matrices.

use crate::{
    error::SingularMatrixError,
    vector::{Vector3, Vector4},
};
use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// A matrix is considered singular when the magnitude of its determinant,
/// computed after scaling every row to unit length, is at most this value.
/// The scaled determinant lies in `[-1, 1]` (Hadamard's inequality), so the
/// test does not depend on the overall scale of the matrix.
const SINGULARITY_TOLERANCE: f64 = 1e-6;

/// A 4x4 matrix representing an affine transform (or a projection).
///
/// Matrices are row-major and follow the row-vector convention: a point `p`
/// is transformed as `p * M`, the translation lives in the last row, and the
/// product `A * B` applies `A` first and then `B`. The 16 elements are laid
/// out in memory exactly like a column-major `mat4` uniform of the same
/// transform, so the matrix can be uploaded to a shader without reordering.
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct Matrix4 {
    rows: [[f32; 4]; 4],
}

/// A 3x3 matrix, row-major like [`Matrix4`].
///
/// Mainly used for the normal matrix of a world transform.
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct Matrix3 {
    rows: [[f32; 3]; 3],
}

impl Matrix4 {
    /// Creates the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a matrix with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::from_rows([[0.0; 4]; 4])
    }

    /// Creates a diagonal matrix with the given vector as the diagonal.
    #[inline]
    pub const fn from_diagonal(diagonal: &Vector4) -> Self {
        Self::from_rows([
            [diagonal.x(), 0.0, 0.0, 0.0],
            [0.0, diagonal.y(), 0.0, 0.0],
            [0.0, 0.0, diagonal.z(), 0.0],
            [0.0, 0.0, 0.0, diagonal.w()],
        ])
    }

    /// Creates a matrix with the given rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Creates a matrix from 16 elements given in row-major order.
    #[inline]
    pub fn from_array(elements: [f32; 16]) -> Self {
        Self::from_rows(bytemuck::cast(elements))
    }

    /// Returns the 16 elements in row-major order.
    #[inline]
    pub fn to_array(&self) -> [f32; 16] {
        bytemuck::cast(self.rows)
    }

    /// The rows of the matrix.
    #[inline]
    pub const fn rows(&self) -> &[[f32; 4]; 4] {
        &self.rows
    }

    /// Returns row `i` of the matrix.
    ///
    /// # Panics
    /// If `i` is not smaller than 4.
    #[inline]
    pub const fn row(&self, i: usize) -> Vector4 {
        Vector4::from_array(self.rows[i])
    }

    /// Returns column `j` of the matrix.
    ///
    /// # Panics
    /// If `j` is not smaller than 4.
    #[inline]
    pub const fn column(&self, j: usize) -> Vector4 {
        Vector4::new(
            self.rows[0][j],
            self.rows[1][j],
            self.rows[2][j],
            self.rows[3][j],
        )
    }

    /// Returns the element at row `i` and column `j`.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub const fn element(&self, i: usize, j: usize) -> f32 {
        self.rows[i][j]
    }

    /// Whether the last column is `[0, 0, 0, 1]`, meaning the matrix
    /// represents an affine transform.
    #[inline]
    pub fn is_affine(&self) -> bool {
        self.column(3) == Vector4::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Assuming this matrix represents an affine transform, returns the
    /// translation it applies.
    #[inline]
    pub const fn translation_part(&self) -> Vector3 {
        let t = &self.rows[3];
        Vector3::new(t[0], t[1], t[2])
    }

    /// Assuming this matrix represents an affine transform, returns the upper
    /// left 3x3 matrix representing the linear (rotation and scaling) part of
    /// the transform.
    #[inline]
    pub const fn linear_part(&self) -> Matrix3 {
        let m = &self.rows;
        Matrix3::from_rows([
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ])
    }

    /// Computes the matrix product `self * rhs`.
    #[inline]
    pub fn multiply(&self, rhs: &Self) -> Self {
        // In glam's column-vector convention the first transform goes last
        Self::from_glam(&(rhs.to_glam() * self.to_glam()))
    }

    /// Returns the transpose of this matrix.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self::from_glam(&self.to_glam().transpose())
    }

    /// Computes the determinant of this matrix.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.to_glam().determinant()
    }

    /// Returns the inverse of this matrix.
    ///
    /// # Errors
    /// Returns [`SingularMatrixError`] if the matrix is singular or too close
    /// to singular for the inverse to be meaningful.
    pub fn inverted(&self) -> Result<Self, SingularMatrixError> {
        let matrix = self.to_glam().as_dmat4();
        let determinant = matrix.determinant();
        // The translation row does not contribute to the determinant of an
        // affine matrix, so only the linear part is tested
        let scaled_determinant = if self.is_affine() {
            unit_rows(&self.linear_part().rows)
                .map(|rows| glam::DMat3::from_cols_array_2d(&rows).determinant())
        } else {
            unit_rows(&self.rows).map(|rows| glam::DMat4::from_cols_array_2d(&rows).determinant())
        };
        if is_singular(scaled_determinant) {
            return Err(SingularMatrixError::new(determinant as f32));
        }
        let inverse = matrix.inverse().as_mat4();
        if !inverse.is_finite() {
            return Err(SingularMatrixError::new(determinant as f32));
        }
        Ok(Self::from_glam(&inverse))
    }

    /// Assuming this matrix represents an affine transform, computes the
    /// matrix that transforms surface normals consistently with the
    /// transform, which is the inverse transpose of the linear part.
    ///
    /// # Errors
    /// Returns [`SingularMatrixError`] if the linear part is singular.
    pub fn normal_matrix(&self) -> Result<Matrix3, SingularMatrixError> {
        Ok(self.linear_part().inverted()?.transposed())
    }

    /// Applies the matrix to the given homogeneous row vector.
    #[inline]
    pub fn transform(&self, vector: &Vector4) -> Vector4 {
        let transformed = self.to_glam() * glam::Vec4::from_array(vector.to_array());
        Vector4::from_array(transformed.to_array())
    }

    /// Assuming this matrix represents an affine transform, applies the
    /// transform to the given point.
    #[inline]
    pub fn transform_point(&self, point: &Vector3) -> Vector3 {
        self.transform(&point.extended(1.0)).truncated()
    }

    /// Assuming this matrix represents an affine transform, applies the
    /// transform to the given vector. The translation part of the transform is
    /// not applied to vectors.
    #[inline]
    pub fn transform_vector(&self, vector: &Vector3) -> Vector3 {
        self.transform(&vector.extended(0.0)).truncated()
    }

    /// Assuming this matrix represents a projection, projects the given point
    /// by applying the matrix and performing perspective division.
    #[inline]
    pub fn project_point(&self, point: &Vector3) -> Vector3 {
        let projected = self.transform(&point.extended(1.0));
        projected.truncated() * projected.w().recip()
    }

    /// Returns a matrix with the given closure applied to each element.
    #[inline]
    pub fn mapped(&self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self::from_rows(self.rows.map(|row| row.map(&mut f)))
    }

    /// Converts the matrix to a [`glam::Mat4`] representing the same
    /// transform in glam's column-vector convention. The element layout in
    /// memory is unchanged.
    #[inline]
    pub fn to_glam(&self) -> glam::Mat4 {
        glam::Mat4::from_cols_array_2d(&self.rows)
    }

    /// Creates a matrix representing the same transform as the given
    /// [`glam::Mat4`].
    #[inline]
    pub fn from_glam(matrix: &glam::Mat4) -> Self {
        Self::from_rows(matrix.to_cols_array_2d())
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "[{:>10.4} {:>10.4} {:>10.4} {:>10.4}]",
                row[0], row[1], row[2], row[3]
            )?;
        }
        Ok(())
    }
}

impl_binop!(Mul, mul, Matrix4, Matrix4, Matrix4, |a, b| { a.multiply(b) });

impl_binop!(Mul, mul, Vector4, Matrix4, Vector4, |a, b| { b.transform(a) });

impl_binop!(Mul, mul, Matrix4, f32, Matrix4, |a, b| {
    a.mapped(|element| element * b)
});

impl_binop!(Add, add, Matrix4, Matrix4, Matrix4, |a, b| {
    Matrix4::from_glam(&(a.to_glam() + b.to_glam()))
});

impl_binop!(Sub, sub, Matrix4, Matrix4, Matrix4, |a, b| {
    Matrix4::from_glam(&(a.to_glam() - b.to_glam()))
});

impl_abs_diff_eq!(Matrix4, |a, b, epsilon| {
    a.rows
        .iter()
        .flatten()
        .zip(b.rows.iter().flatten())
        .all(|(a, b)| AbsDiffEq::abs_diff_eq(a, b, epsilon))
});

impl_relative_eq!(Matrix4, |a, b, epsilon, max_relative| {
    a.rows
        .iter()
        .flatten()
        .zip(b.rows.iter().flatten())
        .all(|(a, b)| RelativeEq::relative_eq(a, b, epsilon, max_relative))
});

impl Matrix3 {
    /// Creates the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Creates a matrix with the given rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    /// The rows of the matrix.
    #[inline]
    pub const fn rows(&self) -> &[[f32; 3]; 3] {
        &self.rows
    }

    /// Returns the element at row `i` and column `j`.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub const fn element(&self, i: usize, j: usize) -> f32 {
        self.rows[i][j]
    }

    /// Returns the 9 elements in row-major order.
    #[inline]
    pub fn to_array(&self) -> [f32; 9] {
        bytemuck::cast(self.rows)
    }

    /// Returns the transpose of this matrix.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self::from_glam(&self.to_glam().transpose())
    }

    /// Computes the determinant of this matrix.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.to_glam().determinant()
    }

    /// Returns the inverse of this matrix.
    ///
    /// # Errors
    /// Returns [`SingularMatrixError`] if the matrix is singular or too close
    /// to singular for the inverse to be meaningful.
    pub fn inverted(&self) -> Result<Self, SingularMatrixError> {
        let matrix = self.to_glam().as_dmat3();
        let determinant = matrix.determinant();
        let scaled_determinant =
            unit_rows(&self.rows).map(|rows| glam::DMat3::from_cols_array_2d(&rows).determinant());
        if is_singular(scaled_determinant) {
            return Err(SingularMatrixError::new(determinant as f32));
        }
        let inverse = matrix.inverse().as_mat3();
        if !inverse.is_finite() {
            return Err(SingularMatrixError::new(determinant as f32));
        }
        Ok(Self::from_glam(&inverse))
    }

    /// Applies the matrix to the given row vector.
    #[inline]
    pub fn transform_vector(&self, vector: &Vector3) -> Vector3 {
        let transformed = self.to_glam() * glam::Vec3::from_array(vector.to_array());
        Vector3::from_array(transformed.to_array())
    }

    /// Converts the matrix to a [`glam::Mat3`] representing the same
    /// transform in glam's column-vector convention.
    #[inline]
    pub fn to_glam(&self) -> glam::Mat3 {
        glam::Mat3::from_cols_array_2d(&self.rows)
    }

    /// Creates a matrix representing the same transform as the given
    /// [`glam::Mat3`].
    #[inline]
    pub fn from_glam(matrix: &glam::Mat3) -> Self {
        Self::from_rows(matrix.to_cols_array_2d())
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl_abs_diff_eq!(Matrix3, |a, b, epsilon| {
    a.rows
        .iter()
        .flatten()
        .zip(b.rows.iter().flatten())
        .all(|(a, b)| AbsDiffEq::abs_diff_eq(a, b, epsilon))
});

impl_relative_eq!(Matrix3, |a, b, epsilon, max_relative| {
    a.rows
        .iter()
        .flatten()
        .zip(b.rows.iter().flatten())
        .all(|(a, b)| RelativeEq::relative_eq(a, b, epsilon, max_relative))
});

/// Widens the rows to `f64` and scales each of them to unit length. Returns
/// `None` if any row has zero or non-finite length.
fn unit_rows<const N: usize>(rows: &[[f32; N]; N]) -> Option<[[f64; N]; N]> {
    let mut scaled = [[0.0; N]; N];
    for (scaled_row, row) in scaled.iter_mut().zip(rows) {
        let row = row.map(f64::from);
        let norm = row.iter().map(|element| element * element).sum::<f64>().sqrt();
        if !(norm > 0.0 && norm.is_finite()) {
            return None;
        }
        *scaled_row = row.map(|element| element / norm);
    }
    Some(scaled)
}

fn is_singular(scaled_determinant: Option<f64>) -> bool {
    // Written so that a NaN determinant also counts as singular
    !scaled_determinant.is_some_and(|determinant| determinant.abs() > SINGULARITY_TOLERANCE)
}
