//! Affine transform building for the graphics playground labs.
//!
//! Matrices follow the row-vector convention: points are row vectors
//! multiplied from the left (`p * M`), translations sit in the last row, and
//! a product `A * B` applies `A` before `B`. See [`transform`] for the
//! rotation convention.

#[macro_use]
mod macros;

pub mod error;
pub mod matrix;
pub mod projection;
pub mod transform;
pub mod vector;

pub use error::SingularMatrixError;
pub use matrix::{Matrix3, Matrix4};
pub use projection::{PerspectiveProjection, perspective_fov_lh};
pub use transform::{
    ElementaryTransform, TransformSpec, compose, invert, multiply, rotation_x, rotation_y,
    rotation_z, scale, translation, view_from_camera,
};
pub use vector::{Vector3, Vector4};
