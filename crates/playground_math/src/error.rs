//! Errors.

use thiserror::Error;

/// Returned when inverting a matrix whose determinant is zero, or close enough
/// to zero relative to the magnitude of its rows that the inverse would be
/// meaningless.
#[derive(Error, Clone, Copy, Debug, PartialEq)]
#[error("Matrix is singular (determinant {determinant:e}) and has no inverse")]
pub struct SingularMatrixError {
    determinant: f32,
}

impl SingularMatrixError {
    pub(crate) const fn new(determinant: f32) -> Self {
        Self { determinant }
    }

    /// The determinant of the matrix that failed to invert.
    pub const fn determinant(&self) -> f32 {
        self.determinant
    }
}
