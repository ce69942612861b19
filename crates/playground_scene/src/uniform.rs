//! Shader uniform values.

use playground_math::{Matrix3, Matrix4, Vector3};
use std::{collections::BTreeMap, fmt};

/// A value that can be assigned to a named shader uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Matrix4(Matrix4),
    Matrix3(Matrix3),
    Vector3(Vector3),
    Float(f32),
}

/// Receiver of uniform assignments. The rendering engine's shader materials
/// implement this; matrices are consumed by value.
pub trait UniformSink {
    fn set_matrix4(&mut self, name: &str, value: Matrix4);

    fn set_matrix3(&mut self, name: &str, value: Matrix3);

    fn set_vector3(&mut self, name: &str, value: Vector3);

    fn set_float(&mut self, name: &str, value: f32);
}

/// A [`UniformSink`] that records the latest value of every uniform, ordered
/// by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformTable {
    values: BTreeMap<String, UniformValue>,
}

impl UniformTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value of the uniform with the given name, if it
    /// has been set.
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    /// Returns the 4x4 matrix assigned to the given uniform, if the uniform
    /// has been set to a 4x4 matrix.
    pub fn matrix4(&self, name: &str) -> Option<Matrix4> {
        match self.get(name)? {
            UniformValue::Matrix4(matrix) => Some(*matrix),
            _ => None,
        }
    }

    /// Returns the 3x3 matrix assigned to the given uniform, if the uniform
    /// has been set to a 3x3 matrix.
    pub fn matrix3(&self, name: &str) -> Option<Matrix3> {
        match self.get(name)? {
            UniformValue::Matrix3(matrix) => Some(*matrix),
            _ => None,
        }
    }

    /// Returns the vector assigned to the given uniform, if the uniform has
    /// been set to a vector.
    pub fn vector3(&self, name: &str) -> Option<Vector3> {
        match self.get(name)? {
            UniformValue::Vector3(vector) => Some(*vector),
            _ => None,
        }
    }

    /// Returns the scalar assigned to the given uniform, if the uniform has
    /// been set to a scalar.
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the uniforms in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    fn set(&mut self, name: &str, value: UniformValue) {
        log::trace!("Setting uniform {name}");
        self.values.insert(name.to_owned(), value);
    }
}

impl UniformSink for UniformTable {
    fn set_matrix4(&mut self, name: &str, value: Matrix4) {
        self.set(name, UniformValue::Matrix4(value));
    }

    fn set_matrix3(&mut self, name: &str, value: Matrix3) {
        self.set(name, UniformValue::Matrix3(value));
    }

    fn set_vector3(&mut self, name: &str, value: Vector3) {
        self.set(name, UniformValue::Vector3(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set(name, UniformValue::Float(value));
    }
}

impl fmt::Display for UniformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matrix4(matrix) => write!(f, "mat4\n{matrix}"),
            Self::Matrix3(matrix) => {
                write!(f, "mat3")?;
                for row in matrix.rows() {
                    write!(f, "\n[{:>10.4} {:>10.4} {:>10.4}]", row[0], row[1], row[2])?;
                }
                Ok(())
            }
            Self::Vector3(vector) => write!(
                f,
                "vec3 ({:.4}, {:.4}, {:.4})",
                vector.x(),
                vector.y(),
                vector.z()
            ),
            Self::Float(value) => write!(f, "float {value:.4}"),
        }
    }
}

impl fmt::Display for UniformTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
