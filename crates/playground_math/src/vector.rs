//! Vectors.

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};

/// A 3-dimensional vector representing a position, a direction or a set of
/// per-axis scale factors.
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct Vector3 {
    x: f32,
    y: f32,
    z: f32,
}

/// A 4-dimensional vector, used as a homogeneous row vector when applying a
/// [`Matrix4`](crate::Matrix4).
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct Vector4 {
    x: f32,
    y: f32,
    z: f32,
    w: f32,
}

impl Vector3 {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Creates a vector with all ones.
    #[inline]
    pub const fn ones() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Creates a vector from the given array of components.
    #[inline]
    pub const fn from_array([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }

    /// The x-component of the vector.
    #[inline]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// The y-component of the vector.
    #[inline]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// The z-component of the vector.
    #[inline]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Returns the components as an array.
    #[inline]
    pub const fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Computes the dot product of this vector with another.
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the Euclidean length of the vector.
    #[inline]
    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Converts the vector to a homogeneous [`Vector4`] with the given `w`
    /// component. Use `w = 1` for points and `w = 0` for directions.
    #[inline]
    pub const fn extended(&self, w: f32) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(components: [f32; 3]) -> Self {
        Self::from_array(components)
    }
}

impl_binop!(Add, add, Vector3, Vector3, Vector3, |a, b| {
    Vector3::new(a.x + b.x, a.y + b.y, a.z + b.z)
});

impl_binop!(Sub, sub, Vector3, Vector3, Vector3, |a, b| {
    Vector3::new(a.x - b.x, a.y - b.y, a.z - b.z)
});

impl_binop!(Mul, mul, Vector3, f32, Vector3, |a, b| {
    Vector3::new(a.x * b, a.y * b, a.z * b)
});

impl_binop!(Mul, mul, f32, Vector3, Vector3, |a, b| { b * *a });

impl_unary_op!(Neg, neg, Vector3, Vector3, |val| {
    Vector3::new(-val.x, -val.y, -val.z)
});

impl_abs_diff_eq!(Vector3, |a, b, epsilon| {
    AbsDiffEq::abs_diff_eq(&a.x, &b.x, epsilon)
        && AbsDiffEq::abs_diff_eq(&a.y, &b.y, epsilon)
        && AbsDiffEq::abs_diff_eq(&a.z, &b.z, epsilon)
});

impl_relative_eq!(Vector3, |a, b, epsilon, max_relative| {
    RelativeEq::relative_eq(&a.x, &b.x, epsilon, max_relative)
        && RelativeEq::relative_eq(&a.y, &b.y, epsilon, max_relative)
        && RelativeEq::relative_eq(&a.z, &b.z, epsilon, max_relative)
});

impl Vector4 {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a vector with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Creates a vector from the given array of components.
    #[inline]
    pub const fn from_array([x, y, z, w]: [f32; 4]) -> Self {
        Self::new(x, y, z, w)
    }

    /// The x-component of the vector.
    #[inline]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// The y-component of the vector.
    #[inline]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// The z-component of the vector.
    #[inline]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// The w-component of the vector.
    #[inline]
    pub const fn w(&self) -> f32 {
        self.w
    }

    /// Returns the components as an array.
    #[inline]
    pub const fn to_array(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Drops the w-component.
    #[inline]
    pub const fn truncated(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<[f32; 4]> for Vector4 {
    fn from(components: [f32; 4]) -> Self {
        Self::from_array(components)
    }
}

impl_abs_diff_eq!(Vector4, |a, b, epsilon| {
    AbsDiffEq::abs_diff_eq(&a.x, &b.x, epsilon)
        && AbsDiffEq::abs_diff_eq(&a.y, &b.y, epsilon)
        && AbsDiffEq::abs_diff_eq(&a.z, &b.z, epsilon)
        && AbsDiffEq::abs_diff_eq(&a.w, &b.w, epsilon)
});

impl_relative_eq!(Vector4, |a, b, epsilon, max_relative| {
    RelativeEq::relative_eq(&a.x, &b.x, epsilon, max_relative)
        && RelativeEq::relative_eq(&a.y, &b.y, epsilon, max_relative)
        && RelativeEq::relative_eq(&a.z, &b.z, epsilon, max_relative)
        && RelativeEq::relative_eq(&a.w, &b.w, epsilon, max_relative)
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn creating_vector3_from_array_preserves_component_order() {
        let v = Vector3::from_array([1.0, 2.0, 3.0]);
        assert_eq!(v.x(), 1.0);
        assert_eq!(v.y(), 2.0);
        assert_eq!(v.z(), 3.0);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn vector3_arithmetic_works() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, -1.0, 0.5);

        assert_eq!(a + b, Vector3::new(5.0, 1.0, 3.5));
        assert_eq!(&a - &b, Vector3::new(-3.0, 3.0, 2.5));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn vector3_norm_is_euclidean_length() {
        assert_abs_diff_eq!(Vector3::new(3.0, 4.0, 12.0).norm(), 13.0);
    }

    #[test]
    fn extending_and_truncating_round_trips() {
        let v = Vector3::new(1.0, -2.0, 3.0);
        let h = v.extended(1.0);
        assert_eq!(h.w(), 1.0);
        assert_eq!(h.truncated(), v);
    }
}
