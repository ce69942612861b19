//! Hand-built triangle meshes.
//!
//! The labs that do not use the engine's built-in shapes assemble their vertex
//! and index buffers by hand. [`MeshData`] holds such buffers and can print
//! them as Wavefront OBJ text.

use playground_math::{Matrix4, Vector3};
use std::{f32::consts::TAU, fmt};

/// Vertex positions, optional texture coordinates and triangle indices of a
/// mesh. Every consecutive triple of indices forms a triangle.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    positions: Vec<Vector3>,
    texture_coords: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

/// The corners of the lab08 pyramid: the apex followed by the four base
/// corners.
const PYRAMID_CORNERS: [Vector3; 5] = [
    Vector3::new(0.0, 1.5, 0.0),
    Vector3::new(1.0, 0.0, 1.0),
    Vector3::new(-1.0, 0.0, 1.0),
    Vector3::new(-1.0, 0.0, -1.0),
    Vector3::new(1.0, 0.0, -1.0),
];

impl MeshData {
    /// Creates a mesh from the given buffers. `texture_coords` is either
    /// empty or has one entry per position.
    ///
    /// # Panics
    /// - If the number of texture coordinates is neither zero nor the number
    ///   of positions.
    /// - If the number of indices is not a multiple of three.
    /// - If any index does not refer to a position.
    pub fn new(positions: Vec<Vector3>, texture_coords: Vec<[f32; 2]>, indices: Vec<u32>) -> Self {
        assert!(
            texture_coords.is_empty() || texture_coords.len() == positions.len(),
            "Tried to create mesh with {} texture coordinates for {} positions",
            texture_coords.len(),
            positions.len()
        );
        assert!(
            indices.len() % 3 == 0,
            "Tried to create mesh with incomplete triangle"
        );
        assert!(
            indices
                .iter()
                .all(|&index| (index as usize) < positions.len()),
            "Tried to create mesh with index out of bounds"
        );
        Self {
            positions,
            texture_coords,
            indices,
        }
    }

    /// Creates a flat circle of the given radius around `center`, parallel to
    /// the xy-plane, as a fan of `n_segments` triangles.
    ///
    /// Vertex 0 is the center. Vertex `i` for `1 <= i <= n_segments` lies on
    /// the rim at the angle `i * 2π / n_segments` from the x-axis. Triangle
    /// `i` connects the center with rim vertices `i` and `i + 1`, and the last
    /// triangle wraps around to rim vertex 1.
    ///
    /// # Panics
    /// - If `n_segments` is smaller than 3.
    /// - If `radius` is negative.
    pub fn create_circle_fan(n_segments: u32, radius: f32, center: Vector3) -> Self {
        assert!(
            n_segments >= 3,
            "Tried to create circle mesh with fewer than three segments"
        );
        assert!(
            radius >= 0.0,
            "Tried to create circle mesh with negative radius"
        );

        let angle_between_vertices = TAU / n_segments as f32;

        let mut positions = Vec::with_capacity(n_segments as usize + 1);
        positions.push(center);
        for i in 1..=n_segments {
            let (sin, cos) = (angle_between_vertices * i as f32).sin_cos();
            positions.push(center + Vector3::new(cos, sin, 0.0) * radius);
        }

        let mut indices = Vec::with_capacity(3 * n_segments as usize);
        for i in 1..n_segments {
            indices.extend_from_slice(&[0, i, i + 1]);
        }
        indices.extend_from_slice(&[0, n_segments, 1]);

        Self::new(positions, Vec::new(), indices)
    }

    /// Creates the textured square pyramid of lab08, with its apex 1.5 above
    /// the center of a 2 x 2 base in the xz-plane.
    ///
    /// The base corners are repeated so that each side face can map the full
    /// width of the texture and the base can map the full texture.
    pub fn create_textured_pyramid() -> Self {
        let [apex, back_right, back_left, front_left, front_right] = PYRAMID_CORNERS;

        let positions = vec![
            apex,
            // Base corners at the left edge of the texture
            back_right,
            back_left,
            front_left,
            front_right,
            // Base corners at the right edge of the texture
            back_right,
            back_left,
            front_left,
            front_right,
            // Base
            back_left,
            back_right,
            front_right,
            front_left,
        ];

        let texture_coords = vec![
            [0.5, 1.0],
            [0.0, 0.0],
            [0.0, 0.0],
            [0.0, 0.0],
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 0.0],
            [1.0, 0.0],
            [1.0, 0.0],
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ];

        let indices = vec![
            // Sides
            1, 6, 0, //
            2, 7, 0, //
            3, 8, 0, //
            4, 5, 0, //
            // Base
            9, 10, 12, //
            10, 11, 12,
        ];

        Self::new(positions, texture_coords, indices)
    }

    pub fn n_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn n_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> &[Vector3] {
        &self.positions
    }

    /// The texture coordinates of each vertex, or an empty slice if the mesh
    /// is not textured.
    pub fn texture_coords(&self) -> &[[f32; 2]] {
        &self.texture_coords
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn has_texture_coords(&self) -> bool {
        !self.texture_coords.is_empty()
    }

    /// Returns an iterator over the vertex indices of each triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|triangle| [triangle[0], triangle[1], triangle[2]])
    }

    /// Returns a copy of the mesh with every position transformed by the
    /// given affine matrix.
    pub fn transformed(&self, transform: &Matrix4) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .map(|position| transform.transform_point(position))
                .collect(),
            texture_coords: self.texture_coords.clone(),
            indices: self.indices.clone(),
        }
    }
}

/// Writes the mesh as Wavefront OBJ text, with one-based indices.
impl fmt::Display for MeshData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for position in &self.positions {
            writeln!(f, "v {} {} {}", position.x(), position.y(), position.z())?;
        }
        for [u, v] in &self.texture_coords {
            writeln!(f, "vt {u} {v}")?;
        }
        for triangle in self.triangles() {
            let [a, b, c] = triangle.map(|index| index + 1);
            if self.has_texture_coords() {
                writeln!(f, "f {a}/{a} {b}/{b} {c}/{c}")?;
            } else {
                writeln!(f, "f {a} {b} {c}")?;
            }
        }
        Ok(())
    }
}
