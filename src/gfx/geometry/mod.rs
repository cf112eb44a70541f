//! # Procedural Geometry Generation
//!
//! Every shape in the family and robot scenes is generated here; the crate
//! never ships mesh files for its own props and figures.
//!
//! ## Supported Primitives
//!
//! - **Sphere / sphere cap**: UV sphere, optionally cut off below a polar angle (short hair)
//! - **Cylinder / cone**: Y-aligned frustum with independent top and bottom radii
//! - **Box**: axis-aligned cuboid with per-face normals
//! - **Plane / circle**: flat shapes in the XY plane facing +Z
//! - **Torus**: ring in the XY plane (glasses)
//!
//! All shapes are centred on the origin with Y pointing up.
//!
//! ## Usage
//!
//! ```rust
//! use hearth::gfx::geometry::{generate_cylinder, generate_sphere};
//!
//! let head = generate_sphere(0.25, 32, 16);
//! let torso = generate_cylinder(0.3, 0.4, 0.8, 32);
//! assert!(head.triangle_count() > 0 && torso.triangle_count() > 0);
//! ```

pub mod primitives;
pub mod shape;

pub use primitives::*;
pub use shape::{Shape, ShapeKey};

use crate::gfx::vertex::Vertex3D;

/// Generated geometry ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Optional per-vertex tint; empty means white
    pub colors: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Replace the per-vertex tint. `colors` must have one entry per vertex.
    pub fn with_vertex_colors(mut self, colors: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(colors.len(), self.vertices.len());
        self.colors = colors;
        self
    }

    /// Axis-aligned bounds as `(min, max)`; a degenerate box at the origin when empty.
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let Some(first) = self.vertices.first() else {
            return ([0.0; 3], [0.0; 3]);
        };

        let mut min = *first;
        let mut max = *first;
        for v in self.vertices.iter().skip(1) {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        (min, max)
    }

    /// Interleave into the vertex format consumed by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                color: self.colors.get(i).copied().unwrap_or([1.0, 1.0, 1.0]),
            })
            .collect()
    }

    /// Recompute smooth vertex normals by averaging adjacent face normals.
    ///
    /// Used for imported meshes that ship without normals.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![[0.0f32; 3]; self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let (v0, v1, v2) = (self.vertices[i0], self.vertices[i1], self.vertices[i2]);

            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            let face_normal = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];

            for &index in &[i0, i1, i2] {
                for axis in 0..3 {
                    normals[index][axis] += face_normal[axis];
                }
            }
        }

        for normal in normals.iter_mut() {
            let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
            if length > 0.0 {
                for component in normal.iter_mut() {
                    *component /= length;
                }
            } else {
                *normal = [0.0, 1.0, 0.0];
            }
        }

        self.normals = normals;
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
