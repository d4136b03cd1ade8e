//! Core triangle mesh type.
//!
//! The solver itself never owns vertex buffers: it borrows the caller's
//! position slice per call. `TriangleMesh` is the convenience container
//! the benchmark harness, the CLI and tests use to carry a mesh around
//! and to load one from JSON.

use serde::{Deserialize, Serialize};
use weft_math::Vec3;
use weft_types::{WeftError, WeftResult};

use crate::topology;

/// A triangle mesh: positions plus a flat index buffer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,

    /// Triangle indices — each triangle is [v0, v1, v2].
    /// Stored flat: `[t0v0, t0v1, t0v2, t1v0, t1v1, t1v2, ...]`
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Creates a mesh from positions and a flat index buffer.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity * 3),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - Positions are non-empty and finite
    /// - Index count is a multiple of 3 and every index is in range
    /// - No degenerate triangles (repeated vertex indices)
    pub fn validate(&self) -> WeftResult<()> {
        topology::validate_input(&self.positions, &self.indices)?;

        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            if a == b || b == c || a == c {
                return Err(WeftError::InvalidMesh(format!(
                    "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                    t, a, b, c
                )));
            }
        }

        Ok(())
    }

    /// Constructs a mesh from interleaved position data.
    ///
    /// Converts `[x0, y0, z0, x1, y1, z1, ...]` into `Vec3` positions.
    pub fn from_interleaved(positions: &[f32], indices: &[u32]) -> WeftResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(WeftError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let positions = positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();

        let mesh = Self::new(positions, indices.to_vec());
        mesh.validate()?;
        Ok(mesh)
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        }))
    }
}
