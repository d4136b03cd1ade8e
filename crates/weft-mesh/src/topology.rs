//! Constraint topology.
//!
//! Derives the fixed constraint graph of a cloth mesh from its triangle
//! index buffer:
//!
//! - **Stretch edges** — every unique undirected triangle edge.
//! - **Bend pairs** — for each interior edge (two incident triangles), the
//!   two "wing" vertices opposite it. Bending is distance-based: the pair
//!   keeps its rest distance.
//!
//! ```text
//!        wa
//!       / \
//!      /   \
//!    v0 ─── v1      bend pair = (wa, wb)
//!      \   /
//!       \ /
//!        wb
//! ```
//!
//! Edge order is first appearance in the index buffer, so the build is
//! deterministic for identical input. The vertex pairs never change after
//! the build.

use std::collections::HashMap;

use weft_math::Vec3;
use weft_types::{WeftError, WeftResult};

use crate::coloring::{Batch, ConstraintColoring};

/// An interior (non-boundary) edge with its two wing vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteriorEdge {
    /// Index of vertex A of the shared edge.
    pub v0: u32,
    /// Index of vertex B of the shared edge.
    pub v1: u32,
    /// The wing vertex of the first incident triangle.
    pub wing_a: u32,
    /// The wing vertex of the second incident triangle.
    pub wing_b: u32,
}

/// Precomputed constraint topology for a triangle mesh.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Number of vertices the topology was built for.
    pub vertex_count: usize,

    /// Unique edges as `[v_min, v_max]` pairs, in first-appearance order.
    pub edges: Vec<[u32; 2]>,
    /// Rest length per edge.
    pub edge_rest: Vec<f32>,

    /// Interior edges with both wing vertices.
    pub interior_edges: Vec<InteriorEdge>,
    /// Bend pairs `[wing_a, wing_b]`, one per interior edge.
    pub bends: Vec<[u32; 2]>,
    /// Rest distance per bend pair.
    pub bend_rest: Vec<f32>,

    /// Vertex-disjoint batches of edge indices.
    pub edge_batches: Vec<Batch>,
    /// Vertex-disjoint batches of bend indices.
    pub bend_batches: Vec<Batch>,

    /// Number of boundary edges (exactly one incident triangle).
    pub boundary_edge_count: usize,
}

/// Per-edge accumulation while scanning triangles.
struct EdgeSlot {
    wings: [u32; 2],
    incident: u32,
}

/// Validate solver input: non-empty finite positions and an index buffer
/// that is a multiple of 3 with every index in `[0, positions.len())`.
pub fn validate_input(positions: &[Vec3], triangles: &[u32]) -> WeftResult<()> {
    if positions.is_empty() {
        return Err(WeftError::InvalidArgument("positions must not be empty".into()));
    }
    if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
        return Err(WeftError::InvalidArgument(format!(
            "position {} is not finite",
            i
        )));
    }
    if triangles.len() % 3 != 0 {
        return Err(WeftError::InvalidArgument(format!(
            "triangle index count {} is not a multiple of 3",
            triangles.len()
        )));
    }
    if let Some(&idx) = triangles.iter().find(|&&idx| idx as usize >= positions.len()) {
        return Err(WeftError::IndexOutOfRange {
            what: "triangle",
            index: idx as usize,
            len: positions.len(),
        });
    }
    Ok(())
}

impl Topology {
    /// Build topology from positions and a flat triangle index buffer.
    ///
    /// Rest lengths are measured on `positions`. Triangles with a repeated
    /// vertex index contribute nothing.
    pub fn build(positions: &[Vec3], triangles: &[u32]) -> WeftResult<Self> {
        validate_input(positions, triangles)?;
        let vertex_count = positions.len();

        // Key: (min_vertex, max_vertex) → index into `edges`.
        let mut edge_index: HashMap<(u32, u32), usize> = HashMap::new();
        let mut edges: Vec<[u32; 2]> = Vec::new();
        let mut slots: Vec<EdgeSlot> = Vec::new();

        for tri in triangles.chunks_exact(3) {
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            if a == b || b == c || a == c {
                continue;
            }

            for (v0, v1, wing) in [(a, b, c), (b, c, a), (c, a, b)] {
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                let ei = *edge_index.entry(key).or_insert_with(|| {
                    edges.push([key.0, key.1]);
                    slots.push(EdgeSlot {
                        wings: [u32::MAX; 2],
                        incident: 0,
                    });
                    edges.len() - 1
                });

                let slot = &mut slots[ei];
                if (slot.incident as usize) < 2 {
                    slot.wings[slot.incident as usize] = wing;
                }
                slot.incident += 1;
            }
        }

        let mut interior_edges = Vec::new();
        let mut boundary_edge_count = 0;
        for (edge, slot) in edges.iter().zip(&slots) {
            match slot.incident {
                1 => boundary_edge_count += 1,
                // Non-manifold edges keep the first two wings.
                _ if slot.wings[0] != slot.wings[1] => interior_edges.push(InteriorEdge {
                    v0: edge[0],
                    v1: edge[1],
                    wing_a: slot.wings[0],
                    wing_b: slot.wings[1],
                }),
                _ => {}
            }
        }

        let bends: Vec<[u32; 2]> = interior_edges
            .iter()
            .map(|e| [e.wing_a, e.wing_b])
            .collect();

        let edge_rest = pair_lengths(&edges, positions);
        let bend_rest = pair_lengths(&bends, positions);
        let edge_batches = ConstraintColoring::color_pairs(&edges, vertex_count);
        let bend_batches = ConstraintColoring::color_pairs(&bends, vertex_count);

        Ok(Self {
            vertex_count,
            edges,
            edge_rest,
            interior_edges,
            bends,
            bend_rest,
            edge_batches,
            bend_batches,
            boundary_edge_count,
        })
    }

    /// Returns true if the mesh is closed (no boundary edges).
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count == 0
    }
}

fn pair_lengths(pairs: &[[u32; 2]], positions: &[Vec3]) -> Vec<f32> {
    pairs
        .iter()
        .map(|&[a, b]| positions[a as usize].distance(positions[b as usize]))
        .collect()
}
