//! # weft-mesh
//!
//! Mesh-side data for the Weft cloth solver.
//!
//! ## Key Types
//!
//! - [`TriangleMesh`] — Positions plus a flat triangle index buffer.
//! - [`Topology`] — Unique stretch edges, bend pairs (opposite vertices of
//!   interior edges), rest lengths and vertex-disjoint batches.
//! - [`ConstraintColoring`] — Greedy first-fit batching of vertex pairs.
//! - Procedural generators for test and benchmark meshes (quad grids).

pub mod coloring;
pub mod generators;
pub mod mesh;
pub mod topology;

pub use coloring::{Batch, ConstraintColoring};
pub use mesh::TriangleMesh;
pub use topology::Topology;
