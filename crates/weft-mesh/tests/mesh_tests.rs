//! Integration tests for weft-mesh.

use weft_math::Vec3;
use weft_mesh::generators::{lay_flat, quad_grid, top_row};
use weft_mesh::topology::Topology;
use weft_mesh::{ConstraintColoring, TriangleMesh};
use weft_types::WeftError;

fn quad_positions() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
    ]
}

const QUAD_TRIS: [u32; 6] = [0, 1, 2, 2, 1, 3];

// ─── TriangleMesh Tests ───────────────────────────────────────

#[test]
fn basic_counts() {
    let mesh = TriangleMesh::new(quad_positions(), QUAD_TRIS.to_vec());
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.triangle(1), [2, 1, 3]);
}

#[test]
fn validate_ok() {
    let mesh = TriangleMesh::new(quad_positions(), QUAD_TRIS.to_vec());
    assert!(mesh.validate().is_ok());
}

#[test]
fn validate_catches_oob_index() {
    let mesh = TriangleMesh::new(quad_positions(), vec![0, 1, 9]);
    let err = mesh.validate().unwrap_err();
    assert!(err.is_range_error());
}

#[test]
fn validate_catches_degenerate() {
    let mesh = TriangleMesh::new(quad_positions(), vec![0, 0, 1]);
    assert!(matches!(mesh.validate(), Err(WeftError::InvalidMesh(_))));
}

#[test]
fn from_interleaved() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = TriangleMesh::from_interleaved(&positions, &[0, 1, 2]).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.positions[1], Vec3::X);
}

#[test]
fn from_interleaved_rejects_ragged() {
    assert!(TriangleMesh::from_interleaved(&[0.0, 1.0], &[]).is_err());
}

#[test]
fn mesh_json_roundtrip() {
    let mesh = quad_grid(2, 1, 1.0, 1.0);
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: TriangleMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.indices, mesh.indices);
    assert_eq!(recovered.positions, mesh.positions);
}

#[test]
fn bounds_of_grid() {
    let mesh = quad_grid(4, 2, 2.0, 1.0);
    let (lo, hi) = mesh.bounds().unwrap();
    assert!((lo - Vec3::new(-1.0, -0.5, 0.0)).length() < 1e-6);
    assert!((hi - Vec3::new(1.0, 0.5, 0.0)).length() < 1e-6);
    assert!(TriangleMesh::default().bounds().is_none());
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_counts() {
    let mesh = quad_grid(3, 2, 1.0, 1.0);
    assert_eq!(mesh.vertex_count(), 12);
    assert_eq!(mesh.triangle_count(), 12);
    assert!(mesh.validate().is_ok());
}

#[test]
fn top_row_and_lay_flat() {
    let mut mesh = quad_grid(2, 2, 1.0, 1.0);
    assert_eq!(top_row(2), vec![0, 1, 2]);
    lay_flat(&mut mesh, 1.5);
    assert!(mesh.positions.iter().all(|p| (p.y - 1.5).abs() < 1e-6));
    // Top row (grid +Y) maps to -Z.
    assert!((mesh.positions[0].z + 0.5).abs() < 1e-6);
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn quad_edges_and_bend() {
    let topo = Topology::build(&quad_positions(), &QUAD_TRIS).unwrap();
    // 4 boundary edges + 1 diagonal
    assert_eq!(topo.edges.len(), 5);
    assert_eq!(topo.boundary_edge_count, 4);
    assert!(!topo.is_closed());

    // The diagonal (1, 2) is interior; its wings are 0 and 3.
    assert_eq!(topo.bends, vec![[0, 3]]);
    assert!((topo.bend_rest[0] - 2.0_f32.sqrt()).abs() < 1e-6);
}

#[test]
fn edges_in_first_appearance_order() {
    let topo = Topology::build(&quad_positions(), &QUAD_TRIS).unwrap();
    assert_eq!(topo.edges[0], [0, 1]);
    assert_eq!(topo.edges[1], [1, 2]);
    assert_eq!(topo.edges[2], [0, 2]);
    assert!((topo.edge_rest[0] - 1.0).abs() < 1e-6);
}

#[test]
fn grid_counts() {
    let mesh = quad_grid(4, 4, 1.0, 1.0);
    let topo = Topology::build(&mesh.positions, &mesh.indices).unwrap();
    // horizontal 4*5 + vertical 5*4 + diagonals 16
    assert_eq!(topo.edges.len(), 56);
    assert_eq!(topo.bends.len(), topo.edges.len() - topo.boundary_edge_count);
    assert_eq!(topo.boundary_edge_count, 16);
}

#[test]
fn batches_are_vertex_disjoint() {
    let mesh = quad_grid(8, 6, 1.0, 1.0);
    let topo = Topology::build(&mesh.positions, &mesh.indices).unwrap();
    assert!(ConstraintColoring::is_valid(&topo.edges, &topo.edge_batches, mesh.vertex_count()));
    assert!(ConstraintColoring::is_valid(&topo.bends, &topo.bend_batches, mesh.vertex_count()));
    // A regular grid has valence 6, so the greedy pass stays small.
    assert!(topo.edge_batches.len() <= 12);
}

#[test]
fn build_is_deterministic() {
    let mesh = quad_grid(6, 6, 1.0, 1.0);
    let a = Topology::build(&mesh.positions, &mesh.indices).unwrap();
    let b = Topology::build(&mesh.positions, &mesh.indices).unwrap();
    assert_eq!(a.edges, b.edges);
    assert_eq!(a.bends, b.bends);
    assert_eq!(a.edge_batches, b.edge_batches);
}

#[test]
fn build_rejects_bad_input() {
    let err = Topology::build(&quad_positions(), &[0, 1, 4]).unwrap_err();
    assert!(err.is_range_error());

    let err = Topology::build(&[], &[]).unwrap_err();
    assert!(matches!(err, WeftError::InvalidArgument(_)));

    let err = Topology::build(&quad_positions(), &[0, 1]).unwrap_err();
    assert!(matches!(err, WeftError::InvalidArgument(_)));
}

#[test]
fn degenerate_triangles_are_skipped() {
    let topo = Topology::build(&quad_positions(), &[0, 0, 1, 0, 1, 2]).unwrap();
    assert_eq!(topo.edges.len(), 3);
    assert!(topo.bends.is_empty());
}
