//! Distance constraint arena.
//!
//! Stretch and bend constraints share one shape: a vertex pair, a rest
//! length, cached inverse-mass weights and a strategy-specific coefficient
//! (bias factor for the velocity-impulse solver, compliance for XPBD).
//! The pairs and batches come from [`Topology`] and never change; rest
//! lengths, weights and coefficients are refreshed in place.

use weft_math::Vec3;
use weft_mesh::{Batch, Topology};
use weft_types::{WeftError, WeftResult};

/// A two-vertex distance constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceConstraint {
    pub i: u32,
    pub j: u32,
    /// Rest distance.
    pub rest: f32,
    /// Inverse mass of `i`.
    pub wi: f32,
    /// Inverse mass of `j`.
    pub wj: f32,
    /// `wi + wj`.
    pub wsum: f32,
    /// Bias factor or compliance, depending on the solver body.
    pub coefficient: f32,
}

impl DistanceConstraint {
    fn new([i, j]: [u32; 2], rest: f32) -> Self {
        Self {
            i,
            j,
            rest,
            wi: 0.0,
            wj: 0.0,
            wsum: 0.0,
            coefficient: 0.0,
        }
    }

    fn refresh_weights(&mut self, inv_mass: &[f32]) {
        self.wi = inv_mass[self.i as usize];
        self.wj = inv_mass[self.j as usize];
        self.wsum = self.wi + self.wj;
    }

    /// Current length minus rest length.
    #[inline]
    pub fn violation(&self, positions: &[Vec3]) -> f32 {
        positions[self.i as usize].distance(positions[self.j as usize]) - self.rest
    }
}

/// All stretch and bend constraints of a mesh plus their batches.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    pub edges: Vec<DistanceConstraint>,
    pub bends: Vec<DistanceConstraint>,
    pub edge_batches: Vec<Batch>,
    pub bend_batches: Vec<Batch>,
    vertex_count: usize,
}

impl ConstraintSet {
    /// Build the arena from a topology. Weights start from `inv_mass`.
    pub fn from_topology(topology: Topology, inv_mass: &[f32]) -> Self {
        let edges = topology
            .edges
            .iter()
            .zip(&topology.edge_rest)
            .map(|(&pair, &rest)| DistanceConstraint::new(pair, rest))
            .collect();
        let bends = topology
            .bends
            .iter()
            .zip(&topology.bend_rest)
            .map(|(&pair, &rest)| DistanceConstraint::new(pair, rest))
            .collect();

        let mut set = Self {
            edges,
            bends,
            edge_batches: topology.edge_batches,
            bend_batches: topology.bend_batches,
            vertex_count: topology.vertex_count,
        };
        set.refresh_weights(inv_mass);
        set
    }

    /// Recompute cached weights from effective inverse masses.
    pub fn refresh_weights(&mut self, inv_mass: &[f32]) {
        for c in self.edges.iter_mut().chain(self.bends.iter_mut()) {
            c.refresh_weights(inv_mass);
        }
    }

    /// Assign the per-kind coefficient to every constraint.
    pub fn set_coefficients(&mut self, stretch: f32, bend: f32) {
        for c in &mut self.edges {
            c.coefficient = stretch;
        }
        for c in &mut self.bends {
            c.coefficient = bend;
        }
    }

    /// Recompute rest lengths from a new reference pose.
    pub fn reset_rest(&mut self, positions: &[Vec3]) -> WeftResult<()> {
        if positions.len() != self.vertex_count {
            return Err(WeftError::LengthMismatch {
                what: "rest positions",
                expected: self.vertex_count,
                actual: positions.len(),
            });
        }
        for c in self.edges.iter_mut().chain(self.bends.iter_mut()) {
            c.rest = positions[c.i as usize].distance(positions[c.j as usize]);
        }
        Ok(())
    }

    /// Largest absolute stretch violation over all edges.
    pub fn max_stretch_violation(&self, positions: &[Vec3]) -> f32 {
        self.edges
            .iter()
            .map(|c| c.violation(positions).abs())
            .fold(0.0, f32::max)
    }

    /// Number of vertices the arena was built for.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}
