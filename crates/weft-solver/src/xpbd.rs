//! XPBD position solver.
//!
//! Positions are projected directly. Each constraint carries a Lagrange
//! multiplier and a compliance `α`; per visit
//!
//! ```text
//! α̃  = α / h²
//! Δλ = (−C − α̃·λ) / (w_sum + α̃)
//! λ += Δλ
//! ```
//!
//! and each endpoint moves by `w·Δλ` along the constraint gradient.
//! Velocities are re-derived once after all iterations.
//!
//! Multipliers live in arrays parallel to the constraint arena and are
//! carried from one step to the next; they are only zeroed by
//! [`SolverStrategy::reset`]. Tether multipliers are per vertex and drop
//! back to zero whenever the tether goes slack.

use weft_math::geometry::edge_direction;
use weft_math::Vec3;
use weft_mesh::Batch;
use weft_types::constants::LENGTH_EPSILON;

use crate::config::{SolverConfig, SolverKind};
use crate::constraints::DistanceConstraint;
use crate::integrate::{damp_velocities, derive_velocities, predict_positions};
use crate::strategy::{Coefficients, SolverStrategy, SubstepContext};
use crate::tether::TetherSet;

/// XPBD solver body with persistent multipliers.
#[derive(Debug, Default)]
pub struct XpbdSolver {
    lambda_edges: Vec<f32>,
    lambda_bends: Vec<f32>,
    lambda_tethers: Vec<f32>,
}

impl XpbdSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated stretch multipliers, one per edge.
    pub fn edge_multipliers(&self) -> &[f32] {
        &self.lambda_edges
    }

    /// Accumulated bend multipliers, one per bend pair.
    pub fn bend_multipliers(&self) -> &[f32] {
        &self.lambda_bends
    }

    /// Accumulated tether multipliers, one per vertex.
    pub fn tether_multipliers(&self) -> &[f32] {
        &self.lambda_tethers
    }
}

fn project_distance(
    batches: &[Batch],
    constraints: &[DistanceConstraint],
    lambdas: &mut [f32],
    positions: &mut [Vec3],
    inv_h2: f32,
) {
    for batch in batches {
        for &ci in batch {
            let ci = ci as usize;
            let c = &constraints[ci];
            if c.wsum <= 0.0 {
                continue;
            }
            let (i, j) = (c.i as usize, c.j as usize);
            let Some((n, len)) = edge_direction(positions[i], positions[j], LENGTH_EPSILON) else {
                continue;
            };

            let err = len - c.rest;
            let alpha = c.coefficient * inv_h2;
            let dl = (-err - alpha * lambdas[ci]) / (c.wsum + alpha);
            lambdas[ci] += dl;

            if c.wi > 0.0 {
                positions[i] -= n * (c.wi * dl);
            }
            if c.wj > 0.0 {
                positions[j] += n * (c.wj * dl);
            }
        }
    }
}

fn project_tethers(
    tethers: &TetherSet,
    lambdas: &mut [f32],
    positions: &mut [Vec3],
    rest: &[Vec3],
    inv_mass: &[f32],
    inv_h2: f32,
) {
    let alpha = tethers.coefficient * inv_h2;
    let bindings = tethers.bindings();

    for batch in tethers.batches() {
        for &vi in batch {
            let i = vi as usize;
            let w = inv_mass[i];
            if w == 0.0 {
                continue;
            }
            let center = tethers.center(i, positions, rest);
            let Some((n, len)) = edge_direction(center, positions[i], LENGTH_EPSILON) else {
                lambdas[i] = 0.0;
                continue;
            };

            let err = len - bindings[i].target_length;
            if err <= 0.0 {
                lambdas[i] = 0.0;
                continue;
            }

            let dl = (-err - alpha * lambdas[i]) / (w + alpha);
            lambdas[i] += dl;
            positions[i] += n * (w * dl);
        }
    }
}

impl SolverStrategy for XpbdSolver {
    fn kind(&self) -> SolverKind {
        SolverKind::Xpbd
    }

    fn coefficients(&self, config: &SolverConfig) -> Coefficients {
        Coefficients {
            stretch: config.stretch_compliance(),
            bend: config.bend_compliance(),
            tether: config.tether_compliance(),
        }
    }

    fn reset(&mut self, edge_count: usize, bend_count: usize, vertex_count: usize) {
        self.lambda_edges.clear();
        self.lambda_edges.resize(edge_count, 0.0);
        self.lambda_bends.clear();
        self.lambda_bends.resize(bend_count, 0.0);
        self.lambda_tethers.clear();
        self.lambda_tethers.resize(vertex_count, 0.0);
    }

    fn solve_substep(&mut self, ctx: &mut SubstepContext<'_>) {
        let h = ctx.h;
        let inv_h2 = 1.0 / (h * h);
        let set = ctx.constraints;

        predict_positions(ctx.positions, ctx.previous, ctx.velocities, ctx.inv_mass, h);

        for _ in 0..ctx.config.iterations {
            project_distance(
                &set.edge_batches,
                &set.edges,
                &mut self.lambda_edges,
                ctx.positions,
                inv_h2,
            );
            project_distance(
                &set.bend_batches,
                &set.bends,
                &mut self.lambda_bends,
                ctx.positions,
                inv_h2,
            );
            if let Some(tethers) = ctx.tethers {
                project_tethers(
                    tethers,
                    &mut self.lambda_tethers,
                    ctx.positions,
                    ctx.rest_positions,
                    ctx.inv_mass,
                    inv_h2,
                );
            }
        }

        derive_velocities(ctx.velocities, ctx.positions, ctx.previous, ctx.inv_mass, h);
        damp_velocities(ctx.velocities, ctx.inv_mass, ctx.config.damping);
    }
}
