//! Sequential velocity-impulse solver.
//!
//! Every constraint applies one impulse along its direction, made of two
//! parts. The velocity part cancels the separating relative velocity,
//! scaled by the constraint's stiffness. The bias part, `-β·C/h`, removes
//! position error. Bias impulses accumulate in a per-substep
//! pseudo-velocity: it moves the predicted positions but the velocity part
//! never sees it, so position correction can't be mistaken for motion to
//! cancel. It is folded into the stored velocity once, after the last
//! iteration.
//!
//! Positions are re-predicted from `previous + (v + bias)·h` before each
//! pass and stay fixed while the pass runs. Both parts are clamped so a
//! single iteration can't blow up on a badly stretched configuration.

use weft_math::geometry::edge_direction;
use weft_math::Vec3;
use weft_mesh::Batch;
use weft_types::constants::{LENGTH_EPSILON, MAX_IMPULSE};

use crate::config::{SolverConfig, SolverKind};
use crate::constraints::DistanceConstraint;
use crate::integrate::{damp_velocities, predict_positions};
use crate::strategy::{Coefficients, SolverStrategy, SubstepContext};
use crate::tether::TetherSet;

/// Velocity-impulse solver body.
///
/// Holds only a scratch pseudo-velocity buffer; nothing carries over from
/// one substep to the next.
#[derive(Debug, Default)]
pub struct VelocityImpulseSolver {
    bias: Vec<Vec3>,
}

impl VelocityImpulseSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `x = x_prev + (v + bias)·h` for every movable vertex.
fn predict_biased(
    positions: &mut [Vec3],
    previous: &[Vec3],
    velocities: &[Vec3],
    bias: &[Vec3],
    inv_mass: &[f32],
    h: f32,
) {
    for i in 0..positions.len() {
        if inv_mass[i] > 0.0 {
            positions[i] = previous[i] + (velocities[i] + bias[i]) * h;
        }
    }
}

#[inline]
fn clamp_impulse(lambda: f32) -> f32 {
    lambda.clamp(-MAX_IMPULSE, MAX_IMPULSE)
}

/// Apply one split impulse per constraint, batch by batch.
fn solve_distance(
    batches: &[Batch],
    constraints: &[DistanceConstraint],
    stiffness: f32,
    positions: &[Vec3],
    velocities: &mut [Vec3],
    bias: &mut [Vec3],
    h: f32,
) {
    for batch in batches {
        for &ci in batch {
            let c = &constraints[ci as usize];
            if c.wsum <= 0.0 {
                continue;
            }
            let (i, j) = (c.i as usize, c.j as usize);
            let Some((n, len)) = edge_direction(positions[i], positions[j], LENGTH_EPSILON) else {
                continue;
            };

            let vrel = (velocities[j] - velocities[i]).dot(n);
            let lv = clamp_impulse(-stiffness * vrel / c.wsum);
            let lb = clamp_impulse(-c.coefficient * (len - c.rest) / (h * c.wsum));

            if c.wi > 0.0 {
                velocities[i] -= n * (lv * c.wi);
                bias[i] -= n * (lb * c.wi);
            }
            if c.wj > 0.0 {
                velocities[j] += n * (lv * c.wj);
                bias[j] += n * (lb * c.wj);
            }
        }
    }
}

/// One-sided tether impulses; only the tethered vertex moves.
fn solve_tethers(
    tethers: &TetherSet,
    stiffness: f32,
    ctx: &mut SubstepContext<'_>,
    bias: &mut [Vec3],
) {
    let beta = tethers.coefficient;
    let bindings = tethers.bindings();
    let h = ctx.h;

    for batch in tethers.batches() {
        for &vi in batch {
            let i = vi as usize;
            let w = ctx.inv_mass[i];
            if w == 0.0 {
                continue;
            }
            let center = tethers.center(i, ctx.positions, ctx.rest_positions);
            let Some((n, len)) = edge_direction(center, ctx.positions[i], LENGTH_EPSILON) else {
                continue;
            };

            let err = len - bindings[i].target_length;
            if err <= 0.0 {
                continue;
            }

            let anchor_vel = bindings[i]
                .anchor
                .map_or(Vec3::ZERO, |a| ctx.velocities[a as usize]);
            // Only separating velocity is cancelled.
            let vrel = (ctx.velocities[i] - anchor_vel).dot(n).max(0.0);
            let lv = clamp_impulse(-stiffness * vrel / w);
            let lb = clamp_impulse(-beta * err / (h * w));

            ctx.velocities[i] += n * (lv * w);
            bias[i] += n * (lb * w);
        }
    }
}

impl SolverStrategy for VelocityImpulseSolver {
    fn kind(&self) -> SolverKind {
        SolverKind::VelocityImpulse
    }

    fn coefficients(&self, config: &SolverConfig) -> Coefficients {
        Coefficients {
            stretch: config.stretch_beta(),
            bend: config.bend_beta(),
            tether: config.tether_beta(),
        }
    }

    fn reset(&mut self, _edge_count: usize, _bend_count: usize, vertex_count: usize) {
        self.bias.clear();
        self.bias.resize(vertex_count, Vec3::ZERO);
    }

    fn solve_substep(&mut self, ctx: &mut SubstepContext<'_>) {
        let h = ctx.h;
        let set = ctx.constraints;
        let config = ctx.config;

        self.bias.clear();
        self.bias.resize(ctx.positions.len(), Vec3::ZERO);
        let bias = self.bias.as_mut_slice();

        for _ in 0..config.iterations {
            predict_biased(ctx.positions, ctx.previous, ctx.velocities, bias, ctx.inv_mass, h);
            solve_distance(
                &set.edge_batches,
                &set.edges,
                config.stretch_stiffness,
                ctx.positions,
                ctx.velocities,
                bias,
                h,
            );

            predict_biased(ctx.positions, ctx.previous, ctx.velocities, bias, ctx.inv_mass, h);
            solve_distance(
                &set.bend_batches,
                &set.bends,
                config.bend_stiffness,
                ctx.positions,
                ctx.velocities,
                bias,
                h,
            );

            if let Some(tethers) = ctx.tethers {
                predict_biased(ctx.positions, ctx.previous, ctx.velocities, bias, ctx.inv_mass, h);
                solve_tethers(tethers, config.tether_stiffness, ctx, bias);
            }
        }

        for (i, v) in ctx.velocities.iter_mut().enumerate() {
            if ctx.inv_mass[i] > 0.0 {
                *v += bias[i];
            }
        }
        predict_positions(ctx.positions, ctx.previous, ctx.velocities, ctx.inv_mass, h);
        damp_velocities(ctx.velocities, ctx.inv_mass, config.damping);
    }
}
