//! Explicit per-substep integration helpers shared by both solver bodies.
//!
//! Every helper leaves vertices with zero inverse mass alone: their
//! positions are never written and their velocities are held at zero.

use rand::rngs::StdRng;
use rand::Rng;
use weft_math::Vec3;

use crate::config::SolverConfig;

/// Accumulate body acceleration, jitter and air drag into velocities.
///
/// Pinned vertices get zero velocity. Jitter draws three samples per
/// movable vertex, in index order, so the sequence is reproducible for a
/// fixed seed.
pub fn apply_external_forces(
    velocities: &mut [Vec3],
    inv_mass: &[f32],
    config: &SolverConfig,
    h: f32,
    rng: &mut StdRng,
) {
    let accel = config.body_acceleration();
    let jitter = config.jitter;
    let drag = (1.0 - config.air_drag * h).max(0.0);

    for (v, &w) in velocities.iter_mut().zip(inv_mass) {
        if w == 0.0 {
            *v = Vec3::ZERO;
            continue;
        }

        let mut a = accel;
        if jitter > 0.0 {
            a += Vec3::new(
                rng.gen_range(-jitter..=jitter),
                rng.gen_range(-jitter..=jitter),
                rng.gen_range(-jitter..=jitter),
            );
        }

        *v = (*v + a * h) * drag;
    }
}

/// `x = x_prev + v·h` for every movable vertex.
#[inline]
pub fn predict_positions(
    positions: &mut [Vec3],
    previous: &[Vec3],
    velocities: &[Vec3],
    inv_mass: &[f32],
    h: f32,
) {
    for i in 0..positions.len() {
        if inv_mass[i] > 0.0 {
            positions[i] = previous[i] + velocities[i] * h;
        }
    }
}

/// `v = (x - x_prev) / h` for every movable vertex.
pub fn derive_velocities(
    velocities: &mut [Vec3],
    positions: &[Vec3],
    previous: &[Vec3],
    inv_mass: &[f32],
    h: f32,
) {
    let inv_h = 1.0 / h;
    for i in 0..velocities.len() {
        if inv_mass[i] > 0.0 {
            velocities[i] = (positions[i] - previous[i]) * inv_h;
        }
    }
}

/// Uniform damping `v *= 1 - damping` for every movable vertex.
pub fn damp_velocities(velocities: &mut [Vec3], inv_mass: &[f32], damping: f32) {
    let keep = 1.0 - damping;
    for (v, &w) in velocities.iter_mut().zip(inv_mass) {
        if w > 0.0 {
            *v *= keep;
        }
    }
}
