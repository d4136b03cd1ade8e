//! The collision hook capability.
//!
//! A collider receives mutable access to the whole vertex state for one
//! substep and resolves every penetrating vertex in place. Colliders are
//! independent of each other and hold no per-step state.

use weft_math::Vec3;

/// Result of one collider pass.
#[derive(Debug, Clone, Default)]
pub struct ContactResult {
    /// Number of vertices pushed out.
    pub resolved_count: u32,
    /// Deepest penetration (below surface + thickness) seen before correction.
    pub max_penetration: f32,
}

impl ContactResult {
    /// Fold another result into this one.
    pub fn merge(&mut self, other: &ContactResult) {
        self.resolved_count += other.resolved_count;
        self.max_penetration = self.max_penetration.max(other.max_penetration);
    }
}

/// Closest surface feature for a query point.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint {
    /// Outward unit normal at the closest surface point.
    pub normal: Vec3,
    /// Signed distance from the surface (positive outside).
    pub distance: f32,
}

/// Vertex state borrowed for one collision pass.
///
/// `positions` and `velocities` are mutated in place. `previous` holds the
/// positions at the start of the substep and `inv_mass` the effective
/// inverse masses; vertices with zero inverse mass must not be touched.
pub struct ContactFrame<'a> {
    pub positions: &'a mut [Vec3],
    pub velocities: &'a mut [Vec3],
    pub previous: &'a [Vec3],
    pub inv_mass: &'a [f32],
    /// Substep size (seconds).
    pub dt: f32,
    /// Separation kept between the surface and every vertex.
    pub thickness: f32,
    /// Tangential friction in `[0, 1]`; 1 stops sliding completely.
    pub friction: f32,
}

/// Collision-resolution capability.
///
/// Implementors usually only provide [`Collider::surface`]; the default
/// [`Collider::resolve`] projects every penetrating vertex to
/// `surface + thickness`, removes the inward normal velocity and scales
/// the tangential velocity by `1 - friction`.
pub trait Collider: Send + Sync {
    /// Closest surface point to `p`. Every shape answers for every point;
    /// degenerate shapes fall back to a simpler one.
    fn surface(&self, p: Vec3) -> SurfacePoint;

    /// Resolve all contacts in `frame`. Cost is O(vertices).
    fn resolve(&self, frame: &mut ContactFrame<'_>) -> ContactResult {
        let mut result = ContactResult::default();
        let keep = 1.0 - frame.friction.clamp(0.0, 1.0);

        for i in 0..frame.positions.len() {
            if frame.inv_mass[i] == 0.0 {
                continue;
            }
            let hit = self.surface(frame.positions[i]);

            let depth = frame.thickness - hit.distance;
            if depth <= 0.0 {
                continue;
            }

            let n = hit.normal;
            frame.positions[i] += n * depth;

            let v = frame.velocities[i];
            let vn = v.dot(n);
            let tangent = v - n * vn;
            let normal = if vn < 0.0 { Vec3::ZERO } else { n * vn };
            frame.velocities[i] = normal + tangent * keep;

            result.resolved_count += 1;
            result.max_penetration = result.max_penetration.max(depth);
        }

        result
    }

    /// Returns the collider's name for logging.
    fn name(&self) -> &str;
}
