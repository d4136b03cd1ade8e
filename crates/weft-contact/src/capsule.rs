//! Analytical capsule collision.
//!
//! A capsule is the set of points within `radius` of the segment `[a, b]`.
//! When the axis collapses (`a ≈ b`) it behaves as a sphere at `a`.

use weft_math::geometry::closest_point_on_segment;
use weft_math::Vec3;
use weft_types::constants::LENGTH_EPSILON;

use crate::collider::{Collider, SurfacePoint};
use crate::sphere::sphere_surface;

/// Analytical capsule collider.
#[derive(Debug, Clone, Copy)]
pub struct CapsuleCollider {
    /// First axis endpoint.
    pub a: Vec3,
    /// Second axis endpoint.
    pub b: Vec3,
    /// Radius around the axis.
    pub radius: f32,
}

impl CapsuleCollider {
    /// Creates a new capsule collider.
    pub fn new(a: Vec3, b: Vec3, radius: f32) -> Self {
        Self {
            a,
            b,
            radius: radius.max(0.0),
        }
    }
}

impl Collider for CapsuleCollider {
    fn surface(&self, p: Vec3) -> SurfacePoint {
        let q = closest_point_on_segment(p, self.a, self.b, LENGTH_EPSILON);
        sphere_surface(p, q, self.radius)
    }

    fn name(&self) -> &str {
        "capsule"
    }
}
