//! Analytical sphere collision.

use weft_math::Vec3;
use weft_types::constants::LENGTH_EPSILON;

use crate::collider::{Collider, SurfacePoint};

/// Analytical sphere collider.
#[derive(Debug, Clone, Copy)]
pub struct SphereCollider {
    /// Center of the sphere.
    pub center: Vec3,
    /// Radius of the sphere.
    pub radius: f32,
}

impl SphereCollider {
    /// Creates a new sphere collider.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }
}

/// Surface of a sphere around `center`.
///
/// A point exactly at the center is pushed up (+Y).
pub(crate) fn sphere_surface(p: Vec3, center: Vec3, radius: f32) -> SurfacePoint {
    let d = p - center;
    let dist = d.length();
    if dist < LENGTH_EPSILON {
        return SurfacePoint {
            normal: Vec3::Y,
            distance: -radius,
        };
    }
    SurfacePoint {
        normal: d / dist,
        distance: dist - radius,
    }
}

impl Collider for SphereCollider {
    fn surface(&self, p: Vec3) -> SurfacePoint {
        sphere_surface(p, self.center, self.radius)
    }

    fn name(&self) -> &str {
        "sphere"
    }
}
