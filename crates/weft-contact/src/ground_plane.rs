//! Ground plane collision.
//!
//! An infinite plane `normal · p = offset`. The default is the horizontal
//! floor `y = height`.

use weft_math::Vec3;
use weft_types::constants::LENGTH_EPSILON;

use crate::collider::{Collider, SurfacePoint};

/// Infinite plane collider.
#[derive(Debug, Clone, Copy)]
pub struct GroundPlane {
    /// Outward unit normal.
    pub normal: Vec3,
    /// Plane offset along the normal.
    pub offset: f32,
}

impl GroundPlane {
    /// Creates a horizontal ground plane at the given height.
    pub fn new(height: f32) -> Self {
        Self {
            normal: Vec3::Y,
            offset: height,
        }
    }

    /// Creates the plane `normal · p = offset` for any non-zero normal.
    ///
    /// The normal is normalized and the offset divided by its length, so
    /// the plane stays where the equation puts it. A degenerate normal
    /// falls back to the floor `y = offset`.
    pub fn with_normal(normal: Vec3, offset: f32) -> Self {
        let len = normal.length();
        if len < LENGTH_EPSILON || !len.is_finite() {
            return Self::new(offset);
        }
        Self {
            normal: normal / len,
            offset: offset / len,
        }
    }
}

impl Collider for GroundPlane {
    fn surface(&self, p: Vec3) -> SurfacePoint {
        SurfacePoint {
            normal: self.normal,
            distance: self.normal.dot(p) - self.offset,
        }
    }

    fn name(&self) -> &str {
        "ground_plane"
    }
}
