//! Geometry helpers.
//!
//! Everything here is branch-light and epsilon-guarded: degenerate input
//! yields `None` (or a well-defined fallback) rather than NaN.

use glam::Vec3;

/// Unit direction and length of the segment `a → b`.
///
/// Returns `None` when the segment is shorter than `epsilon`.
#[inline]
pub fn edge_direction(a: Vec3, b: Vec3, epsilon: f32) -> Option<(Vec3, f32)> {
    let d = b - a;
    let len = d.length();
    if len < epsilon || !len.is_finite() {
        return None;
    }
    Some((d / len, len))
}

/// Closest point to `p` on the segment `[a, b]`.
///
/// A segment shorter than `epsilon` collapses to `a`.
pub fn closest_point_on_segment(p: Vec3, a: Vec3, b: Vec3, epsilon: f32) -> Vec3 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 < epsilon * epsilon {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}
