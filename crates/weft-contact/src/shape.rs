//! Serializable collider descriptions.
//!
//! Scenario files describe colliders as data; [`ColliderShape::build`]
//! turns a description into a boxed [`Collider`].

use serde::{Deserialize, Serialize};
use weft_math::Vec3;

use crate::capsule::CapsuleCollider;
use crate::collider::Collider;
use crate::ground_plane::GroundPlane;
use crate::sphere::SphereCollider;

/// Data description of a reference collider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColliderShape {
    /// Plane `normal · p = offset`.
    Plane { normal: [f32; 3], offset: f32 },
    /// Sphere.
    Sphere { center: [f32; 3], radius: f32 },
    /// Capsule around the segment `a → b`.
    Capsule { a: [f32; 3], b: [f32; 3], radius: f32 },
}

impl ColliderShape {
    /// Instantiate the collider.
    pub fn build(&self) -> Box<dyn Collider> {
        match *self {
            ColliderShape::Plane { normal, offset } => {
                Box::new(GroundPlane::with_normal(Vec3::from(normal), offset))
            }
            ColliderShape::Sphere { center, radius } => {
                Box::new(SphereCollider::new(Vec3::from(center), radius))
            }
            ColliderShape::Capsule { a, b, radius } => {
                Box::new(CapsuleCollider::new(Vec3::from(a), Vec3::from(b), radius))
            }
        }
    }
}
