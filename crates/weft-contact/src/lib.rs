//! # weft-contact
//!
//! Collision response for cloth vertices.
//!
//! The solver only knows the [`Collider`] capability: once per substep it
//! hands every collider a [`ContactFrame`] borrowing the vertex buffers and
//! lets it push penetrating vertices out. There is no broad phase — each
//! collider visits every vertex.
//!
//! Reference shapes:
//! - [`GroundPlane`] — infinite plane with arbitrary normal
//! - [`SphereCollider`] — analytic sphere
//! - [`CapsuleCollider`] — segment swept by a radius

pub mod capsule;
pub mod collider;
pub mod ground_plane;
pub mod shape;
pub mod sphere;

pub use capsule::CapsuleCollider;
pub use collider::{Collider, ContactFrame, ContactResult, SurfacePoint};
pub use ground_plane::GroundPlane;
pub use shape::ColliderShape;
pub use sphere::SphereCollider;
