//! # weft-math
//!
//! Linear algebra primitives for the Weft cloth solver.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, etc.)
//! - Small geometry helpers shared by the constraint solver and colliders

pub mod geometry;

// Re-export glam types as the canonical math types for Weft.
pub use glam::{Vec2, Vec3, Vec3A};
