//! # weft-solver
//!
//! Constrained dynamics for cloth meshes.
//!
//! ## Key Types
//!
//! - [`ClothSolver`] — Facade: initialize from a mesh, then `step` borrowed buffers
//! - [`ClothParams`] / [`SolverConfig`] — Raw parameters and their clamped snapshot
//! - [`SolverStrategy`] — Pluggable constraint-solving body
//! - [`VelocityImpulseSolver`] — Default body: biased sequential impulses
//! - `XpbdSolver` — Compliance-based position projection (feature `xpbd`)
//! - [`TetherSet`] — Nearest-anchor tether bindings

pub mod config;
pub mod constraints;
pub mod impulse;
pub mod integrate;
pub mod masses;
pub mod solver;
pub mod strategy;
pub mod tether;
#[cfg(feature = "xpbd")]
pub mod xpbd;

pub use config::{ClothParams, SolverConfig, SolverKind};
pub use constraints::{ConstraintSet, DistanceConstraint};
pub use impulse::VelocityImpulseSolver;
pub use masses::MassModel;
pub use solver::{BatchCounts, ClothSolver, StepReport};
pub use strategy::{create_strategy, SolverStrategy, SubstepContext};
pub use tether::{TetherBinding, TetherSet};
#[cfg(feature = "xpbd")]
pub use xpbd::XpbdSolver;
