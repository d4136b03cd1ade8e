//! Solver strategy trait — the seam between the facade and the two
//! constraint-solving bodies.
//!
//! [`ClothSolver`](crate::solver::ClothSolver) owns every buffer and hands
//! a strategy one [`SubstepContext`] per substep, after external forces
//! have been applied and before collisions are resolved. The strategy
//! runs its iteration loop, leaves final positions and (damped)
//! velocities in the context, and keeps whatever per-constraint state it
//! needs between calls.

use weft_math::Vec3;
use weft_types::WeftResult;

use crate::config::{SolverConfig, SolverKind};
use crate::constraints::ConstraintSet;
use crate::impulse::VelocityImpulseSolver;
use crate::tether::TetherSet;

/// Everything a strategy may read or write during one substep.
pub struct SubstepContext<'a> {
    /// Current positions; on entry equal to `previous`.
    pub positions: &'a mut [Vec3],
    /// Velocities with external forces already applied.
    pub velocities: &'a mut [Vec3],
    /// Positions at the start of the substep.
    pub previous: &'a [Vec3],
    pub constraints: &'a ConstraintSet,
    /// `None` when no anchors are set or tethers are disabled.
    pub tethers: Option<&'a TetherSet>,
    /// Reference pose for rest-position tethers.
    pub rest_positions: &'a [Vec3],
    /// Effective inverse masses (zero = pinned).
    pub inv_mass: &'a [f32],
    pub config: &'a SolverConfig,
    /// Substep size (seconds).
    pub h: f32,
}

/// Coefficients a strategy wants cached on its constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub stretch: f32,
    pub bend: f32,
    pub tether: f32,
}

/// A constraint-solving body.
///
/// Implementations:
/// - [`VelocityImpulseSolver`] — sequential impulses with a position bias
/// - `XpbdSolver` — compliance-based projection (feature `xpbd`)
pub trait SolverStrategy: Send {
    /// Which body this is.
    fn kind(&self) -> SolverKind;

    /// Returns the solver's name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Map a config snapshot to per-kind constraint coefficients.
    fn coefficients(&self, config: &SolverConfig) -> Coefficients;

    /// Drop persistent per-constraint state and size it for a constraint set.
    ///
    /// Called on initialize and whenever the rest pose is reset.
    fn reset(&mut self, edge_count: usize, bend_count: usize, vertex_count: usize);

    /// Run the iteration loop for one substep.
    fn solve_substep(&mut self, ctx: &mut SubstepContext<'_>);
}

/// Construct the strategy for `kind`.
///
/// Fails with `InvalidConfig` when the XPBD body was compiled out.
pub fn create_strategy(kind: SolverKind) -> WeftResult<Box<dyn SolverStrategy>> {
    match kind {
        SolverKind::VelocityImpulse => Ok(Box::new(VelocityImpulseSolver::new())),
        #[cfg(feature = "xpbd")]
        SolverKind::Xpbd => Ok(Box::new(crate::xpbd::XpbdSolver::new())),
        #[cfg(not(feature = "xpbd"))]
        SolverKind::Xpbd => Err(weft_types::WeftError::InvalidConfig(
            "xpbd solver requested but the `xpbd` feature is disabled".into(),
        )),
    }
}
