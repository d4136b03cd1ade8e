//! The cloth solver facade.
//!
//! [`ClothSolver`] owns everything derived from the mesh (constraint
//! arena, batches, masses, tethers, multipliers) and borrows the caller's
//! position and velocity buffers for the duration of each [`ClothSolver::step`].
//! Every fallible entry point validates its arguments before touching any
//! state, so a failed call leaves the solver exactly as it was.
//!
//! One step runs `substeps` passes of `dt / substeps`:
//!
//! 1. snapshot positions
//! 2. external forces, jitter and drag into velocities
//! 3. strategy iteration loop (positions and velocities final, damped)
//! 4. each collider resolves contacts in place

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};
use weft_contact::{Collider, ContactFrame, ContactResult};
use weft_math::Vec3;
use weft_mesh::Topology;
use weft_types::{WeftError, WeftResult};

use crate::config::{ClothParams, SolverConfig, SolverKind};
use crate::constraints::ConstraintSet;
use crate::integrate::apply_external_forces;
use crate::masses::MassModel;
use crate::strategy::{create_strategy, SolverStrategy, SubstepContext};
use crate::tether::{TetherBinding, TetherSet};

/// Summary of one [`ClothSolver::step`] call.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Substeps performed.
    pub substeps: u32,
    /// Constraint iterations per substep.
    pub iterations: u32,
    /// Vertex contacts resolved over all substeps and colliders.
    pub contacts: u32,
    /// Deepest penetration seen before correction.
    pub max_penetration: f32,
    /// Wall-clock time for this step (seconds).
    pub wall_time: f64,
}

/// Number of batches per constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchCounts {
    pub edges: usize,
    pub bends: usize,
    pub tethers: usize,
}

/// Constrained-dynamics cloth solver.
pub struct ClothSolver {
    strategy: Box<dyn SolverStrategy>,
    config: SolverConfig,
    constraints: ConstraintSet,
    tethers: TetherSet,
    masses: MassModel,
    rest_positions: Vec<Vec3>,
    colliders: Vec<Box<dyn Collider>>,
    /// Substep-start positions, reused across steps.
    previous: Vec<Vec3>,
    rng: StdRng,
}

impl ClothSolver {
    /// Build topology, masses and config for a mesh.
    ///
    /// `positions` is the rest pose. Fails on empty or non-finite positions,
    /// a triangle list that isn't a multiple of 3, an out-of-range triangle
    /// index, or an XPBD request when that body is compiled out.
    pub fn initialize(
        positions: &[Vec3],
        triangles: &[u32],
        params: &ClothParams,
    ) -> WeftResult<Self> {
        let config = SolverConfig::from_params(params);
        let topology = Topology::build(positions, triangles)?;
        let mut strategy = create_strategy(config.solver)?;

        let n = positions.len();
        let masses = MassModel::uniform(n, config.vertex_mass);
        let constraints = ConstraintSet::from_topology(topology, masses.effective());
        strategy.reset(constraints.edges.len(), constraints.bends.len(), n);

        let mut solver = Self {
            strategy,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            constraints,
            tethers: TetherSet::default(),
            masses,
            rest_positions: positions.to_vec(),
            colliders: Vec::new(),
            previous: vec![Vec3::ZERO; n],
        };
        solver.apply_coefficients();

        debug!(
            solver = solver.solver_name(),
            vertices = n,
            edges = solver.constraints.edges.len(),
            bends = solver.constraints.bends.len(),
            edge_batches = solver.constraints.edge_batches.len(),
            bend_batches = solver.constraints.bend_batches.len(),
            "cloth solver initialized"
        );
        Ok(solver)
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Fails, without touching the buffers, when `dt` is not a positive
    /// finite number or either buffer length differs from the vertex count.
    pub fn step(
        &mut self,
        dt: f32,
        positions: &mut [Vec3],
        velocities: &mut [Vec3],
    ) -> WeftResult<StepReport> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(WeftError::InvalidTimestep(dt));
        }
        self.check_len("positions", positions.len())?;
        self.check_len("velocities", velocities.len())?;

        let start = Instant::now();
        let substeps = self.config.substeps;
        let h = dt / substeps as f32;
        let tethers = (self.config.tethers_enabled() && self.tethers.is_bound())
            .then_some(&self.tethers);
        let mut contacts = ContactResult::default();

        for _ in 0..substeps {
            self.previous.copy_from_slice(positions);
            apply_external_forces(
                velocities,
                self.masses.effective(),
                &self.config,
                h,
                &mut self.rng,
            );

            let mut ctx = SubstepContext {
                positions: &mut *positions,
                velocities: &mut *velocities,
                previous: &self.previous,
                constraints: &self.constraints,
                tethers,
                rest_positions: &self.rest_positions,
                inv_mass: self.masses.effective(),
                config: &self.config,
                h,
            };
            self.strategy.solve_substep(&mut ctx);

            if self.colliders.is_empty() {
                continue;
            }
            let mut frame = ContactFrame {
                positions: &mut *positions,
                velocities: &mut *velocities,
                previous: &self.previous,
                inv_mass: self.masses.effective(),
                dt: h,
                thickness: self.config.collision_thickness,
                friction: self.config.friction,
            };
            for collider in &self.colliders {
                contacts.merge(&collider.resolve(&mut frame));
            }
        }

        let report = StepReport {
            substeps,
            iterations: self.config.iterations,
            contacts: contacts.resolved_count,
            max_penetration: contacts.max_penetration,
            wall_time: start.elapsed().as_secs_f64(),
        };
        trace!(
            substeps = report.substeps,
            iterations = report.iterations,
            contacts = report.contacts,
            "step"
        );
        Ok(report)
    }

    /// Replace the configuration snapshot. Never fails: raw values are clamped.
    ///
    /// The solver body is fixed at construction; a different `solver` kind
    /// is logged and ignored. A new `vertex_mass` rescales every base
    /// inverse mass by `old / new`.
    pub fn update_parameters(&mut self, params: &ClothParams) {
        let mut config = SolverConfig::from_params(params);
        let active = self.strategy.kind();
        if config.solver != active {
            warn!(
                requested = config.solver.name(),
                active = active.name(),
                "solver kind is fixed at construction, ignoring change"
            );
            config.solver = active;
        }

        if config.vertex_mass != self.config.vertex_mass {
            self.masses.rescale(self.config.vertex_mass / config.vertex_mass);
        }
        let reseed = config.seed != self.config.seed;
        let retarget = config.tether_scale != self.config.tether_scale;
        self.config = config;

        self.constraints.refresh_weights(self.masses.effective());
        if retarget {
            self.tethers.rebind(&self.rest_positions, self.config.tether_scale);
        }
        self.apply_coefficients();
        if reseed {
            self.rng = StdRng::seed_from_u64(self.config.seed);
        }

        debug!(
            iterations = self.config.iterations,
            substeps = self.config.substeps,
            stretch = self.config.stretch_stiffness,
            bend = self.config.bend_stiffness,
            "parameters updated"
        );
    }

    /// Replace the base inverse masses. Negative values clamp to 0; pins are kept.
    pub fn set_inverse_masses(&mut self, values: &[f32]) -> WeftResult<()> {
        self.masses.set_base(values)?;
        self.constraints.refresh_weights(self.masses.effective());
        Ok(())
    }

    /// Pin vertices (zero effective inverse mass).
    pub fn pin_vertices(&mut self, indices: &[u32]) -> WeftResult<()> {
        self.masses.pin(indices)?;
        self.constraints.refresh_weights(self.masses.effective());
        Ok(())
    }

    /// Unpin vertices, restoring their base inverse mass.
    pub fn unpin_vertices(&mut self, indices: &[u32]) -> WeftResult<()> {
        self.masses.unpin(indices)?;
        self.constraints.refresh_weights(self.masses.effective());
        Ok(())
    }

    pub fn clear_pins(&mut self) {
        self.masses.clear_pins();
        self.constraints.refresh_weights(self.masses.effective());
    }

    /// Tether every vertex to its nearest anchor. An empty list clears tethering.
    pub fn set_tether_anchors(&mut self, anchors: &[u32]) -> WeftResult<()> {
        let mut tethers =
            TetherSet::bind(anchors, &self.rest_positions, self.config.tether_scale)?;
        tethers.coefficient = self.tethers.coefficient;
        self.tethers = tethers;

        debug!(
            anchors = self.tethers.anchors().len(),
            batches = self.tethers.batches().len(),
            "tethers rebound"
        );
        Ok(())
    }

    /// Adopt `positions` as the new rest pose.
    ///
    /// Rest lengths, bend distances and tether targets are recomputed;
    /// topology and pins are kept. Multipliers are zeroed and the jitter
    /// generator is reseeded.
    pub fn reset_rest_state(&mut self, positions: &[Vec3]) -> WeftResult<()> {
        self.check_len("rest positions", positions.len())?;
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(WeftError::InvalidArgument(format!(
                "rest position {} is not finite",
                i
            )));
        }

        self.constraints.reset_rest(positions)?;
        self.rest_positions.copy_from_slice(positions);
        self.tethers.rebind(&self.rest_positions, self.config.tether_scale);
        self.strategy.reset(
            self.constraints.edges.len(),
            self.constraints.bends.len(),
            self.vertex_count(),
        );
        self.rng = StdRng::seed_from_u64(self.config.seed);

        debug!(vertices = self.vertex_count(), "rest state reset");
        Ok(())
    }

    /// Replace the active collider set.
    pub fn set_colliders(&mut self, colliders: Vec<Box<dyn Collider>>) {
        self.colliders = colliders;
    }

    pub fn add_collider(&mut self, collider: Box<dyn Collider>) {
        self.colliders.push(collider);
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    // ─── Accessors ────────────────────────────────────────────────

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solver_kind(&self) -> SolverKind {
        self.strategy.kind()
    }

    pub fn solver_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn vertex_count(&self) -> usize {
        self.masses.len()
    }

    pub fn edge_count(&self) -> usize {
        self.constraints.edges.len()
    }

    pub fn bend_count(&self) -> usize {
        self.constraints.bends.len()
    }

    pub fn batch_counts(&self) -> BatchCounts {
        BatchCounts {
            edges: self.constraints.edge_batches.len(),
            bends: self.constraints.bend_batches.len(),
            tethers: self.tethers.batches().len(),
        }
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Effective inverse masses (zero for pinned vertices).
    pub fn inverse_masses(&self) -> &[f32] {
        self.masses.effective()
    }

    pub fn is_pinned(&self, i: usize) -> bool {
        self.masses.is_pinned(i)
    }

    pub fn pinned_count(&self) -> usize {
        self.masses.pinned_count()
    }

    /// Per-vertex tether bindings; empty when no anchors are set.
    pub fn tether_bindings(&self) -> &[TetherBinding] {
        self.tethers.bindings()
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    // ─── Diagnostics ──────────────────────────────────────────────

    /// Largest `|length − rest|` over all stretch edges.
    pub fn max_stretch_violation(&self, positions: &[Vec3]) -> WeftResult<f32> {
        self.check_len("positions", positions.len())?;
        Ok(self.constraints.max_stretch_violation(positions))
    }

    /// `Σ ½·m·|v|²` over movable vertices.
    pub fn kinetic_energy(&self, velocities: &[Vec3]) -> WeftResult<f32> {
        self.check_len("velocities", velocities.len())?;
        Ok(velocities
            .iter()
            .zip(self.masses.effective())
            .filter(|&(_, &w)| w > 0.0)
            .map(|(v, &w)| 0.5 * v.length_squared() / w)
            .sum())
    }

    fn check_len(&self, what: &'static str, actual: usize) -> WeftResult<()> {
        let expected = self.vertex_count();
        if actual != expected {
            return Err(WeftError::LengthMismatch {
                what,
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn apply_coefficients(&mut self) {
        let k = self.strategy.coefficients(&self.config);
        self.constraints.set_coefficients(k.stretch, k.bend);
        self.tethers.coefficient = k.tether;
    }
}
