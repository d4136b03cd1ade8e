//! Solver configuration.
//!
//! [`ClothParams`] is the raw parameter object a host fills in (or loads
//! from TOML). Values may be out of range. [`SolverConfig::from_params`]
//! maps it to a clamped, immutable snapshot; the solver replaces its
//! snapshot wholesale on every parameter update.

use serde::{Deserialize, Serialize};
use weft_math::Vec3;
use weft_types::constants;

/// Which constraint solver body to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Sequential velocity-impulse solver with a position-error bias.
    #[default]
    VelocityImpulse,
    /// Compliance-based XPBD position projection.
    Xpbd,
}

impl SolverKind {
    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            SolverKind::VelocityImpulse => "velocity_impulse",
            SolverKind::Xpbd => "xpbd",
        }
    }
}

/// Raw, unvalidated cloth parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothParams {
    /// Solver body, fixed when the solver is constructed.
    pub solver: SolverKind,

    /// Gravity vector [gx, gy, gz] in m/s².
    pub gravity: [f32; 3],

    /// Extra uniform acceleration (wind, host forces) in m/s².
    pub external_acceleration: [f32; 3],

    /// Velocity damping per substep (0.0 = none, clamped to 0.999).
    pub damping: f32,

    /// Linear air drag coefficient (1/s).
    pub air_drag: f32,

    /// Stretch stiffness in [0, 1].
    pub stretch_stiffness: f32,

    /// Bend stiffness in [0, 1].
    pub bend_stiffness: f32,

    /// Tether stiffness in [0, 1]. Zero disables tethers.
    pub tether_stiffness: f32,

    /// Collider friction in [0, 1].
    pub friction: f32,

    /// Separation kept from collider surfaces (meters).
    pub collision_thickness: f32,

    /// Constraint iterations per substep.
    pub iterations: i32,

    /// Substeps per frame.
    pub substeps: i32,

    /// Mass of every vertex (kg).
    pub vertex_mass: f32,

    /// Tether target length as a multiple of the rest distance to the anchor.
    pub tether_scale: f32,

    /// XPBD compliance multiplier.
    pub compliance_scale: f32,

    /// Amplitude of the per-vertex random acceleration (m/s²). Zero disables it.
    pub jitter: f32,

    /// Seed for the jitter generator.
    pub seed: u64,
}

impl Default for ClothParams {
    fn default() -> Self {
        Self {
            solver: SolverKind::VelocityImpulse,
            gravity: [0.0, -constants::GRAVITY, 0.0],
            external_acceleration: [0.0; 3],
            damping: 0.01,
            air_drag: 0.0,
            stretch_stiffness: 0.9,
            bend_stiffness: 0.1,
            tether_stiffness: 0.5,
            friction: 0.3,
            collision_thickness: constants::DEFAULT_CONTACT_THICKNESS,
            iterations: constants::DEFAULT_ITERATIONS as i32,
            substeps: constants::DEFAULT_SUBSTEPS as i32,
            vertex_mass: constants::DEFAULT_VERTEX_MASS,
            tether_scale: 1.0,
            compliance_scale: 1.0e-3,
            jitter: 0.0,
            seed: 0,
        }
    }
}

impl ClothParams {
    /// Cheap preset for previews (fewer iterations, one substep).
    pub fn draft() -> Self {
        Self {
            iterations: 3,
            substeps: 1,
            ..Default::default()
        }
    }

    /// High-quality preset (more iterations and substeps).
    pub fn high_quality() -> Self {
        Self {
            iterations: 20,
            substeps: 4,
            stretch_stiffness: 1.0,
            ..Default::default()
        }
    }

    /// Same parameters with a different solver body.
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }
}

/// Clamped configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub solver: SolverKind,
    pub gravity: [f32; 3],
    pub external_acceleration: [f32; 3],
    /// In [0, 0.999].
    pub damping: f32,
    /// In [0, ∞).
    pub air_drag: f32,
    pub stretch_stiffness: f32,
    pub bend_stiffness: f32,
    pub tether_stiffness: f32,
    pub friction: f32,
    pub collision_thickness: f32,
    /// At least 1.
    pub iterations: u32,
    /// At least 1.
    pub substeps: u32,
    /// At least `MIN_VERTEX_MASS`.
    pub vertex_mass: f32,
    pub tether_scale: f32,
    pub compliance_scale: f32,
    pub jitter: f32,
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::from_params(&ClothParams::default())
    }
}

/// Replace non-finite values with `fallback`, then clamp to `[lo, hi]`.
fn clamp_or(value: f32, fallback: f32, lo: f32, hi: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

fn vec_or_zero(v: [f32; 3]) -> [f32; 3] {
    if v.iter().all(|c| c.is_finite()) {
        v
    } else {
        [0.0; 3]
    }
}

impl SolverConfig {
    /// Map raw parameters to a clamped snapshot. Never fails.
    pub fn from_params(params: &ClothParams) -> Self {
        let d = ClothParams::default();
        Self {
            solver: params.solver,
            gravity: vec_or_zero(params.gravity),
            external_acceleration: vec_or_zero(params.external_acceleration),
            damping: clamp_or(params.damping, d.damping, 0.0, constants::MAX_DAMPING),
            air_drag: clamp_or(params.air_drag, d.air_drag, 0.0, f32::MAX),
            stretch_stiffness: clamp_or(params.stretch_stiffness, d.stretch_stiffness, 0.0, 1.0),
            bend_stiffness: clamp_or(params.bend_stiffness, d.bend_stiffness, 0.0, 1.0),
            tether_stiffness: clamp_or(params.tether_stiffness, d.tether_stiffness, 0.0, 1.0),
            friction: clamp_or(params.friction, d.friction, 0.0, 1.0),
            collision_thickness: clamp_or(
                params.collision_thickness,
                d.collision_thickness,
                0.0,
                f32::MAX,
            ),
            iterations: params.iterations.max(1) as u32,
            substeps: params.substeps.max(1) as u32,
            vertex_mass: clamp_or(
                params.vertex_mass,
                d.vertex_mass,
                constants::MIN_VERTEX_MASS,
                f32::MAX,
            ),
            tether_scale: clamp_or(params.tether_scale, d.tether_scale, 0.0, f32::MAX),
            compliance_scale: clamp_or(params.compliance_scale, d.compliance_scale, 0.0, f32::MAX),
            jitter: clamp_or(params.jitter, d.jitter, 0.0, f32::MAX),
            seed: params.seed,
        }
    }

    /// Velocity-impulse bias for a stiffness in [0, 1].
    ///
    /// Monotonically increasing in stiffness, bounded by `MAX_BETA`, and
    /// scaled down below four iterations.
    pub fn beta(&self, stiffness: f32) -> f32 {
        let ramp = (self.iterations as f32 / 4.0).min(1.0);
        ((0.05 + 0.45 * stiffness) * ramp).min(constants::MAX_BETA)
    }

    /// Bias for stretch constraints.
    pub fn stretch_beta(&self) -> f32 {
        self.beta(self.stretch_stiffness)
    }

    /// Bias for bend constraints (half weight).
    pub fn bend_beta(&self) -> f32 {
        0.5 * self.beta(self.bend_stiffness)
    }

    /// Bias for tether constraints.
    pub fn tether_beta(&self) -> f32 {
        self.beta(self.tether_stiffness)
    }

    /// XPBD compliance `(1 - stiffness)² · compliance_scale`.
    pub fn compliance(&self, stiffness: f32) -> f32 {
        let soft = 1.0 - stiffness;
        soft * soft * self.compliance_scale
    }

    pub fn stretch_compliance(&self) -> f32 {
        self.compliance(self.stretch_stiffness)
    }

    pub fn bend_compliance(&self) -> f32 {
        self.compliance(self.bend_stiffness)
    }

    pub fn tether_compliance(&self) -> f32 {
        self.compliance(self.tether_stiffness)
    }

    /// Gravity plus external acceleration.
    pub fn body_acceleration(&self) -> Vec3 {
        Vec3::from(self.gravity) + Vec3::from(self.external_acceleration)
    }

    /// Whether tethers take part in the solve.
    pub fn tethers_enabled(&self) -> bool {
        self.tether_stiffness > 0.0
    }
}
