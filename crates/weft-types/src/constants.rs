//! Physical constants and simulation defaults.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.81;

/// Default simulation timestep (seconds). 1/60th of a second.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Default number of constraint iterations per substep.
pub const DEFAULT_ITERATIONS: u32 = 8;

/// Default number of substeps per frame.
pub const DEFAULT_SUBSTEPS: u32 = 2;

/// Default contact thickness (meters). Minimum separation between cloth and colliders.
pub const DEFAULT_CONTACT_THICKNESS: f32 = 0.005;

/// Default per-vertex mass (kg).
pub const DEFAULT_VERTEX_MASS: f32 = 0.01;

/// Smallest vertex mass the config mapper will accept (kg).
pub const MIN_VERTEX_MASS: f32 = 1.0e-6;

/// Upper bound on uniform velocity damping.
pub const MAX_DAMPING: f32 = 0.999;

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-7;

/// Lengths below this are treated as degenerate and the constraint is skipped.
pub const LENGTH_EPSILON: f32 = 1.0e-6;

/// Bound on the impulse scalar applied by a single velocity-impulse correction.
pub const MAX_IMPULSE: f32 = 10.0;

/// Upper bound on the velocity-impulse bias factor.
pub const MAX_BETA: f32 = 0.6;
