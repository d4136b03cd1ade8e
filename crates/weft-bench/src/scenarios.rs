//! Benchmark scenarios — procedural mesh + pinning + colliders + params.
//!
//! Three canonical scenarios for regression testing:
//! 1. **Hanging sheet** — Cloth pinned at top edge, drapes under gravity
//! 2. **Sphere drape** — Cloth falls onto a sphere
//! 3. **Capsule drape** — Cloth falls across a horizontal capsule onto the ground

use serde::{Deserialize, Serialize};

use weft_contact::ColliderShape;
use weft_mesh::generators::{lay_flat, quad_grid, top_row};
use weft_mesh::TriangleMesh;
use weft_solver::{ClothParams, SolverKind};

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Cloth pinned at top edge, hanging under gravity.
    HangingSheet,
    /// Cloth draped over a sphere.
    SphereDrape,
    /// Cloth draped over a capsule resting above a ground plane.
    CapsuleDrape,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::HangingSheet,
            ScenarioKind::SphereDrape,
            ScenarioKind::CapsuleDrape,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::HangingSheet => "hanging_sheet",
            ScenarioKind::SphereDrape => "sphere_drape",
            ScenarioKind::CapsuleDrape => "capsule_drape",
        }
    }

    /// Parse a scenario name as printed by [`ScenarioKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// A fully specified benchmark scenario.
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    /// Cloth mesh; its positions are the rest pose.
    pub garment: TriangleMesh,
    /// Pinned vertex indices.
    pub pinned: Vec<u32>,
    /// Tether anchors (empty = no tethers).
    pub anchors: Vec<u32>,
    /// Obstacles.
    pub colliders: Vec<ColliderShape>,
    /// Raw solver parameters.
    pub params: ClothParams,
    /// Number of timesteps to simulate.
    pub timesteps: u32,
    /// Timestep size (seconds).
    pub dt: f32,
}

impl Scenario {
    /// Create the hanging sheet scenario.
    ///
    /// A 1m × 1m cloth at 20×20 resolution, pinned and tethered along the
    /// top edge, hanging under gravity for 2 seconds at 60fps.
    pub fn hanging_sheet() -> Self {
        let cols = 20;
        let garment = quad_grid(cols, 20, 1.0, 1.0);
        let pinned = top_row(cols);

        Self {
            kind: ScenarioKind::HangingSheet,
            garment,
            anchors: pinned.clone(),
            pinned,
            colliders: Vec::new(),
            params: ClothParams {
                vertex_mass: 0.002, // ~200g/m² cloth, distributed across 441 vertices
                ..Default::default()
            },
            timesteps: 120, // 2 seconds at 60fps
            dt: 1.0 / 60.0,
        }
    }

    /// Create the sphere drape scenario.
    ///
    /// A 1.5m × 1.5m cloth at 20×20 resolution, laid flat 0.5m above
    /// a sphere of radius 0.3m centered at origin.
    pub fn sphere_drape() -> Self {
        let mut garment = quad_grid(20, 20, 1.5, 1.5);
        lay_flat(&mut garment, 0.5);

        Self {
            kind: ScenarioKind::SphereDrape,
            garment,
            pinned: Vec::new(), // Nothing pinned — free fall
            anchors: Vec::new(),
            colliders: vec![ColliderShape::Sphere {
                center: [0.0; 3],
                radius: 0.3,
            }],
            params: ClothParams {
                vertex_mass: 0.002,
                ..Default::default()
            },
            timesteps: 180, // 3 seconds
            dt: 1.0 / 60.0,
        }
    }

    /// Create the capsule drape scenario.
    ///
    /// A 1m × 1m cloth falls across a horizontal capsule (radius 0.1m,
    /// 1.2m long) and settles onto a ground plane at y = −0.6.
    pub fn capsule_drape() -> Self {
        let mut garment = quad_grid(16, 16, 1.0, 1.0);
        lay_flat(&mut garment, 0.3);

        Self {
            kind: ScenarioKind::CapsuleDrape,
            garment,
            pinned: Vec::new(),
            anchors: Vec::new(),
            colliders: vec![
                ColliderShape::Capsule {
                    a: [-0.6, 0.0, 0.0],
                    b: [0.6, 0.0, 0.0],
                    radius: 0.1,
                },
                ColliderShape::Plane {
                    normal: [0.0, 1.0, 0.0],
                    offset: -0.6,
                },
            ],
            params: ClothParams {
                vertex_mass: 0.004,
                friction: 0.5,
                ..Default::default()
            },
            timesteps: 150,
            dt: 1.0 / 60.0,
        }
    }

    /// Create a scenario by kind.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::HangingSheet => Self::hanging_sheet(),
            ScenarioKind::SphereDrape => Self::sphere_drape(),
            ScenarioKind::CapsuleDrape => Self::capsule_drape(),
        }
    }

    /// Run this scenario with a different solver body.
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.params.solver = solver;
        self
    }
}
