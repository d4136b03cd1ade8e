//! Simulation file format.
//!
//! ```toml
//! [scene]
//! cols = 20
//! rows = 20
//! width = 1.0
//! height = 1.0
//! steps = 120
//! dt = 0.016666668
//! pin = "top_row"
//! tether_pinned = true
//! colliders = [{ type = "sphere", center = [0.0, -0.6, 0.0], radius = 0.3 }]
//!
//! [params]
//! solver = "xpbd"
//! stretch_stiffness = 1.0
//! ```
//!
//! Both tables are optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use weft_contact::ColliderShape;
use weft_mesh::generators::{lay_flat, quad_grid, top_row};
use weft_mesh::TriangleMesh;
use weft_solver::ClothParams;
use weft_types::constants::DEFAULT_DT;
use weft_types::{WeftError, WeftResult};

/// Which grid vertices to pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinMode {
    /// Nothing pinned.
    #[default]
    None,
    /// Every vertex of the top row.
    TopRow,
    /// The two top corners.
    Corners,
}

/// The `[scene]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Quads along X.
    pub cols: usize,
    /// Quads along Y.
    pub rows: usize,
    /// Grid width (meters).
    pub width: f32,
    /// Grid height (meters).
    pub height: f32,
    /// When set, the grid is laid flat in XZ at this height.
    pub lay_flat: Option<f32>,
    /// Number of frames to simulate.
    pub steps: u32,
    /// Frame length (seconds).
    pub dt: f32,
    pub pin: PinMode,
    /// Tether every vertex to the nearest pinned vertex.
    pub tether_pinned: bool,
    /// Extra tether anchors.
    pub anchors: Vec<u32>,
    pub colliders: Vec<ColliderShape>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 20,
            width: 1.0,
            height: 1.0,
            lay_flat: None,
            steps: 120,
            dt: DEFAULT_DT,
            pin: PinMode::TopRow,
            tether_pinned: false,
            anchors: Vec::new(),
            colliders: Vec::new(),
        }
    }
}

/// A complete simulation description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationFile {
    pub scene: SceneConfig,
    pub params: ClothParams,
}

impl SimulationFile {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> WeftResult<Self> {
        toml::from_str(text).map_err(|e| WeftError::Serialization(e.to_string()))
    }

    /// Build the cloth mesh.
    pub fn mesh(&self) -> TriangleMesh {
        let s = &self.scene;
        let mut mesh = quad_grid(s.cols, s.rows, s.width, s.height);
        if let Some(y) = s.lay_flat {
            lay_flat(&mut mesh, y);
        }
        mesh
    }

    /// Pinned vertex indices for the grid.
    pub fn pinned(&self) -> Vec<u32> {
        let cols = self.scene.cols.max(1);
        match self.scene.pin {
            PinMode::None => Vec::new(),
            PinMode::TopRow => top_row(cols),
            PinMode::Corners => vec![0, cols as u32],
        }
    }

    /// Tether anchors: explicit anchors plus the pins when `tether_pinned` is set.
    pub fn anchors(&self) -> Vec<u32> {
        let mut anchors = self.scene.anchors.clone();
        if self.scene.tether_pinned {
            anchors.extend(self.pinned());
        }
        anchors
    }
}
