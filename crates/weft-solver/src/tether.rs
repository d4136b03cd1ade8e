//! Tether binder.
//!
//! Each vertex is tied to the nearest anchor (by rest-pose distance) with
//! a target length of `tether_scale · rest distance`. Anchor vertices tie
//! to their own rest position with target length zero. Tethers are
//! one-sided: they only pull when the vertex is farther than the target,
//! and only the tethered vertex moves.
//!
//! Because a tether writes its own vertex and only reads its anchor, two
//! batches suffice: the self-bound anchors first, then everything else.
//! No vertex in the second batch is an anchor.

use weft_math::Vec3;
use weft_mesh::Batch;
use weft_types::{WeftError, WeftResult};

/// Per-vertex tether assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetherBinding {
    /// Nearest anchor, or `None` to pull toward the vertex's own rest position.
    pub anchor: Option<u32>,
    /// Distance below which the tether is slack.
    pub target_length: f32,
}

/// Tether bindings for all vertices plus their batches.
#[derive(Debug, Clone, Default)]
pub struct TetherSet {
    anchors: Vec<u32>,
    bindings: Vec<TetherBinding>,
    batches: Vec<Batch>,
    /// Bias factor or compliance, depending on the solver body.
    pub coefficient: f32,
}

impl TetherSet {
    /// Bind every vertex to its nearest anchor.
    ///
    /// Duplicate anchors are ignored; ties go to the lowest vertex index.
    /// An empty anchor list yields an unbound set.
    pub fn bind(anchors: &[u32], rest: &[Vec3], scale: f32) -> WeftResult<Self> {
        if let Some(&a) = anchors.iter().find(|&&a| a as usize >= rest.len()) {
            return Err(WeftError::IndexOutOfRange {
                what: "anchor",
                index: a as usize,
                len: rest.len(),
            });
        }

        let mut sorted = anchors.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut set = Self {
            anchors: sorted,
            ..Default::default()
        };
        set.rebind(rest, scale);
        Ok(set)
    }

    /// Recompute nearest anchors and target lengths from a rest pose.
    pub fn rebind(&mut self, rest: &[Vec3], scale: f32) {
        self.bindings.clear();
        self.batches.clear();
        if self.anchors.is_empty() {
            return;
        }

        self.bindings = rest
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let mut best = (f32::INFINITY, self.anchors[0]);
                for &a in &self.anchors {
                    let d2 = p.distance_squared(rest[a as usize]);
                    if d2 < best.0 {
                        best = (d2, a);
                    }
                }

                if best.1 as usize == i {
                    TetherBinding {
                        anchor: None,
                        target_length: 0.0,
                    }
                } else {
                    TetherBinding {
                        anchor: Some(best.1),
                        target_length: scale * best.0.sqrt(),
                    }
                }
            })
            .collect();

        let (anchored, tethered): (Batch, Batch) =
            (0..rest.len() as u32).partition(|&i| self.bindings[i as usize].anchor.is_none());
        self.batches = [anchored, tethered]
            .into_iter()
            .filter(|b| !b.is_empty())
            .collect();
    }

    /// Returns true when at least one anchor is set.
    pub fn is_bound(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Sorted, de-duplicated anchor vertices.
    pub fn anchors(&self) -> &[u32] {
        &self.anchors
    }

    /// Per-vertex bindings (empty when unbound).
    pub fn bindings(&self) -> &[TetherBinding] {
        &self.bindings
    }

    /// Vertex-disjoint batches of tethered vertex indices.
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// The point vertex `i` is pulled toward.
    #[inline]
    pub fn center(&self, i: usize, positions: &[Vec3], rest: &[Vec3]) -> Vec3 {
        match self.bindings[i].anchor {
            Some(a) => positions[a as usize],
            None => rest[i],
        }
    }
}
