//! Graph coloring for parallel-safe constraint batches.
//!
//! Implements greedy first-fit coloring with bitmask-accelerated color
//! searching. Constraints are scanned in order and each one lands in the
//! first batch that does not already touch either of its vertices, so no
//! two constraints in a batch share a vertex. The solver walks batches
//! sequentially today; the layout is what a parallel-for per batch needs.

/// A set of constraint indices with pairwise-disjoint vertex sets.
pub type Batch = Vec<u32>;

/// Number of batches tracked by the per-vertex bitmask fast path.
const MASK_BATCHES: usize = 64;

/// Vertex-pair coloring for batched constraint resolution.
///
/// Uses a u64 bitmask per vertex for the first 64 batches, giving O(1)
/// color assignment. Meshes with a vertex valence above 64 spill into
/// overflow batches tracked with explicit occupancy vectors.
pub struct ConstraintColoring;

impl ConstraintColoring {
    /// Partition `pairs` into vertex-disjoint batches.
    ///
    /// Each pair is `[a, b]`; `a == b` is allowed for single-vertex
    /// constraints. Returns batches of
    /// indices into `pairs`, in scan order within each batch.
    ///
    /// All vertex indices must be `< vertex_count`.
    pub fn color_pairs(pairs: &[[u32; 2]], vertex_count: usize) -> Vec<Batch> {
        let mut batches: Vec<Batch> = Vec::new();
        if pairs.is_empty() {
            return batches;
        }

        // Bit `c` of masks[v] is set when batch `c` already touches vertex v.
        let mut masks: Vec<u64> = vec![0; vertex_count];
        // Occupancy for batches beyond the bitmask range, indexed by
        // (batch - MASK_BATCHES).
        let mut overflow: Vec<Vec<bool>> = Vec::new();

        for (ci, &[a, b]) in pairs.iter().enumerate() {
            let (a, b) = (a as usize, b as usize);
            let used = masks[a] | masks[b];

            let color = if used != u64::MAX {
                (!used).trailing_zeros() as usize
            } else {
                let slot = overflow.iter().position(|occ| !occ[a] && !occ[b]);
                let slot = slot.unwrap_or_else(|| {
                    overflow.push(vec![false; vertex_count]);
                    overflow.len() - 1
                });
                overflow[slot][a] = true;
                overflow[slot][b] = true;
                MASK_BATCHES + slot
            };

            if color < MASK_BATCHES {
                masks[a] |= 1u64 << color;
                masks[b] |= 1u64 << color;
            }

            if color >= batches.len() {
                batches.resize_with(color + 1, Vec::new);
            }
            batches[color].push(ci as u32);
        }

        batches
    }

    /// Check that every batch is vertex-disjoint and that every pair
    /// appears in exactly one batch.
    pub fn is_valid(pairs: &[[u32; 2]], batches: &[Batch], vertex_count: usize) -> bool {
        let mut seen = vec![false; pairs.len()];
        let mut stamp: Vec<usize> = vec![usize::MAX; vertex_count];

        for (bi, batch) in batches.iter().enumerate() {
            for &ci in batch {
                let ci = ci as usize;
                if ci >= pairs.len() || seen[ci] {
                    return false;
                }
                seen[ci] = true;

                let [a, b] = pairs[ci];
                let (a, b) = (a as usize, b as usize);
                if stamp[a] == bi || stamp[b] == bi {
                    return false;
                }
                stamp[a] = bi;
                stamp[b] = bi;
            }
        }

        seen.iter().all(|&s| s)
    }
}
