//! Per-vertex inverse mass and pin state.
//!
//! The base inverse mass comes from the configured vertex mass or from
//! [`MassModel::set_base`]; pin flags are kept separately so unpinning
//! restores the base value. The effective inverse mass (zero when pinned)
//! is what the constraint weights are built from.

use weft_types::{WeftError, WeftResult};

/// Inverse masses and pin flags for every vertex.
#[derive(Debug, Clone)]
pub struct MassModel {
    base: Vec<f32>,
    pinned: Vec<bool>,
    effective: Vec<f32>,
}

impl MassModel {
    /// Uniform mass model: every vertex gets `1 / vertex_mass`.
    pub fn uniform(vertex_count: usize, vertex_mass: f32) -> Self {
        let w = 1.0 / vertex_mass;
        Self {
            base: vec![w; vertex_count],
            pinned: vec![false; vertex_count],
            effective: vec![w; vertex_count],
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Returns true when the model covers no vertices.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Effective inverse masses (zero for pinned vertices).
    #[inline]
    pub fn effective(&self) -> &[f32] {
        &self.effective
    }

    /// Returns true if vertex `i` is pinned.
    pub fn is_pinned(&self, i: usize) -> bool {
        self.pinned.get(i).copied().unwrap_or(false)
    }

    /// Number of pinned vertices.
    pub fn pinned_count(&self) -> usize {
        self.pinned.iter().filter(|&&p| p).count()
    }

    /// Replace the base inverse masses. Negative (and NaN) values clamp to 0.
    pub fn set_base(&mut self, values: &[f32]) -> WeftResult<()> {
        if values.len() != self.base.len() {
            return Err(WeftError::LengthMismatch {
                what: "inverse masses",
                expected: self.base.len(),
                actual: values.len(),
            });
        }
        for (b, &v) in self.base.iter_mut().zip(values) {
            *b = v.max(0.0);
        }
        self.refresh();
        Ok(())
    }

    /// Multiply every base inverse mass by `factor`.
    pub fn rescale(&mut self, factor: f32) {
        for b in &mut self.base {
            *b *= factor;
        }
        self.refresh();
    }

    /// Pin every vertex in `indices`. Fails before mutating on a bad index.
    pub fn pin(&mut self, indices: &[u32]) -> WeftResult<()> {
        self.check_indices(indices)?;
        for &i in indices {
            self.pinned[i as usize] = true;
        }
        self.refresh();
        Ok(())
    }

    /// Unpin every vertex in `indices`, restoring its base inverse mass.
    pub fn unpin(&mut self, indices: &[u32]) -> WeftResult<()> {
        self.check_indices(indices)?;
        for &i in indices {
            self.pinned[i as usize] = false;
        }
        self.refresh();
        Ok(())
    }

    /// Unpin everything.
    pub fn clear_pins(&mut self) {
        self.pinned.fill(false);
        self.refresh();
    }

    fn check_indices(&self, indices: &[u32]) -> WeftResult<()> {
        match indices.iter().find(|&&i| i as usize >= self.base.len()) {
            Some(&i) => Err(WeftError::IndexOutOfRange {
                what: "vertex",
                index: i as usize,
                len: self.base.len(),
            }),
            None => Ok(()),
        }
    }

    fn refresh(&mut self) {
        for ((e, &b), &p) in self.effective.iter_mut().zip(&self.base).zip(&self.pinned) {
            *e = if p { 0.0 } else { b };
        }
    }
}
