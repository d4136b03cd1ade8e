//! Error types for the Weft solver.
//!
//! All crates return `WeftResult<T>` from fallible operations.
//! Every error is a local precondition violation: calls that fail
//! leave the solver untouched.

use thiserror::Error;

/// Unified error type for the Weft workspace.
#[derive(Debug, Error)]
pub enum WeftError {
    /// An argument is empty, non-finite or otherwise unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An index (triangle corner, vertex, anchor) is outside `[0, len)`.
    #[error("{what} index {index} is out of range (len: {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A caller buffer does not match the vertex count.
    #[error("{what} length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Timestep must be positive and finite.
    #[error("Invalid timestep: {0} (must be > 0)")]
    InvalidTimestep(f32),

    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl WeftError {
    /// Returns true for the range-error family (out-of-range indices).
    pub fn is_range_error(&self) -> bool {
        matches!(self, WeftError::IndexOutOfRange { .. })
    }
}

/// Convenience alias for `Result<T, WeftError>`.
pub type WeftResult<T> = Result<T, WeftError>;
