//! # weft-types
//!
//! Shared error types and numeric constants for the Weft cloth
//! constraint solver.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Weft crates share.

pub mod constants;
pub mod error;

pub use error::{WeftError, WeftResult};
