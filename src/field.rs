//! Finite fields.
//!
//! This module exposes the base field of the Kummer surface, and the
//! ring of scalars (integers modulo the order of the base point). These
//! are aliases on the backend-provided types.

pub use crate::backend::GF127;
pub use crate::backend::Scalar;
