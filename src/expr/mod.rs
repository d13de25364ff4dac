//! Expression types and creation utilities.
//!
//! This module provides the affine expression tree consumed by the matrix
//! builder:
//! - `LinOp` - a node of the linear operator tree
//! - `OpKind` - the closed set of operators a node can carry
//! - `Shape` - two-dimensional shape information
//! - Variable creation via `variable()` and constant creation via `constant()`

pub mod constant;
pub mod linop;
pub mod shape;
pub mod variable;

// Re-export main types
pub use constant::{constant, constant_dmatrix, constant_matrix, constant_sparse, constant_vec, ones, zeros};
pub use linop::{Array, LinOp, OpKind};
pub use shape::Shape;
pub use variable::{variable, variable_with_id, VarId};
